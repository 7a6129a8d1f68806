// src/registry.rs

//! `Conveyor<E>`: a registry of pipelines keyed by their context type.
//! Callers hand over a `ContextData<TData>` and the registry dispatches it to
//! the pipeline registered for `TData`, returning the application error `E`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::ConveyorError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedPipeline<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct RegisteredPipeline<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<ConveyorError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerErr>>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedPipeline<AppErr> for RegisteredPipeline<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<ConveyorError> + Send + Sync + 'static,
{
  #[instrument(
    name = "RegisteredPipeline::run_erased",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>()),
    err(Display)
  )]
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context object type mismatch.");
        return Err(AppErr::from(ConveyorError::TypeMismatch { expected_type }));
      }
    };

    self.pipeline.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// The pipeline registry.
///
/// `AppErr` is what `Conveyor::run` returns; it absorbs both the handler
/// errors of every registered pipeline and the registry's own failures.
pub struct Conveyor<AppErr = ConveyorError>
where
  AppErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  pipelines: Mutex<HashMap<TypeId, Arc<dyn ErasedPipeline<AppErr>>>>,
}

impl<AppErr> Conveyor<AppErr>
where
  AppErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: Mutex::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context type `TData`, replacing any
  /// pipeline previously registered for the same type.
  pub fn register_pipeline<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let registered = RegisteredPipeline::<TData, HandlerErr, AppErr> {
      pipeline: Arc::new(pipeline),
      _app_err: PhantomData,
    };
    self.pipelines.lock().insert(TypeId::of::<TData>(), Arc::new(registered));
  }

  /// Whether a pipeline is registered for `TData`.
  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.pipelines.lock().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData` against `ctx_data`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.pipelines.lock().get(&TypeId::of::<TData>()).cloned();
    let Some(runner) = runner else {
      let context_type = std::any::type_name::<TData>().to_string();
      event!(Level::ERROR, %context_type, "No pipeline registered.");
      return Err(AppErr::from(ConveyorError::PipelineNotRegistered { context_type }));
    };

    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<AppErr> Default for Conveyor<AppErr>
where
  AppErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
