// src/lib.rs

//! Conveyor: an async, type-safe step pipeline engine.
//!
//! A pipeline is an ordered list of named steps run against a shared,
//! lockable context. Each step can carry `before`, `on` and `after` handlers,
//! be marked optional, or be skipped by a condition evaluated on the context.
//! Any handler may halt the run early with [`PipelineControl::Stop`] or fail
//! it with the pipeline's error type.
//!
//! Pipelines are registered in a [`Conveyor`] registry keyed by their context
//! type, so callers only need to build a context and hand it over:
//!
//! 1. Define a context struct `MyCtx` for the process.
//! 2. Build a `Pipeline<MyCtx, MyError>` from step definitions.
//! 3. Attach handlers with `.on_root()`, `.before_root()`, `.after_root()`.
//! 4. Register it with `Conveyor::<MyError>::register_pipeline`.
//! 5. Run it with `conveyor.run(ContextData::new(my_ctx)).await`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{ConveyorError, ConveyorResult};

pub use crate::registry::Conveyor;
