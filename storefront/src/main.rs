// storefront/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use storefront::config::{AppConfig, LogFormat};
use storefront::state::AppState;
use storefront::store::{seed, Collections};

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);

  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      // No subscriber yet; report straight to stderr.
      eprintln!("Configuration error: {}", e);
      return Err(std::io::Error::other(e.to_string()));
    }
  };
  init_tracing(app_config.log_format);
  tracing::info!("Starting e-commerce application server...");

  let collections = Collections::from_config(&app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to open the document store.");
    std::io::Error::other(e.to_string())
  })?;

  if app_config.seed_db {
    match seed::seed_products(collections.products.as_ref()).await {
      Ok(0) => {}
      Ok(n) => tracing::info!("Seeded {} sample products.", n),
      Err(e) => tracing::error!(error = %e, "Failed to seed products."),
    }
  }

  let app_state = AppState::new(collections, app_config.clone());

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let server = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(storefront::web::cors_layer(&app_state.config))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(storefront::web::configure_app)
  })
  .bind(&server_address)?;

  tracing::info!("E-commerce is running on port {}", app_config.server_port);
  server.run().await
}
