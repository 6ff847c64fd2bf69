pub mod app;
pub mod clipboard;
mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod loader;
pub mod logging;
pub mod notification;
pub mod state;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting redakt");

    gtk4::init()?;
    let config = config::load_app_config();
    tracing::debug!(?config, "configuration loaded");

    let app = app::App::new(config);
    app.run()?;

    tracing::info!("shutdown complete");
    Ok(())
}
