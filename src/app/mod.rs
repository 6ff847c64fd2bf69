use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{glib, Application};

use crate::config::AppConfig;
use crate::editor::EditorSession;
use crate::error::{AppError, AppResult};

mod actions;
mod render;
mod window;
mod wiring;
mod worker;

use self::actions::EditorContext;
use self::window::build_editor_widgets;
use self::wiring::connect_editor;

const APP_ID: &str = "io.github.redakt.Redakt";

pub struct App {
    config: AppConfig,
}

impl App {
    pub(crate) fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> AppResult<()> {
        let application = Application::builder().application_id(APP_ID).build();
        let config = self.config.clone();
        application.connect_activate(move |application| build_editor_window(application, &config));

        // Command-line arguments are not ours to interpret; GTK would reject unknown ones.
        let exit_code = application.run_with_args(&[env!("CARGO_PKG_NAME")]);
        if exit_code != glib::ExitCode::SUCCESS {
            return Err(AppError::ExitFailure);
        }
        Ok(())
    }
}

fn build_editor_window(application: &Application, config: &AppConfig) {
    let settings = config.tool_settings();
    let context = EditorContext {
        session: Rc::new(RefCell::new(EditorSession::new(settings))),
        widgets: build_editor_widgets(application, settings),
        surfaces: Rc::default(),
        clipboard: Rc::from(config.clipboard_backend.backend()),
        notify_on_copy: config.notify_on_copy,
    };

    connect_editor(&context);
    context.refresh();
    context.widgets.window.present();
    tracing::info!(
        tool = settings.mode.label(),
        blur_radius = settings.blur.radius,
        "editor window ready"
    );
}
