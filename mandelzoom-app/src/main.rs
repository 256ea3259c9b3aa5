mod app;
mod app_dir;
mod export_job;
mod input;
mod preferences;
mod render_bridge;
mod ui;

use std::process::ExitCode;

use eframe::egui;
use tracing::{error, info};

use crate::app::{initial_view, MandelZoomApp};
use crate::preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting MandelZoom");

    let prefs = AppPreferences::load();
    let share_arg = std::env::args().nth(1);
    let view = initial_view(&prefs, share_arg.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MandelZoom")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "MandelZoom",
        options,
        Box::new(move |cc| Ok(Box::new(MandelZoomApp::new(&cc.egui_ctx, prefs, view)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to initialise the render surface: {e}");
            ExitCode::FAILURE
        }
    }
}
