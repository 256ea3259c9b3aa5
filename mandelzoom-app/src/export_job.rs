//! Background high-resolution export.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;
use tracing::{error, info};

use mandelzoom_render::{export, ExportRequest, ExportSummary};

use crate::app::MandelZoomApp;
use crate::app_dir;

/// How long an export notification stays in the HUD.
pub(crate) const NOTIFICATION_DURATION: Duration = Duration::from_secs(6);

pub(crate) struct Notification {
    pub(crate) text: String,
    pub(crate) is_error: bool,
    pub(crate) shown_at: Instant,
}

impl Notification {
    pub(crate) fn info(text: String) -> Self {
        Self {
            text,
            is_error: false,
            shown_at: Instant::now(),
        }
    }

    pub(crate) fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
            shown_at: Instant::now(),
        }
    }

    pub(crate) fn expired(&self) -> bool {
        self.shown_at.elapsed() > NOTIFICATION_DURATION
    }
}

/// Render, encode and write one export. Runs on a worker thread.
fn export_worker(request: &ExportRequest, dir: PathBuf) -> Result<ExportSummary, String> {
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Cannot create {}: {e}", dir.display()))?;
    let stem = export::default_file_stem(&request.view);
    let path = export::unique_path(&dir, &stem, request.format.extension());
    export::export_to_file(request, &path).map_err(|e| e.to_string())
}

impl MandelZoomApp {
    pub(crate) fn export_running(&self) -> bool {
        self.export_rx.is_some()
    }

    /// Start exporting the current view. Ignored while one is running.
    pub(crate) fn start_export(&mut self, ctx: &egui::Context) {
        if self.export_running() {
            return;
        }
        let request = ExportRequest {
            view: *self.session.view(),
            screen: *self.session.screen(),
            tier: self.preferences.precision,
            scale: self.preferences.export_scale,
            format: self.preferences.export_format,
        };
        let dir = app_dir::export_directory(&self.preferences.export_dir);
        info!(
            scale = request.scale,
            format = request.format.label(),
            dir = %dir.display(),
            "Starting export"
        );

        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = export_worker(&request, dir);
            let _ = tx.send(result);
            ctx.request_repaint();
        });
        self.export_rx = Some(rx);
    }

    pub(crate) fn poll_export_result(&mut self) {
        let Some(rx) = &self.export_rx else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => Err("export worker stopped".to_string()),
        };
        self.export_rx = None;
        self.notification = Some(match outcome {
            Ok(summary) => {
                let short = summary
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                Notification::info(format!(
                    "Exported {short} ({}\u{00d7}{})",
                    summary.width, summary.height
                ))
            }
            Err(msg) => {
                error!("Export failed: {msg}");
                Notification::error(format!("Export failed: {msg}"))
            }
        });
    }
}
