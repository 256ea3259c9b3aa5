use std::sync::mpsc;
use std::thread;

use eframe::egui;
use tracing::info;

use mandelzoom_core::{share, Coordinator, HostComplex, IterationResult, Screen, Session, ViewState};
use mandelzoom_render::ExportSummary;

use crate::export_job::Notification;
use crate::preferences::AppPreferences;
use crate::render_bridge::{render_worker, RenderPhase, RenderRequest, RenderResponse, RenderStats};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

/// What the host probe found under the cursor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CursorProbe {
    pub(crate) point: HostComplex,
    pub(crate) result: IterationResult,
}

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct MandelZoomApp {
    // View and interaction state
    pub(crate) session: Session,
    pub(crate) coordinator: Coordinator,

    // Render thread
    pub(crate) tx_request: mpsc::Sender<RenderRequest>,
    pub(crate) rx_response: mpsc::Receiver<RenderResponse>,
    pub(crate) render_id: u64,
    pub(crate) render_phase: RenderPhase,

    // Last frame
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) last_render: Option<RenderStats>,

    // Pointer
    pub(crate) cursor_probe: Option<CursorProbe>,
    pub(crate) touch_contacts: usize,

    // Share text entry
    pub(crate) share_input: String,

    // Export
    pub(crate) export_rx: Option<mpsc::Receiver<Result<ExportSummary, String>>>,
    pub(crate) notification: Option<Notification>,

    pub(crate) preferences: AppPreferences,
}

// ---------------------------------------------------------------------------
// Constructor
// ---------------------------------------------------------------------------

impl MandelZoomApp {
    pub(crate) fn new(egui_ctx: &egui::Context, prefs: AppPreferences, view: ViewState) -> Self {
        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();

        let ctx = egui_ctx.clone();
        thread::spawn(move || {
            render_worker(ctx, rx_req, tx_resp);
        });

        let scale_factor = egui_ctx.pixels_per_point();
        let screen = Screen::from_logical(prefs.window_width, prefs.window_height, scale_factor);

        Self {
            session: Session::new(view, screen),
            coordinator: Coordinator::default(),

            tx_request: tx_req,
            rx_response: rx_resp,
            render_id: 0,
            render_phase: RenderPhase::Idle,

            texture: None,
            last_render: None,

            cursor_probe: None,
            touch_contacts: 0,

            share_input: String::new(),

            export_rx: None,
            notification: None,

            preferences: prefs,
        }
    }

    // -- Share helpers -----------------------------------------------------

    pub(crate) fn copy_share(&mut self, ctx: &egui::Context) {
        let text = share::encode(self.session.view());
        info!(share = %text, "Copied view to clipboard");
        ctx.copy_text(text);
        self.notification = Some(Notification::info("View copied to clipboard".to_string()));
    }

    /// Apply a pasted share string on top of the current view.
    pub(crate) fn import_share(&mut self, text: &str) {
        let current = *self.session.view();
        let view = share::decode(text, current);
        if view != current {
            info!(zoom = view.zoom, "Imported shared view");
            self.session.set_view(view);
        }
    }
}

/// Starting view: the saved one (if any), then a share string from the
/// command line applied on top.
pub(crate) fn initial_view(prefs: &AppPreferences, share_arg: Option<&str>) -> ViewState {
    let base = prefs.restored_view().unwrap_or_default();
    match share_arg {
        Some(text) => {
            info!("Applying view from command line");
            share::decode(text, base)
        }
        None => base,
    }
}

// ---------------------------------------------------------------------------
// Fractal view update
// ---------------------------------------------------------------------------

impl MandelZoomApp {
    fn update_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_size();
                let screen = Screen::from_logical(available.x, available.y, ctx.pixels_per_point());
                self.session.resize(screen);

                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());

                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                if let Some(ref tex) = self.texture {
                    painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                }

                self.handle_canvas_input(ctx, &response);
            });

        // The refresh tick: at most one frame per update.
        self.dispatch_pending_frame();
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for MandelZoomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.poll_responses(ctx);
        self.poll_export_result();
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.preferences.window_width = rect.width();
            self.preferences.window_height = rect.height();
        }

        self.update_canvas(ctx);
        self.handle_keyboard(ctx);
        self.show_hud(ctx);
        self.show_toolbar(ctx);

        if self.notification.as_ref().is_some_and(Notification::expired) {
            self.notification = None;
        }
        if self.render_phase == RenderPhase::Rendering
            || self.export_running()
            || self.notification.is_some()
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.preferences.last_view = Some((*self.session.view()).into());
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelzoom_core::PaletteId;

    #[test]
    fn command_line_share_overrides_saved_view() {
        let saved = ViewState {
            zoom: 50.0,
            palette: PaletteId::Matrix,
            ..ViewState::default()
        };
        let prefs = AppPreferences {
            last_view: Some(saved.into()),
            ..AppPreferences::default()
        };
        assert_eq!(initial_view(&prefs, None), saved);

        let v = initial_view(&prefs, Some("re=0.25&zoom=8"));
        assert_eq!(v.center.re.hi, 0.25);
        assert_eq!(v.zoom, 8.0);
        // Fields absent from the argument keep the saved values.
        assert_eq!(v.palette, PaletteId::Matrix);
    }

    #[test]
    fn no_saved_view_starts_at_default() {
        let prefs = AppPreferences::default();
        assert_eq!(initial_view(&prefs, None), ViewState::default());
        assert_eq!(initial_view(&prefs, Some("garbage")), ViewState::default());
    }
}
