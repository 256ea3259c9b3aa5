use std::sync::mpsc;

use eframe::egui;
use tracing::{debug, warn};

use mandelzoom_core::FrameParams;
use mandelzoom_render::{render_frame, RenderError, RenderResult};

use crate::app::MandelZoomApp;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderPhase {
    Idle,
    Rendering,
    Done,
    Failed,
}

impl RenderPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Rendering => "Rendering\u{2026}",
            Self::Done => "Done",
            Self::Failed => "Render failed",
        }
    }
}

pub(crate) struct RenderRequest {
    pub(crate) id: u64,
    pub(crate) params: FrameParams,
}

pub(crate) struct RenderResponse {
    pub(crate) id: u64,
    pub(crate) result: Result<RenderResult, RenderError>,
}

// ---------------------------------------------------------------------------
// impl MandelZoomApp — render dispatch & polling
// ---------------------------------------------------------------------------

impl MandelZoomApp {
    /// Turn at most one pending redraw into a render request.
    pub(crate) fn dispatch_pending_frame(&mut self) {
        // Keep the redraw pending until there is a surface to draw on.
        if self.session.screen().is_empty() {
            return;
        }
        let Some(frame) = self.session.take_frame() else {
            return;
        };
        let params = match self
            .coordinator
            .frame_params(&frame.view, &frame.screen, self.preferences.precision)
        {
            Ok(p) => p,
            Err(e) => {
                warn!("Cannot build frame parameters: {e}");
                return;
            }
        };

        self.render_id += 1;
        debug!(
            id = self.render_id,
            max_iter = params.max_iterations,
            zoom = frame.view.zoom,
            "Requesting render"
        );
        if self
            .tx_request
            .send(RenderRequest {
                id: self.render_id,
                params,
            })
            .is_err()
        {
            warn!("Render worker is gone");
            return;
        }
        self.render_phase = RenderPhase::Rendering;
    }

    pub(crate) fn poll_responses(&mut self, ctx: &egui::Context) {
        while let Ok(resp) = self.rx_response.try_recv() {
            // Anything older than the latest request is stale.
            if resp.id != self.render_id {
                continue;
            }
            match resp.result {
                Ok(result) => {
                    self.apply_result(ctx, result);
                    self.render_phase = RenderPhase::Done;
                }
                Err(e) => {
                    warn!("Render failed: {e}");
                    self.render_phase = RenderPhase::Failed;
                }
            }
        }
    }

    fn apply_result(&mut self, ctx: &egui::Context, result: RenderResult) {
        let buffer = &result.buffer;
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width as usize, buffer.height as usize],
            &buffer.pixels,
        );
        match &mut self.texture {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("fractal", image, egui::TextureOptions::LINEAR))
            }
        }
        self.last_render = Some(RenderStats::from(&result));
    }
}

/// Numbers shown in the HUD about the most recent frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RenderStats {
    pub(crate) elapsed: std::time::Duration,
    pub(crate) escaped_pixels: usize,
    pub(crate) total_pixels: usize,
    pub(crate) max_iterations: u32,
    pub(crate) tier: mandelzoom_core::PrecisionTier,
}

impl From<&RenderResult> for RenderStats {
    fn from(r: &RenderResult) -> Self {
        Self {
            elapsed: r.elapsed,
            escaped_pixels: r.escaped_pixels,
            total_pixels: r.buffer.width as usize * r.buffer.height as usize,
            max_iterations: r.max_iterations,
            tier: r.tier,
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions — worker
// ---------------------------------------------------------------------------

fn drain_latest<T>(initial: T, rx: &mpsc::Receiver<T>) -> T {
    let mut req = initial;
    while let Ok(newer) = rx.try_recv() {
        req = newer;
    }
    req
}

/// Background render loop: always renders the newest queued request and
/// drops the ones it superseded.
pub(crate) fn render_worker(
    ctx: egui::Context,
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
) {
    while let Ok(initial) = rx.recv() {
        let req = drain_latest(initial, &rx);
        let result = render_frame(&req.params);
        if tx.send(RenderResponse { id: req.id, result }).is_err() {
            return;
        }
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_keeps_only_the_newest() {
        let (tx, rx) = mpsc::channel();
        for i in 2..=5 {
            tx.send(i).unwrap();
        }
        assert_eq!(drain_latest(1, &rx), 5);
        assert_eq!(drain_latest(9, &rx), 9);
    }

    #[test]
    fn worker_answers_latest_request_and_stops_when_app_leaves() {
        use mandelzoom_core::{Coordinator, PrecisionTier, Screen, ViewState};

        let (tx_req, rx_req) = mpsc::channel();
        let (tx_resp, rx_resp) = mpsc::channel();
        let params = Coordinator::default()
            .frame_params(
                &ViewState::default(),
                &Screen::new(16, 12, 1.0),
                PrecisionTier::Partial,
            )
            .unwrap();
        tx_req.send(RenderRequest { id: 1, params }).unwrap();
        tx_req.send(RenderRequest { id: 2, params }).unwrap();
        drop(tx_req);

        render_worker(egui::Context::default(), rx_req, tx_resp);

        let responses: Vec<_> = rx_resp.try_iter().collect();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].id, 2);
        assert!(responses[0].result.is_ok());
    }
}
