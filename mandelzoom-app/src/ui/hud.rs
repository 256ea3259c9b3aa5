use eframe::egui;

use mandelzoom_core::{share, IterationResult};

use crate::app::{MandelZoomApp, HUD_CORNER_RADIUS, HUD_MARGIN};
use crate::render_bridge::RenderPhase;

impl MandelZoomApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        self.show_notification(ctx);
        if !self.preferences.show_hud {
            return;
        }

        let hud_alpha =
            (self.preferences.hud_panel_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let view = *self.session.view();

        // -- Top-left: view info --
        egui::Area::new(egui::Id::new("hud_params"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));

                        ui.label(format!("Re: {}", share::format_extended(view.center.re)));
                        ui.label(format!("Im: {}", share::format_extended(view.center.im)));
                        ui.label(format!("Zoom: {:.3e}", view.zoom));
                        ui.label(format!(
                            "Iterations: {}",
                            self.coordinator.parallel_policy().max_iterations(view.zoom)
                        ));
                        ui.label(format!("Precision: {}", self.preferences.precision.label()));
                        ui.label(format!("Palette: {}", view.palette.label()));

                        if let Some(g) = self.session.gesture() {
                            if let Some(scale) = g.pinch_scale() {
                                ui.label(format!("Pinch \u{00d7}{scale:.2}"));
                            }
                        }
                    });
            });

        // -- Bottom-left: cursor probe --
        if let Some(probe) = self.cursor_probe {
            egui::Area::new(egui::Id::new("hud_probe"))
                .anchor(egui::Align2::LEFT_BOTTOM, [HUD_MARGIN, -HUD_MARGIN])
                .show(ctx, |ui| {
                    egui::Frame::NONE
                        .fill(egui::Color32::from_black_alpha(hud_alpha))
                        .inner_margin(egui::Margin::same(8))
                        .corner_radius(HUD_CORNER_RADIUS)
                        .show(ui, |ui| {
                            ui.style_mut().visuals.override_text_color =
                                Some(egui::Color32::from_rgb(200, 200, 200));
                            let (re, im) = probe.point.to_f64();
                            ui.label(format!("Cursor: {re:.15} {im:+.15}i"));
                            match probe.result {
                                IterationResult::Escaped { .. } => ui.label(format!(
                                    "Escaped after {} (smooth {:.2})",
                                    probe.result.count(),
                                    probe.result.smooth_value().unwrap_or_default()
                                )),
                                IterationResult::Bounded { iterations } => {
                                    ui.label(format!("Bounded after {iterations}"))
                                }
                            };
                        });
                });
        }

        // -- Bottom-centre: render stats --
        egui::Area::new(egui::Id::new("hud_render"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(hud_alpha))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.set_min_width(180.0);
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(200, 200, 200));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        let phase_color = match self.render_phase {
                            RenderPhase::Idle => egui::Color32::GRAY,
                            RenderPhase::Rendering => egui::Color32::YELLOW,
                            RenderPhase::Done => egui::Color32::from_rgb(100, 255, 100),
                            RenderPhase::Failed => egui::Color32::from_rgb(255, 100, 100),
                        };
                        ui.colored_label(phase_color, self.render_phase.label());

                        if let Some(stats) = self.last_render {
                            ui.label(format!(
                                "{:.1} ms, {} iterations, {}",
                                stats.elapsed.as_secs_f64() * 1000.0,
                                stats.max_iterations,
                                stats.tier.label(),
                            ));
                            ui.label(format!(
                                "{} of {} px escaped",
                                stats.escaped_pixels, stats.total_pixels
                            ));
                        }
                    });
            });
    }

    fn show_notification(&self, ctx: &egui::Context) {
        let Some(note) = &self.notification else {
            return;
        };
        egui::Area::new(egui::Id::new("hud_notification"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(200))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        let color = if note.is_error {
                            egui::Color32::from_rgb(255, 120, 100)
                        } else {
                            egui::Color32::from_rgb(140, 230, 140)
                        };
                        ui.colored_label(color, &note.text);
                    });
            });
    }
}
