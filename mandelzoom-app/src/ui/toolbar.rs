use eframe::egui;

use mandelzoom_core::{PaletteId, ViewEvent};
use mandelzoom_render::{palette, ExportFormat, DEFAULT_JPEG_QUALITY};

use crate::app::{MandelZoomApp, HUD_CORNER_RADIUS, HUD_MARGIN};

const EXPORT_SCALES: [u32; 4] = [1, 2, 4, 8];

/// Width of the palette swatch drawn next to each palette name.
const SWATCH_WIDTH: f32 = 60.0;

impl MandelZoomApp {
    pub(crate) fn show_toolbar(&mut self, ctx: &egui::Context) {
        let mut palette_choice = None;
        let mut copy = false;
        let mut apply_share = false;
        let mut export = false;
        let mut toggle_tier = false;
        let mut reset = false;

        egui::Area::new(egui::Id::new("hud_toolbar"))
            .anchor(egui::Align2::RIGHT_TOP, [-HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(160))
                    .inner_margin(egui::Margin::same(6))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.set_max_width(280.0);

                        let current = self.session.view().palette;
                        egui::ComboBox::from_label("Palette")
                            .selected_text(current.label())
                            .show_ui(ui, |ui| {
                                for id in PaletteId::ALL {
                                    ui.horizontal(|ui| {
                                        palette_swatch(ui, id);
                                        if ui.selectable_label(id == current, id.label()).clicked()
                                        {
                                            palette_choice = Some(id);
                                        }
                                    });
                                }
                            });

                        ui.horizontal(|ui| {
                            if ui
                                .button(format!("Precision: {}", self.preferences.precision.label()))
                                .on_hover_text("Toggle partial/rigorous compensation (T)")
                                .clicked()
                            {
                                toggle_tier = true;
                            }
                            if ui.button("Reset").on_hover_text("Reset view (R)").clicked() {
                                reset = true;
                            }
                        });

                        ui.separator();
                        ui.horizontal(|ui| {
                            if ui
                                .button("Copy view")
                                .on_hover_text("Copy the view as a share string (C)")
                                .clicked()
                            {
                                copy = true;
                            }
                            let edit = ui.add(
                                egui::TextEdit::singleline(&mut self.share_input)
                                    .hint_text("paste share string")
                                    .desired_width(120.0),
                            );
                            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                apply_share = true;
                            }
                            if ui.button("Go").clicked() {
                                apply_share = true;
                            }
                        });

                        ui.separator();
                        self.export_controls(ui, &mut export);
                    });
            });

        if let Some(id) = palette_choice {
            self.session.handle(ViewEvent::SetPalette(id));
        }
        if toggle_tier {
            self.toggle_precision();
        }
        if reset {
            self.session.handle(ViewEvent::Reset);
        }
        if copy {
            self.copy_share(ctx);
        }
        if apply_share {
            let text = std::mem::take(&mut self.share_input);
            self.import_share(&text);
        }
        if export {
            self.start_export(ctx);
        }
    }

    fn export_controls(&mut self, ui: &mut egui::Ui, export: &mut bool) {
        let running = self.export_running();
        ui.add_enabled_ui(!running, |ui| {
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt("export_scale")
                    .width(48.0)
                    .selected_text(format!("{}\u{00d7}", self.preferences.export_scale))
                    .show_ui(ui, |ui| {
                        for s in EXPORT_SCALES {
                            ui.selectable_value(
                                &mut self.preferences.export_scale,
                                s,
                                format!("{s}\u{00d7}"),
                            );
                        }
                    });

                let is_png = self.preferences.export_format == ExportFormat::Png;
                if ui.selectable_label(!is_png, "JPEG").clicked() && is_png {
                    self.preferences.export_format = ExportFormat::Jpeg {
                        quality: DEFAULT_JPEG_QUALITY,
                    };
                }
                if ui.selectable_label(is_png, "PNG").clicked() {
                    self.preferences.export_format = ExportFormat::Png;
                }
            });

            if let ExportFormat::Jpeg { quality } = &mut self.preferences.export_format {
                ui.add(egui::Slider::new(quality, 1..=100).text("Quality"));
            }

            let screen = self.session.screen();
            let label = format!(
                "Export {}\u{00d7}{}",
                screen.width.saturating_mul(self.preferences.export_scale),
                screen.height.saturating_mul(self.preferences.export_scale),
            );
            if ui.button(label).on_hover_text("Export image (E)").clicked() {
                *export = true;
            }
        });
        if running {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Exporting\u{2026}");
            });
        }
    }
}

fn palette_swatch(ui: &mut egui::Ui, id: PaletteId) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(SWATCH_WIDTH, 12.0), egui::Sense::hover());
    let colors = palette::preview_colors(id, SWATCH_WIDTH as usize);
    let painter = ui.painter_at(rect);
    for (i, [r, g, b, _]) in colors.into_iter().enumerate() {
        let x = rect.min.x + i as f32;
        painter.rect_filled(
            egui::Rect::from_min_max(egui::pos2(x, rect.min.y), egui::pos2(x + 1.0, rect.max.y)),
            0.0,
            egui::Color32::from_rgb(r, g, b),
        );
    }
}
