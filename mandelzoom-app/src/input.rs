use eframe::egui;

use mandelzoom_core::{ContactId, NudgeDirection, PrecisionTier, ViewEvent};

use crate::app::{CursorProbe, MandelZoomApp};

/// Contact id used for the mouse; touch ids come from the platform.
const MOUSE_CONTACT: ContactId = ContactId::MAX;

/// Scroll distance (points) of one mouse-wheel line.
const POINTS_PER_WHEEL_NOTCH: f32 = 40.0;

impl MandelZoomApp {
    /// Physical-pixel position of `pos` relative to the canvas.
    fn to_canvas(&self, rect: egui::Rect, pos: egui::Pos2) -> (f64, f64) {
        let screen = self.session.screen();
        (
            screen.to_physical(pos.x - rect.min.x),
            screen.to_physical(pos.y - rect.min.y),
        )
    }

    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let rect = response.rect;

        // -- Touch contacts --
        let touches: Vec<(u64, egui::TouchPhase, egui::Pos2)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Touch { id, phase, pos, .. } => Some((id.0, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });
        for (id, phase, pos) in touches {
            let (x, y) = self.to_canvas(rect, pos);
            match phase {
                egui::TouchPhase::Start => {
                    self.touch_contacts += 1;
                    self.session.contact_down(id, x, y);
                }
                egui::TouchPhase::Move => self.session.contact_moved(id, x, y),
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    self.touch_contacts = self.touch_contacts.saturating_sub(1);
                    self.session.contact_up(id);
                }
            }
        }
        // Touch input also arrives as emulated pointer events; ignore those.
        let touch_active = self.touch_contacts > 0;

        // -- Mouse drag --
        if !touch_active {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = self.to_canvas(rect, pos);
                if response.drag_started_by(egui::PointerButton::Primary) {
                    self.session.contact_down(MOUSE_CONTACT, x, y);
                } else if response.dragged_by(egui::PointerButton::Primary) {
                    self.session.contact_moved(MOUSE_CONTACT, x, y);
                }
            }
            if response.drag_stopped_by(egui::PointerButton::Primary) {
                self.session.contact_up(MOUSE_CONTACT);
            }
        }

        // -- Wheel and trackpad pinch --
        if let Some(pos) = response.hover_pos() {
            let (x, y) = self.to_canvas(rect, pos);
            let (scroll_y, zoom_delta) = ctx.input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));
            if let Some(notches) = wheel_notches(scroll_y, zoom_delta) {
                self.session.wheel(x, y, notches);
            }
            if !touch_active && zoom_delta != 1.0 {
                self.session.handle(ViewEvent::ZoomAtPoint {
                    x,
                    y,
                    factor: zoom_delta as f64,
                });
            }

            let point = self.session.view().screen_to_plane(self.session.screen(), x, y);
            let result = self
                .coordinator
                .probe(self.session.view(), self.session.screen(), x, y);
            self.cursor_probe = Some(CursorProbe { point, result });
        } else {
            self.cursor_probe = None;
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let text_editing = ctx.memory(|m| m.focused().is_some());
        if text_editing {
            return;
        }

        let pasted: Vec<String> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Paste(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        });
        for text in pasted {
            self.import_share(&text);
        }

        ctx.input(|input| {
            let nudges = [
                (egui::Key::ArrowLeft, NudgeDirection::Left),
                (egui::Key::ArrowRight, NudgeDirection::Right),
                (egui::Key::ArrowUp, NudgeDirection::Up),
                (egui::Key::ArrowDown, NudgeDirection::Down),
                (egui::Key::Plus, NudgeDirection::ZoomIn),
                (egui::Key::Equals, NudgeDirection::ZoomIn),
                (egui::Key::Minus, NudgeDirection::ZoomOut),
            ];
            for (key, direction) in nudges {
                if input.key_pressed(key) {
                    self.session.handle(ViewEvent::Nudge(direction));
                }
            }

            if input.key_pressed(egui::Key::R) && !input.modifiers.command {
                self.session.handle(ViewEvent::Reset);
            }
            if input.key_pressed(egui::Key::P) {
                let next = self.session.view().palette.next();
                self.session.handle(ViewEvent::SetPalette(next));
            }
            if input.key_pressed(egui::Key::T) {
                self.toggle_precision();
            }
            if input.key_pressed(egui::Key::H) {
                self.preferences.show_hud = !self.preferences.show_hud;
            }
            if input.key_pressed(egui::Key::Escape) {
                self.session.cancel_gesture();
                self.touch_contacts = 0;
            }
        });

        if ctx.input(|i| i.key_pressed(egui::Key::C) && !i.modifiers.command) {
            self.copy_share(ctx);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::E)) {
            self.start_export(ctx);
        }
    }

    pub(crate) fn toggle_precision(&mut self) {
        self.preferences.precision = match self.preferences.precision {
            PrecisionTier::Partial => PrecisionTier::Rigorous,
            PrecisionTier::Rigorous => PrecisionTier::Partial,
        };
        let view = *self.session.view();
        self.session.set_view(view);
    }
}

/// Wheel notches in this frame. A frame where egui already reports a zoom
/// (Ctrl+wheel, trackpad pinch) is handled by the zoom path alone.
fn wheel_notches(scroll_y: f32, zoom_delta: f32) -> Option<f64> {
    if scroll_y == 0.0 || zoom_delta != 1.0 {
        return None;
    }
    Some((scroll_y / POINTS_PER_WHEEL_NOTCH) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_wheel_scrolls_in_notches() {
        assert_eq!(wheel_notches(80.0, 1.0), Some(2.0));
        assert_eq!(wheel_notches(-40.0, 1.0), Some(-1.0));
        assert_eq!(wheel_notches(0.0, 1.0), None);
    }

    #[test]
    fn modifier_zoom_is_not_counted_twice() {
        // Ctrl+wheel shows up as both a scroll and a zoom delta.
        assert_eq!(wheel_notches(40.0, 1.1), None);
        assert_eq!(wheel_notches(-40.0, 0.9), None);
    }
}
