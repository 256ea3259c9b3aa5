use crate::view::ViewEvent;

/// Identifier of one pointer contact (touch id, or a fixed id for the mouse).
pub type ContactId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    id: ContactId,
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    /// One contact drags the view; `last` is the previous sample.
    Pan { id: ContactId, last: (f64, f64) },
    /// Two contacts pinch around a fixed anchor.
    Pinch {
        ids: [ContactId; 2],
        anchor: (f64, f64),
        initial_distance: f64,
        last_distance: f64,
    },
}

/// Tracks active contacts and turns their motion into [`ViewEvent`]s.
///
/// One contact pans by successive deltas. Two contacts pinch: each sample
/// zooms by `current / previous` distance around the midpoint recorded when
/// the pinch began, so the cumulative factor is `current / initial`.
/// Contacts beyond the first two are tracked but do not steer the view.
/// When a pinch drops to one contact, panning re-anchors at that contact's
/// current position.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    /// In arrival order.
    contacts: Vec<Contact>,
    mode: Mode,
}

impl GestureState {
    /// Start tracking with a first contact.
    pub fn begin(id: ContactId, x: f64, y: f64) -> Self {
        Self {
            contacts: vec![Contact { id, x, y }],
            mode: Mode::Pan { id, last: (x, y) },
        }
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self.mode, Mode::Pinch { .. })
    }

    /// Ratio of the current pinch distance to the one at pinch start.
    pub fn pinch_scale(&self) -> Option<f64> {
        match self.mode {
            Mode::Pinch {
                initial_distance,
                last_distance,
                ..
            } if initial_distance > 0.0 => Some(last_distance / initial_distance),
            _ => None,
        }
    }

    /// A new contact touched down.
    pub fn contact_down(&mut self, id: ContactId, x: f64, y: f64) {
        if let Some(existing) = self.contacts.iter_mut().find(|c| c.id == id) {
            existing.x = x;
            existing.y = y;
        } else {
            self.contacts.push(Contact { id, x, y });
        }
        self.rebuild_mode();
    }

    /// A contact moved. Returns the view change it causes, if any.
    pub fn contact_moved(&mut self, id: ContactId, x: f64, y: f64) -> Option<ViewEvent> {
        let contact = self.contacts.iter_mut().find(|c| c.id == id)?;
        contact.x = x;
        contact.y = y;

        let pinch_distance = match self.mode {
            Mode::Pinch { ids, .. } => self.distance(ids),
            Mode::Pan { .. } => None,
        };

        match &mut self.mode {
            Mode::Pan { id: pan_id, last } => {
                if *pan_id != id {
                    return None;
                }
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                (dx != 0.0 || dy != 0.0).then_some(ViewEvent::Pan { dx, dy })
            }
            Mode::Pinch {
                ids,
                anchor,
                initial_distance,
                last_distance,
            } => {
                if !ids.contains(&id) {
                    return None;
                }
                let distance = pinch_distance?;
                if *last_distance <= 0.0 {
                    // Both fingers started on the same spot; wait for them to part.
                    *last_distance = distance;
                    if *initial_distance <= 0.0 {
                        *initial_distance = distance;
                    }
                    return None;
                }
                let factor = distance / *last_distance;
                *last_distance = distance;
                (factor > 0.0 && factor != 1.0).then_some(ViewEvent::ZoomAtPoint {
                    x: anchor.0,
                    y: anchor.1,
                    factor,
                })
            }
        }
    }

    /// A contact lifted. Returns `false` once no contacts remain, at which
    /// point the tracker should be dropped.
    pub fn contact_up(&mut self, id: ContactId) -> bool {
        self.contacts.retain(|c| c.id != id);
        if self.contacts.is_empty() {
            return false;
        }
        let steering = match self.mode {
            Mode::Pan { id: pan_id, .. } => pan_id == id,
            Mode::Pinch { ids, .. } => ids.contains(&id),
        };
        if steering {
            self.rebuild_mode();
        }
        true
    }

    fn rebuild_mode(&mut self) {
        self.mode = match self.contacts.as_slice() {
            [] => return,
            [only] => Mode::Pan {
                id: only.id,
                last: (only.x, only.y),
            },
            [a, b, ..] => {
                // Keep an ongoing pinch if its pair is unchanged.
                if let Mode::Pinch { ids, .. } = self.mode {
                    if ids == [a.id, b.id] {
                        return;
                    }
                }
                let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
                Mode::Pinch {
                    ids: [a.id, b.id],
                    anchor: ((a.x + b.x) * 0.5, (a.y + b.y) * 0.5),
                    initial_distance: distance,
                    last_distance: distance,
                }
            }
        };
    }

    fn distance(&self, ids: [ContactId; 2]) -> Option<f64> {
        let a = self.contacts.iter().find(|c| c.id == ids[0])?;
        let b = self.contacts.iter().find(|c| c.id == ids[1])?;
        Some(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt())
    }
}
