use tracing::debug;

use crate::gesture::{ContactId, GestureState};
use crate::view::{Screen, ViewEvent, ViewState, WHEEL_ZOOM_FACTOR};

/// Coalesces redraw requests into at most one frame per refresh tick.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    pending: bool,
    coalesced: u64,
}

impl RedrawScheduler {
    /// Ask for a redraw on the next tick. Repeated requests before the tick
    /// collapse into one.
    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
        }
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Requests folded into an already pending redraw since startup.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

/// The state captured when a redraw fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub view: ViewState,
    pub screen: Screen,
}

/// Host-side interaction state: the view, any gesture in progress, the
/// current screen and the redraw scheduler.
///
/// Every handler mutates the view synchronously and requests a redraw;
/// [`take_frame`](Self::take_frame) is called once per refresh tick.
#[derive(Debug, Clone)]
pub struct Session {
    view: ViewState,
    gesture: Option<GestureState>,
    screen: Screen,
    redraw: RedrawScheduler,
}

impl Session {
    pub fn new(view: ViewState, screen: Screen) -> Self {
        let mut redraw = RedrawScheduler::default();
        redraw.request();
        Self {
            view,
            gesture: None,
            screen,
            redraw,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.redraw
    }

    /// Apply a view event and schedule a redraw if anything changed.
    pub fn handle(&mut self, event: ViewEvent) {
        let next = self.view.apply(event, &self.screen);
        if next != self.view {
            debug!(?event, zoom = next.zoom, "view updated");
            self.view = next;
            self.redraw.request();
        }
    }

    /// Replace the whole view (e.g. from a pasted share string).
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
        self.redraw.request();
    }

    /// The render surface changed size or DPI.
    pub fn resize(&mut self, screen: Screen) {
        if screen != self.screen {
            debug!(
                width = screen.width,
                height = screen.height,
                scale_factor = screen.scale_factor,
                "screen resized"
            );
            self.screen = screen;
            self.redraw.request();
        }
    }

    /// Mouse wheel: each notch zooms by a fixed factor at the cursor.
    /// Positive notches zoom in.
    pub fn wheel(&mut self, x: f64, y: f64, notches: f64) {
        if notches == 0.0 || !notches.is_finite() {
            return;
        }
        self.handle(ViewEvent::ZoomAtPoint {
            x,
            y,
            factor: WHEEL_ZOOM_FACTOR.powf(notches),
        });
    }

    pub fn contact_down(&mut self, id: ContactId, x: f64, y: f64) {
        match &mut self.gesture {
            Some(g) => g.contact_down(id, x, y),
            None => self.gesture = Some(GestureState::begin(id, x, y)),
        }
    }

    pub fn contact_moved(&mut self, id: ContactId, x: f64, y: f64) {
        let event = self
            .gesture
            .as_mut()
            .and_then(|g| g.contact_moved(id, x, y));
        if let Some(event) = event {
            self.handle(event);
        }
    }

    pub fn contact_up(&mut self, id: ContactId) {
        let still_active = self.gesture.as_mut().is_some_and(|g| g.contact_up(id));
        if !still_active {
            self.gesture = None;
        }
    }

    /// Drop any gesture in progress (e.g. the pointer left the window).
    pub fn cancel_gesture(&mut self) {
        self.gesture = None;
    }

    /// Refresh tick: if a redraw is pending, snapshot the current state.
    pub fn take_frame(&mut self) -> Option<FrameSnapshot> {
        self.redraw.take().then_some(FrameSnapshot {
            view: self.view,
            screen: self.screen,
        })
    }
}
