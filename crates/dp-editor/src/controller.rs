//! Drawing surface controller.
//!
//! Owns the raster, the pointer state machine, the dirty flag, and the
//! status line. Hosts (the wasm bridge, the CLI) feed it input events and
//! button presses; it never performs I/O itself. A submit hands back a
//! [`PendingRequest`] which the host sends however it likes and reports
//! back through [`SurfaceController::on_prediction`].
//!
//! ```text
//!   Idle ──press──▶ Drawing ──move──▶ Drawing
//!    ▲                 │
//!    └──release/leave──┘
//! ```

use crate::input::{InputEvent, PointerSample};
use crate::predict::{PredictRequest, PredictResponse, TransportError};
use crate::status::Status;
use dp_core::{Raster, SurfaceRect, to_data_uri};

/// Pointer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Drawing,
}

/// What the host should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reaction {
    /// Suppress the host's default handling (scrolling, text selection).
    pub prevent_default: bool,
    /// A paint operation ran; the surface should be redrawn.
    pub painted: bool,
}

/// Identifies one outstanding prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u32);

impl Ticket {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A request the host must send to the predict endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub body: PredictRequest,
}

/// Result of pressing Predict.
#[derive(Debug, Clone, PartialEq)]
pub enum Submit {
    /// Nothing drawn since the last clear; the status now asks for a digit.
    NothingDrawn,
    /// A request is already in flight; nothing happened.
    Busy,
    /// The surface could not be encoded; the status shows a connection error.
    EncodeFailed,
    /// Send this request and report the outcome with `on_prediction`.
    Request(PendingRequest),
}

/// The drawing surface and everything that reacts to it.
pub struct SurfaceController {
    raster: Raster,
    state: PointerState,
    /// True iff at least one paint ran since the last clear.
    dirty: bool,
    status: Status,
    /// On-screen box of the surface, for client → raster mapping.
    display: SurfaceRect,
    in_flight: Option<Ticket>,
    next_ticket: u32,
}

impl Default for SurfaceController {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceController {
    pub fn new() -> Self {
        Self::with_raster(Raster::new())
    }

    pub fn with_raster(mut raster: Raster) -> Self {
        raster.clear();
        let display = SurfaceRect::identity(raster.width() as f64, raster.height() as f64);
        Self {
            raster,
            state: PointerState::Idle,
            dirty: false,
            status: Status::initial(),
            display,
            in_flight: None,
            next_ticket: 0,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_predicting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Update the surface's on-screen box (call on layout / resize).
    pub fn set_display_rect(&mut self, rect: SurfaceRect) {
        self.display = rect;
    }

    pub fn display_rect(&self) -> SurfaceRect {
        self.display
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Paint the brush at a raster-space point. Marks the surface dirty
    /// even if every cell was clipped away.
    pub fn apply_brush(&mut self, x: f64, y: f64) {
        self.raster.apply_brush(x, y);
        self.dirty = true;
    }

    fn paint_sample(&mut self, sample: &PointerSample) -> bool {
        let (w, h) = (self.raster.width() as f64, self.raster.height() as f64);
        match sample.raster_position(self.display, w, h) {
            Some((x, y)) => {
                self.apply_brush(x, y);
                true
            }
            None => false,
        }
    }

    // ─── Pointer protocol ────────────────────────────────────────────────

    /// Dispatch a normalized input event.
    pub fn handle(&mut self, event: &InputEvent) -> Reaction {
        match event {
            InputEvent::PressStart(sample) => self.on_press_start(sample),
            InputEvent::Move(sample) => self.on_move(sample),
            InputEvent::Release => self.on_release(),
            InputEvent::Leave => self.on_leave(),
        }
    }

    /// Mouse down / touch start: begin a stroke and paint at the press point.
    pub fn on_press_start(&mut self, sample: &PointerSample) -> Reaction {
        if self.state == PointerState::Idle {
            log::debug!("pointer: Idle -> Drawing");
        }
        self.state = PointerState::Drawing;
        Reaction {
            prevent_default: true,
            painted: self.paint_sample(sample),
        }
    }

    /// Mouse / touch move: paint only while a stroke is active.
    pub fn on_move(&mut self, sample: &PointerSample) -> Reaction {
        let painted = match self.state {
            PointerState::Drawing => self.paint_sample(sample),
            PointerState::Idle => false,
        };
        Reaction {
            prevent_default: true,
            painted,
        }
    }

    /// Mouse up / touch end: finish the stroke.
    pub fn on_release(&mut self) -> Reaction {
        if self.state == PointerState::Drawing {
            log::debug!("pointer: Drawing -> Idle");
        }
        self.state = PointerState::Idle;
        Reaction::default()
    }

    /// Pointer left the surface: same as a release.
    pub fn on_leave(&mut self) -> Reaction {
        self.on_release()
    }

    // ─── Buttons ─────────────────────────────────────────────────────────

    /// Predict button.
    pub fn on_submit(&mut self) -> Submit {
        if !self.dirty {
            self.status = Status::empty_surface();
            return Submit::NothingDrawn;
        }
        if let Some(ticket) = self.in_flight {
            log::debug!("submit ignored: request {} still in flight", ticket.raw());
            return Submit::Busy;
        }

        let image = match to_data_uri(&self.raster) {
            Ok(uri) => uri,
            Err(e) => {
                log::warn!("submit failed: {e}");
                self.status = Status::connection_error();
                return Submit::EncodeFailed;
            }
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.in_flight = Some(ticket);
        log::debug!("submit: request {} ({} byte payload)", ticket.raw(), image.len());
        Submit::Request(PendingRequest {
            ticket,
            body: PredictRequest { image },
        })
    }

    /// Report the outcome of a request issued by `on_submit`.
    ///
    /// Returns `false` (and changes nothing) if the ticket is not the
    /// outstanding one, e.g. the surface was cleared while it was in flight.
    pub fn on_prediction(
        &mut self,
        ticket: Ticket,
        outcome: Result<PredictResponse, TransportError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            log::debug!("dropping stale result for request {}", ticket.raw());
            return false;
        }
        self.in_flight = None;

        self.status = match outcome {
            Ok(response) => response.status(),
            Err(e) => {
                log::warn!("predict request {} failed: {e}", ticket.raw());
                Status::connection_error()
            }
        };
        true
    }

    /// Clear button: wipe the surface and reset the status line.
    pub fn on_clear(&mut self) {
        self.raster.clear();
        self.dirty = false;
        self.status = Status::initial();
        if let Some(ticket) = self.in_flight.take() {
            log::debug!("clear abandons request {}", ticket.raw());
        }
    }

    /// Submit and await the outcome in one step using `client`.
    ///
    /// Returns the submit decision; for `Submit::Request` the status already
    /// reflects the response when this returns.
    #[cfg(feature = "http")]
    pub async fn submit_with<C>(&mut self, client: &C) -> Submit
    where
        C: crate::client::PredictClient + ?Sized,
    {
        let submit = self.on_submit();
        if let Submit::Request(pending) = &submit {
            let outcome = client.predict(&pending.body).await;
            self.on_prediction(pending.ticket, outcome);
        }
        submit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{CONNECTION_ERROR_MESSAGE, EMPTY_SURFACE_MESSAGE, INITIAL_MESSAGE};
    use dp_core::GridCell;

    fn press(c: &mut SurfaceController, x: f64, y: f64) -> Reaction {
        c.handle(&InputEvent::PressStart(PointerSample::mouse(x, y)))
    }

    fn mv(c: &mut SurfaceController, x: f64, y: f64) -> Reaction {
        c.handle(&InputEvent::Move(PointerSample::mouse(x, y)))
    }

    #[test]
    fn starts_idle_clean_and_initial() {
        let c = SurfaceController::new();
        assert_eq!(c.state(), PointerState::Idle);
        assert!(!c.is_dirty());
        assert_eq!(c.status().text(), INITIAL_MESSAGE);
        assert!(!c.is_predicting());
    }

    #[test]
    fn press_paints_and_starts_drawing() {
        let mut c = SurfaceController::new();
        let r = press(&mut c, 100.0, 100.0);
        assert_eq!(
            r,
            Reaction {
                prevent_default: true,
                painted: true
            }
        );
        assert_eq!(c.state(), PointerState::Drawing);
        assert!(c.is_dirty());
        assert!(c.raster().is_inked(GridCell { row: 7, col: 7 }));
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let mut c = SurfaceController::new();
        let r = mv(&mut c, 100.0, 100.0);
        assert!(!r.painted);
        assert_eq!(c.state(), PointerState::Idle);
        assert!(!c.is_dirty());
        assert_eq!(c.raster().inked_cells().count(), 0);
    }

    #[test]
    fn move_while_drawing_paints() {
        let mut c = SurfaceController::new();
        press(&mut c, 20.0, 20.0);
        let r = mv(&mut c, 300.0, 300.0);
        assert!(r.painted && r.prevent_default);
        assert!(c.raster().is_inked(GridCell { row: 21, col: 21 }));
    }

    #[test]
    fn release_and_leave_stop_drawing_without_painting() {
        let mut c = SurfaceController::new();
        press(&mut c, 20.0, 20.0);
        let before = c.raster().inked_cells().count();
        let r = c.handle(&InputEvent::Release);
        assert_eq!(r, Reaction::default());
        assert_eq!(c.state(), PointerState::Idle);
        mv(&mut c, 300.0, 300.0);
        assert_eq!(c.raster().inked_cells().count(), before);

        press(&mut c, 20.0, 20.0);
        c.handle(&InputEvent::Leave);
        assert_eq!(c.state(), PointerState::Idle);
    }

    #[test]
    fn clipped_paint_still_marks_dirty() {
        let mut c = SurfaceController::new();
        press(&mut c, -500.0, -500.0);
        assert!(c.is_dirty());
        assert_eq!(c.raster().inked_cells().count(), 0);
    }

    #[test]
    fn press_without_position_does_not_paint() {
        let mut c = SurfaceController::new();
        let r = c.on_press_start(&PointerSample::Touch { touches: vec![] });
        assert!(!r.painted);
        assert_eq!(c.state(), PointerState::Drawing);
        assert!(!c.is_dirty());
    }

    #[test]
    fn display_rect_rescales_input() {
        let mut c = SurfaceController::new();
        c.set_display_rect(SurfaceRect::new(0.0, 0.0, 196.0, 196.0));
        press(&mut c, 10.0, 10.0);
        // (10, 10) CSS -> (20, 20) raster -> cell (1, 1)
        assert!(c.raster().is_inked(GridCell { row: 1, col: 1 }));
        assert!(c.raster().is_inked(GridCell { row: 2, col: 2 }));
        assert!(!c.raster().is_inked(GridCell { row: 3, col: 3 }));
    }

    #[test]
    fn submit_on_clean_surface_prompts() {
        let mut c = SurfaceController::new();
        assert_eq!(c.on_submit(), Submit::NothingDrawn);
        assert_eq!(c.status().text(), EMPTY_SURFACE_MESSAGE);
        assert!(!c.status().is_success());
        assert!(!c.is_predicting());
    }

    #[test]
    fn submit_clears_previous_success_when_clean() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        let Submit::Request(p) = c.on_submit() else {
            panic!("expected request");
        };
        c.on_prediction(
            p.ticket,
            Ok(PredictResponse::Prediction {
                label: "1".into(),
                confidence: "90".into(),
            }),
        );
        assert!(c.status().is_success());

        c.on_clear();
        c.on_submit();
        assert_eq!(c.status().text(), EMPTY_SURFACE_MESSAGE);
        assert!(!c.status().is_success());
    }

    #[test]
    fn submit_builds_png_data_uri() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        match c.on_submit() {
            Submit::Request(p) => {
                assert!(p.body.image.starts_with("data:image/png;base64,"));
            }
            other => panic!("expected request, got {other:?}"),
        }
        assert!(c.is_predicting());
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        assert!(matches!(c.on_submit(), Submit::Request(_)));
        assert_eq!(c.on_submit(), Submit::Busy);
    }

    #[test]
    fn transport_failure_shows_connection_error() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        let Submit::Request(p) = c.on_submit() else {
            panic!("expected request");
        };
        assert!(c.on_prediction(p.ticket, Err(TransportError::Network("refused".into()))));
        assert_eq!(c.status().text(), CONNECTION_ERROR_MESSAGE);
        assert!(!c.status().is_success());
        assert!(!c.is_predicting());
        // Still usable afterwards.
        assert!(matches!(c.on_submit(), Submit::Request(_)));
    }

    #[test]
    fn clear_drops_in_flight_result() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        let Submit::Request(p) = c.on_submit() else {
            panic!("expected request");
        };
        c.on_clear();
        assert!(!c.is_predicting());
        let applied = c.on_prediction(p.ticket, Ok(PredictResponse::Error("late".into())));
        assert!(!applied);
        assert_eq!(c.status().text(), INITIAL_MESSAGE);
    }

    #[test]
    fn clear_resets_everything() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        c.on_clear();
        assert!(!c.is_dirty());
        assert_eq!(c.raster().inked_cells().count(), 0);
        assert_eq!(c.status(), &Status::initial());
        // Clear on a clean surface is harmless.
        c.on_clear();
        assert!(!c.is_dirty());
    }

    #[test]
    fn clear_does_not_end_stroke() {
        let mut c = SurfaceController::new();
        press(&mut c, 50.0, 50.0);
        c.on_clear();
        assert_eq!(c.state(), PointerState::Drawing);
        mv(&mut c, 50.0, 50.0);
        assert!(c.is_dirty());
    }
}
