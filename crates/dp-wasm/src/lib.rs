//! WASM bridge for Digit Pad — exposes the surface controller to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the page that
//! hosts the canvas. The page forwards DOM events, draws with `render`, and
//! performs the `fetch` for each request `submit` hands out:
//!
//! ```js
//! const pad = new DigitPad();
//! canvas.addEventListener("mousedown", (e) => {
//!   const r = canvas.getBoundingClientRect();
//!   pad.set_display_rect(r.left, r.top, r.width, r.height);
//!   const out = JSON.parse(pad.handle_press(e.clientX, e.clientY));
//!   if (out.preventDefault) e.preventDefault();
//!   if (out.painted) pad.render(ctx);
//! });
//!
//! predictBtn.onclick = async () => {
//!   const call = JSON.parse(pad.submit());
//!   if (call.action === "request") {
//!     try {
//!       const res = await fetch(pad.predict_path(), {
//!         method: "POST",
//!         headers: { "Content-Type": "application/json" },
//!         body: call.body,
//!       });
//!       pad.apply_response(call.ticket, await res.text());
//!     } catch (err) {
//!       pad.apply_transport_error(call.ticket, String(err));
//!     }
//!   }
//!   showStatus(pad.status_text(), pad.status_success());
//! };
//! ```

mod render2d;

use dp_core::SurfaceRect;
use dp_editor::controller::{PointerState, Reaction, Submit, SurfaceController, Ticket};
use dp_editor::input::{InputEvent, PointerSample};
use dp_editor::predict::{PREDICT_PATH, PredictResponse, TransportError};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing surface controller.
///
/// All interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct DigitPad {
    controller: SurfaceController,
}

impl Default for DigitPad {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl DigitPad {
    /// Create a controller with a cleared 392×392 surface.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            controller: SurfaceController::new(),
        }
    }

    /// Record the canvas's on-screen box (`getBoundingClientRect()`).
    pub fn set_display_rect(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.controller
            .set_display_rect(SurfaceRect::new(left, top, width, height));
    }

    /// Backing raster width; use for `canvas.width`.
    pub fn raster_width(&self) -> u32 {
        self.controller.raster().width()
    }

    /// Backing raster height; use for `canvas.height`.
    pub fn raster_height(&self) -> u32 {
        self.controller.raster().height()
    }

    /// Render the surface to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        render2d::render_raster(ctx, self.controller.raster());
    }

    // ─── Pointer events ──────────────────────────────────────────────────
    //
    // Each returns `{"preventDefault":bool,"painted":bool}`.

    /// `mousedown`.
    pub fn handle_press(&mut self, client_x: f64, client_y: f64) -> String {
        let sample = PointerSample::mouse(client_x, client_y);
        reaction_json(self.controller.handle(&InputEvent::PressStart(sample)))
    }

    /// `mousemove`.
    pub fn handle_move(&mut self, client_x: f64, client_y: f64) -> String {
        let sample = PointerSample::mouse(client_x, client_y);
        reaction_json(self.controller.handle(&InputEvent::Move(sample)))
    }

    /// `touchstart`. `touches` is the flattened `[x0, y0, x1, y1, ...]`
    /// client positions of `event.touches`.
    pub fn handle_touch_start(&mut self, touches: &[f64]) -> String {
        let sample = touch_sample(touches);
        reaction_json(self.controller.handle(&InputEvent::PressStart(sample)))
    }

    /// `touchmove`, same layout as `handle_touch_start`.
    pub fn handle_touch_move(&mut self, touches: &[f64]) -> String {
        let sample = touch_sample(touches);
        reaction_json(self.controller.handle(&InputEvent::Move(sample)))
    }

    /// `mouseup` / `touchend`.
    pub fn handle_release(&mut self) -> String {
        reaction_json(self.controller.handle(&InputEvent::Release))
    }

    /// `mouseleave`.
    pub fn handle_leave(&mut self) -> String {
        reaction_json(self.controller.handle(&InputEvent::Leave))
    }

    // ─── Buttons ─────────────────────────────────────────────────────────

    /// Predict button. Returns JSON:
    /// - `{"action":"request","ticket":n,"body":"<json>"}` — POST `body`
    ///   to `predict_path()` and report back with `apply_response`.
    /// - `{"action":"none","reason":"nothing-drawn"|"busy"|"encode-failed"}`.
    pub fn submit(&mut self) -> String {
        let value = match self.controller.on_submit() {
            Submit::Request(pending) => serde_json::json!({
                "action": "request",
                "ticket": pending.ticket.raw(),
                "body": pending.body.to_json(),
            }),
            Submit::NothingDrawn => none_json("nothing-drawn"),
            Submit::Busy => none_json("busy"),
            Submit::EncodeFailed => none_json("encode-failed"),
        };
        value.to_string()
    }

    /// Report a response body for `ticket`. Returns `false` if the ticket
    /// is stale (cleared or superseded) and the body was ignored.
    pub fn apply_response(&mut self, ticket: u32, body: &str) -> bool {
        let outcome = PredictResponse::from_body(body);
        self.controller.on_prediction(Ticket::from_raw(ticket), outcome)
    }

    /// Report that the request for `ticket` failed to complete.
    pub fn apply_transport_error(&mut self, ticket: u32, message: &str) -> bool {
        log::warn!("fetch for request {ticket} failed: {message}");
        let outcome = Err(TransportError::Network(message.to_string()));
        self.controller.on_prediction(Ticket::from_raw(ticket), outcome)
    }

    /// Clear button.
    pub fn clear(&mut self) {
        self.controller.on_clear();
    }

    // ─── State queries ───────────────────────────────────────────────────

    pub fn status_text(&self) -> String {
        self.controller.status().text().to_string()
    }

    /// Whether the status should use the success style.
    pub fn status_success(&self) -> bool {
        self.controller.status().is_success()
    }

    pub fn is_dirty(&self) -> bool {
        self.controller.is_dirty()
    }

    /// True while a request is outstanding; disable the Predict button.
    pub fn is_predicting(&self) -> bool {
        self.controller.is_predicting()
    }

    pub fn is_drawing(&self) -> bool {
        self.controller.state() == PointerState::Drawing
    }

    /// Relative URL of the predict route.
    pub fn predict_path(&self) -> String {
        PREDICT_PATH.to_string()
    }

    /// The 28×28 grid as 0/1 intensities, row-major.
    pub fn intensity_grid(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.controller.raster().intensity_grid().as_slice())
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

fn touch_sample(flat: &[f64]) -> PointerSample {
    PointerSample::Touch {
        touches: flat.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
    }
}

fn reaction_json(reaction: Reaction) -> String {
    format!(
        r#"{{"preventDefault":{},"painted":{}}}"#,
        reaction.prevent_default, reaction.painted
    )
}

fn none_json(reason: &str) -> serde_json::Value {
    serde_json::json!({ "action": "none", "reason": reason })
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Digit Pad WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
