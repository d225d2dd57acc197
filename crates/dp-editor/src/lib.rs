#[cfg(feature = "http")]
pub mod client;
pub mod config;
pub mod controller;
pub mod input;
pub mod predict;
pub mod status;

#[cfg(feature = "http")]
pub use client::{HttpPredictClient, PredictClient};
pub use config::{ClientConfig, ConfigError};
pub use controller::{PendingRequest, PointerState, Reaction, Submit, SurfaceController, Ticket};
pub use input::{InputEvent, PointerSample};
pub use predict::{PredictRequest, PredictResponse, TransportError};
pub use status::Status;
