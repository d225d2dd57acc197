//! Status line shown under the surface.

/// Shown on load and after every clear.
pub const INITIAL_MESSAGE: &str = "Draw a digit and press Predict";

/// Shown when Predict is pressed on an empty surface.
pub const EMPTY_SURFACE_MESSAGE: &str = "Please draw a digit first";

/// Shown for any transport failure; the detail only goes to the log.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to server";

/// Status text plus its binary style (plain vs. success).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    text: String,
    success: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self::initial()
    }
}

impl Status {
    pub fn initial() -> Self {
        Self::plain(INITIAL_MESSAGE)
    }

    pub fn empty_surface() -> Self {
        Self::plain(EMPTY_SURFACE_MESSAGE)
    }

    pub fn connection_error() -> Self {
        Self::plain(CONNECTION_ERROR_MESSAGE)
    }

    /// An error reported by the server, surfaced verbatim.
    pub fn server_error(message: &str) -> Self {
        Self::plain(format!("Error: {message}"))
    }

    /// A successful classification.
    pub fn prediction(label: &str, confidence: &str) -> Self {
        Self {
            text: format!("Prediction: {label}  |  Confidence: {confidence}%"),
            success: true,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
