//! Structured error types for cellzoom.
//!
//! The coordinator and placement math are total; only the environment layer
//! (DOM wiring, option parsing) can fail.

/// All errors that can occur while wiring previews into a host page.
#[derive(Debug, thiserror::Error)]
pub enum CellZoomError {
    /// A DOM object was unavailable or a DOM call was rejected.
    #[error("DOM error: {0}")]
    Dom(String),

    /// Options could not be interpreted as a `ZoomConfig`.
    #[error("Invalid options: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Value could not cross the JS boundary.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CellZoomError>;

impl From<String> for CellZoomError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for CellZoomError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for CellZoomError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<CellZoomError> for wasm_bindgen::JsValue {
    fn from(e: CellZoomError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
