//! Error types for the pixel bridge

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// JS `Error.name` given to lookup failures
pub const ELEMENT_NOT_FOUND_NAME: &str = "ElementNotFoundError";

/// Errors that can occur while answering a pixel request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// No element at the given path
    #[error("no element matches `{selector}`")]
    ElementNotFound { selector: String },

    /// An element exists at the path but has the wrong shape
    #[error("element `{selector}` is not a {expected}")]
    UnexpectedElement {
        selector: String,
        expected: &'static str,
    },

    /// The element to rasterize has no area
    #[error("cannot read pixels from an empty {width}x{height} surface")]
    EmptySurface { width: u32, height: u32 },

    /// The browser rejected a drawing surface operation
    #[error("canvas operation failed: {0}")]
    Canvas(String),

    /// A signal port is missing or misbehaved
    #[error("port `{name}`: {message}")]
    Port { name: String, message: String },

    /// The page environment is missing something the bridge needs
    #[error("host environment: {0}")]
    Host(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Byte count does not match the declared dimensions
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

impl BridgeError {
    pub fn port(name: &str, message: impl Into<String>) -> Self {
        BridgeError::Port {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// True for the ElementNotFoundError kind: a required element is absent
    /// or structurally unexpected.
    pub fn is_element_not_found(&self) -> bool {
        matches!(
            self,
            BridgeError::ElementNotFound { .. } | BridgeError::UnexpectedElement { .. }
        )
    }
}

/// Renders a JS exception into a message. Browser exceptions are usually
/// `DOMException`s, which print poorly through `Debug`.
pub fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        let js_err = js_sys::Error::new(&err.to_string());
        if err.is_element_not_found() {
            js_err.set_name(ELEMENT_NOT_FOUND_NAME);
        }
        js_err.into()
    }
}
