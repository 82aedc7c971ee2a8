use gloo_utils::format::JsValueSerdeExt;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::{BridgeError, Result};

/// Class of the `<img>` showing the user's upload
pub const UPLOADED_IMAGE_CLASS: &str = "images-original_image_container-image";
/// Class of the element wrapping the generated candidate canvas
pub const GENERATED_IMAGE_CLASS: &str = "images-image_container-generated_image_canvas";

/// Startup options passed from the host page to `boot`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Id of the element the application is mounted into
    pub container_id: String,

    /// Stylesheet href to attach to `<head>`, if any
    pub stylesheet: Option<String>,

    pub uploaded_image_class: String,
    pub generated_image_class: String,

    /// One of `error`, `warn`, `info`, `debug`, `trace`
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            container_id: "main".to_string(),
            stylesheet: None,
            uploaded_image_class: UPLOADED_IMAGE_CLASS.to_string(),
            generated_image_class: GENERATED_IMAGE_CLASS.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read from a JS object; `undefined` and `null` give the defaults
    pub fn from_js(value: &JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: Self = value
            .into_serde()
            .map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn level(&self) -> Result<log::Level> {
        self.log_level
            .parse()
            .map_err(|_| BridgeError::Config(format!("unknown log level `{}`", self.log_level)))
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("container_id", &self.container_id),
            ("uploaded_image_class", &self.uploaded_image_class),
            ("generated_image_class", &self.generated_image_class),
        ] {
            if value.trim().is_empty() {
                return Err(BridgeError::Config(format!("`{}` must not be empty", key)));
            }
        }
        self.level()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.container_id, "main");
        assert_eq!(config.uploaded_image_class, UPLOADED_IMAGE_CLASS);
        assert_eq!(config.generated_image_class, GENERATED_IMAGE_CLASS);
        assert_eq!(config.level().unwrap(), log::Level::Info);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            BridgeConfig::from_json(r#"{"stylesheet": "css/index.css", "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(config.stylesheet.as_deref(), Some("css/index.css"));
        assert_eq!(config.level().unwrap(), log::Level::Debug);
        assert_eq!(config.container_id, "main");
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = BridgeConfig::from_json(r#"{"log_level": "loud"}"#).unwrap_err();
        assert_eq!(err, BridgeError::Config("unknown log level `loud`".into()));
    }

    #[test]
    fn test_empty_class_rejected() {
        let err = BridgeConfig::from_json(r#"{"uploaded_image_class": " "}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            BridgeConfig::from_json("{").unwrap_err(),
            BridgeError::Config(_)
        ));
    }
}
