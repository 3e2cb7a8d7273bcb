use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("browser error: {0}")]
    Js(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("mesh error: {0}")]
    Mesh(String),

    #[error("invalid body {name}: {reason}")]
    InvalidBody { name: String, reason: &'static str },
}

impl From<JsValue> for ViewerError {
    fn from(value: JsValue) -> Self {
        ViewerError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
