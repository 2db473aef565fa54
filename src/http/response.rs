//! Standard API reply envelope.
//!
//! ```text
//! {"CODE":"ok","DATA":null}
//! {"CODE":"UnknownAction","MESSAGE":"...","DATA":null}
//! ```

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub struct ApiReply {
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: Option<Value>,
}

impl ApiReply {
    /// Successful reply without data.
    pub fn ok() -> Self {
        Self {
            code: "ok".to_string(),
            message: None,
            data: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: Some(message.into()),
            data: None,
        }
    }
}

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
