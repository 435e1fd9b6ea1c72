//! Response envelope types for the HTTP entry shim
//!
//! The shim owns transport concerns (CORS decoration, the OPTIONS
//! preflight, status codes on the wire); these types pin down the body
//! shapes it passes through.

use serde::{Deserialize, Serialize};

use rampart_core::AnalysisError;

/// Non-200 body: `{"error": message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code and serialised body for a failed request.
pub fn error_envelope(err: &AnalysisError) -> (u16, String) {
    let body = serde_json::to_string(&ErrorBody {
        error: err.to_string(),
    })
    .unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string());
    (err.status_code(), body)
}
