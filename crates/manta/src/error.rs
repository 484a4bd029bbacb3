use objkv_core::{StoreError, StoreErrorKind};
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    #[serde(default)]
    message: String,
}

/// Maps a service error code onto the kinds the backend distinguishes.
pub fn classify_code(code: &str) -> StoreErrorKind {
    if code.contains("ResourceNotFound") {
        StoreErrorKind::NotFound
    } else if code.contains("DirectoryDoesNotExist") {
        StoreErrorKind::DirectoryMissing
    } else if code.contains("DirectoryNotEmpty") {
        StoreErrorKind::DirectoryNotEmpty
    } else {
        StoreErrorKind::Other
    }
}

/// Builds a [`StoreError`] from a failed response's status and body.
pub fn from_response(method: &str, path: &str, status: StatusCode, body: &[u8]) -> StoreError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => StoreError::new(
            classify_code(&err.code),
            format!("{method} {path} returned {status}: {}: {}", err.code, err.message),
        ),
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let message = format!("{method} {path} returned {status}: {}", text.trim());
            if status == StatusCode::NOT_FOUND {
                StoreError::not_found(message)
            } else {
                StoreError::other(message)
            }
        }
    }
}
