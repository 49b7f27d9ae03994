use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON body extractor that reports which field failed to decode.
///
/// An empty body decodes as `{}`, so handlers can answer with their own
/// "missing field" message instead of a parse error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        bytes
    };

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if path == "." {
            AppError::bad_request(format!("Invalid JSON body: {inner}"))
        } else {
            AppError::bad_request(format!("Invalid value for `{path}`: {inner}"))
        }
    })?;

    deserializer
        .end()
        .map_err(|err| AppError::bad_request(format!("Invalid JSON body: {err}")))?;

    Ok(value)
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        decode_json(&bytes).map(ApiJson)
    }
}
