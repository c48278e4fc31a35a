use axum::{
    body::Body,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::de::DeserializeOwned;

/// Body limit for JSON requests (16 MiB, recorded audio arrives base64 encoded)
pub const BODY_LIMIT_BYTES: usize = 16 << 20;

/// Extractor for JSON request bodies
///
/// Rejections are plain-text responses: 415 for a missing or foreign
/// content type, 413 above [`BODY_LIMIT_BYTES`], 400 for undecodable JSON.
pub struct ExtractPayload<T>(pub T);

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let is_json = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !is_json {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Content-Type, expected: 'Content-Type: application/json'",
            )
                .into_response());
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                )
            } else {
                (StatusCode::BAD_REQUEST, format!("Failed to read request body: {err}"))
            }
            .into_response()
        })?;

        serde_json::from_slice::<T>(&bytes).map(Self).map_err(|e| {
            (StatusCode::BAD_REQUEST, format!("Failed to parse request body: {e}")).into_response()
        })
    }
}
