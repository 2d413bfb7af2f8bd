//! Extract a decoded [`ReadRequest`] from the query string.

use crate::error::AppError;
use crate::query::{decode, ReadRequest};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

#[async_trait]
impl<S> FromRequestParts<S> for ReadRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri).map_err(|e| {
            tracing::warn!(uri = %parts.uri, error = %e, "read request: query not decodable");
            AppError::BadRequest(e.body_text())
        })?;
        decode(pairs).map_err(|e| {
            tracing::warn!(uri = %parts.uri, error = %e, "read request: bind failed");
            e
        })
    }
}
