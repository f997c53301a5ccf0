//! Parameter extraction for POST routes.
//!
//! Clients send POST fields either as an urlencoded body or in the query
//! string. Both are merged, with body fields winning over query fields of the
//! same name, and anything unreadable is a 400 rather than a 415.

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use axum::http::{header, Uri};
use serde::de::DeserializeOwned;

use super::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub struct FormValues<T>(pub T);

impl<S, T> FromRequest<S> for FormValues<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().unwrap_or_default().to_string();
        let reads_body = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(true, |value| value.starts_with(FORM_CONTENT_TYPE));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest("Could not read request body".to_string()))?;
        let body = if reads_body {
            std::str::from_utf8(&bytes)
                .map_err(|_| ApiError::BadRequest("Request body is not valid UTF-8".to_string()))?
        } else {
            ""
        };

        let uri: Uri = format!("/?{}", merge_pairs(body, &query))
            .parse()
            .map_err(|_| ApiError::BadRequest("Malformed form parameters".to_string()))?;
        let Query(values) = Query::<T>::try_from_uri(&uri)
            .map_err(|_| ApiError::BadRequest("Malformed form parameters".to_string()))?;
        Ok(Self(values))
    }
}

/// Joins two urlencoded strings, dropping query pairs whose key the body
/// already carries.
fn merge_pairs(body: &str, query: &str) -> String {
    let body_pairs: Vec<&str> = pairs(body).collect();
    let body_keys: Vec<&str> = body_pairs.iter().map(|pair| key(pair)).collect();

    body_pairs
        .iter()
        .copied()
        .chain(pairs(query).filter(|pair| !body_keys.contains(&key(pair))))
        .collect::<Vec<_>>()
        .join("&")
}

fn pairs(encoded: &str) -> impl Iterator<Item = &str> {
    encoded.trim().split('&').filter(|pair| !pair.is_empty())
}

fn key(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(key, _)| key)
}
