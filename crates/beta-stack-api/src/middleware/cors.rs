use crate::constants::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Origin prefixes allowed to call the API from a browser.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    origin_prefixes: Vec<String>,
}

impl CorsConfig {
    pub fn new(origin_prefixes: Vec<String>) -> Self {
        Self { origin_prefixes }
    }

    /// An origin matches a prefix when it equals it or continues with a port or path.
    ///
    /// `http://localhost` allows `http://localhost:5173` but not `http://localhost.evil.test`.
    pub fn allows(&self, origin: &str) -> bool {
        self.origin_prefixes.iter().any(|prefix| {
            origin.strip_prefix(prefix.as_str()).is_some_and(|rest| {
                rest.is_empty()
                    || prefix.ends_with([':', '/'])
                    || rest.starts_with([':', '/'])
            })
        })
    }
}

/// Echoes allowed origins and answers every preflight (`OPTIONS`) with 204.
///
/// All three `Access-Control-Allow-*` headers go on every response for an allowed
/// origin, not only on preflights.
pub async fn cors_middleware(
    State(config): State<Arc<CorsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let allowed_origin = request
        .headers()
        .get(header::ORIGIN)
        .filter(|origin| origin.to_str().is_ok_and(|o| config.allows(o)))
        .cloned();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    if let Some(origin) = allowed_origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        );
    }
    headers.append(header::VARY, HeaderValue::from_static("origin"));

    response
}
