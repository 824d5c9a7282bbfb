//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method checks, body limits,
//! dispatch to the form handler, and access logging.

use crate::config::AppState;
use crate::handler::{predict, render};
use crate::http::{self, FormData};
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// What the handler decided, before access logging
struct Handled {
    response: Response<Full<Bytes>>,
    prediction: Option<String>,
    fragment: bool,
}

impl From<Response<Full<Bytes>>> for Handled {
    fn from(response: Response<Full<Bytes>>) -> Self {
        Self {
            response,
            prediction: None,
            fragment: false,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    logger::log_headers_count(parts.headers.len(), state.config.logging.show_headers);

    let handled = route_request(&parts, body, &state).await;
    let mut response = handled.response;
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if state.access_log() {
        let mut entry = AccessLogEntry::from_parts(&parts, peer_addr.ip().to_string());
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.prediction = handled.prediction;
        entry.fragment = handled.fragment;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(
    parts: &hyper::http::request::Parts,
    body: B,
    state: &AppState,
) -> Handled
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let path = parts.uri.path();

    // Health check endpoints
    if state.config.http.health_enabled && (path == "/healthz" || path == "/readyz") {
        return match parts.method {
            Method::GET | Method::HEAD => http::build_health_response("ok").into(),
            _ => http::build_405_response(http::HEALTH_ALLOWED_METHODS).into(),
        };
    }

    if path != "/" {
        return http::build_404_response().into();
    }

    match parts.method {
        Method::GET => http::build_html_response(render::render_page(None, None), false).into(),
        Method::HEAD => http::build_html_response(render::render_page(None, None), true).into(),
        Method::OPTIONS => http::build_options_response().into(),
        Method::POST => handle_submission(parts, body, state).await,
        ref other => {
            logger::log_warning(&format!("Method not allowed: {other}"));
            http::build_405_response(http::ALLOWED_METHODS).into()
        }
    }
}

/// POST /: decode the form, predict, render page or fragment
async fn handle_submission<B>(
    parts: &hyper::http::request::Parts,
    body: B,
    state: &AppState,
) -> Handled
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let max_body_size = state.config.http.max_body_size;
    if exceeds_declared_length(&parts.headers, max_body_size) {
        return http::build_413_response().into();
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<http_body_util::LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body too large (max: {max_body_size} bytes)"
            ));
            return http::build_413_response().into();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return http::build_400_response().into();
        }
    };

    let fragment = http::wants_fragment(&parts.headers);
    let form = FormData::parse(&bytes);
    let prediction = predict::evaluate(&state.predictor, &form);
    match &prediction {
        Ok(outcome) => logger::log_prediction(*outcome, fragment),
        Err(err) => logger::log_rejected_input(err),
    }
    let text = predict::display(&prediction);

    let html = if fragment {
        render::render_fragment(Some(&text))
    } else {
        render::render_page(Some(&form), Some(&text))
    };

    Handled {
        response: http::build_html_response(html, false),
        prediction: Some(text),
        fragment,
    }
}

/// Content-Length larger than the limit; unparsable values are left to
/// the streaming limit
fn exceeds_declared_length(headers: &hyper::HeaderMap, max_body_size: u64) -> bool {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return false;
    };
    match value.to_str().ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            true
        }
        Some(_) => false,
        None => {
            logger::log_warning("Invalid Content-Length value, skipping size check");
            false
        }
    }
}
