//! HTTP protocol layer module
//!
//! Response builders and request body decoding, kept apart from the
//! prediction logic.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::FormData;
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_health_response, build_html_response, build_options_response, ALLOWED_METHODS,
    HEALTH_ALLOWED_METHODS,
};

/// Header set by `fetch`/XHR callers that only want the prediction fragment
pub const REQUESTED_WITH: &str = "x-requested-with";

/// Value of [`REQUESTED_WITH`] marking an asynchronous browser request
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

/// True when the request asks for the fragment instead of the full page
pub fn wants_fragment(headers: &hyper::HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == XML_HTTP_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_wants_fragment() {
        let mut headers = hyper::HeaderMap::new();
        assert!(!wants_fragment(&headers));
        headers.insert(REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        assert!(wants_fragment(&headers));
        headers.insert(REQUESTED_WITH, HeaderValue::from_static("fetch"));
        assert!(!wants_fragment(&headers));
    }
}
