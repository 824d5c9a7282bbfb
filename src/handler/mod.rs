//! Request handler module
//!
//! Routes requests to the prediction form and renders its responses.

pub mod predict;
pub mod render;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
