//! Heart failure survival prediction server
//!
//! Serves a single form that collects 12 clinical features, validates
//! them, scales the continuous ones and runs a pre-trained classifier.

pub mod config;
pub mod features;
pub mod handler;
pub mod http;
pub mod logger;
pub mod model;
pub mod server;
