//! Logger module
//!
//! Provides logging utilities for the prediction server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Prediction and validation outcomes
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use crate::features::ValidationError;
use crate::model::{Classifier, Outcome, PredictError, Predictor, Scaler};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<LogLevel>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Route a line through the global writer, or the console before `init()`
fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= LogLevel::Warn => eprintln!("{message}"),
        None => println!("{message}"),
    }
}

fn write_info(message: &str) {
    write(LogLevel::Info, message);
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Heart failure survival predictor started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info(&format!("Max body size: {} bytes", config.http.max_body_size));
    write_info("======================================\n");
}

pub fn log_artifacts_loaded(config: &Config, predictor: &Predictor) {
    let scaler = match predictor.scaler() {
        Scaler::Standard { .. } => "standard",
        Scaler::MinMax { .. } => "min-max",
    };
    let classifier = match predictor.classifier() {
        Classifier::LogisticRegression { .. } => "logistic regression".to_string(),
        Classifier::DecisionTree(tree) => format!("decision tree ({} nodes)", tree.nodes.len()),
        Classifier::RandomForest { trees } => format!("random forest ({} trees)", trees.len()),
    };
    write_info(&format!(
        "[Model] Loaded {classifier} from {}",
        config.model.model_path.display()
    ));
    write_info(&format!(
        "[Model] Loaded {scaler} scaler from {}",
        config.model.scaler_path.display()
    ));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(LogLevel::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(LogLevel::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        write(LogLevel::Debug, &format!("[Headers] Count: {count}"));
    }
}

pub fn log_prediction(outcome: Outcome, fragment: bool) {
    write(
        LogLevel::Debug,
        &format!("[Predict] {outcome} (fragment: {fragment})"),
    );
}

pub fn log_rejected_input(err: &PredictError) {
    match err {
        PredictError::Validation(ValidationError::Coercion { field, .. }) => {
            write_info(&format!("[Predict] Rejected {field}: not a number"));
        }
        PredictError::Validation(ValidationError::Range { field, .. }) => {
            write_info(&format!("[Predict] Rejected {field}: out of range"));
        }
        other => log_error(&format!("[Predict] Model failure: {other}")),
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    write_info(&format!("\n[Shutdown] {signal} received, no longer accepting connections"));
}

pub fn log_shutdown_complete(in_flight: usize) {
    write_info(&format!(
        "[Shutdown] Listener closed, {in_flight} connection(s) still finishing"
    ));
}
