//! Backend Error Types
//!
//! Error taxonomy for the HTTP and channel layers, with the mapping to
//! HTTP responses.

/// Error enum and status-code mapping
pub mod types;

/// Conversions into HTTP responses
pub mod conversion;

pub use types::ApiError;
