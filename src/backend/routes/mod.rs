//! Route configuration

/// API route groups
pub mod api_routes;

/// Router assembly
pub mod router;

pub use router::create_router;
