//! HTTP API handlers for kyf-ai
//!
//! One module per endpoint family; each exposes a `*_routes()` builder
//! merged into the application router. Endpoint paths keep the trailing
//! slash the profile backend already calls, and accept the bare form
//! too.

pub mod document_verify;
pub mod face_verify;
pub mod fan_analysis;
pub mod health;
pub mod sentiment;

pub use document_verify::document_verify_routes;
pub use face_verify::face_verify_routes;
pub use fan_analysis::fan_analysis_routes;
pub use health::health_routes;
pub use sentiment::sentiment_routes;
