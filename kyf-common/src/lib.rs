//! # KYF Common Library
//!
//! Shared code for the KYF (Know Your Fan) microservices including:
//! - Common error type
//! - Configuration file loading and tiered value resolution
//! - Verification vocabulary (signals, outcomes, the resolver)

pub mod config;
pub mod error;
pub mod verification;

pub use error::{Error, Result};
pub use verification::{resolve, FanVerificationOutcome, VerificationSignal};
