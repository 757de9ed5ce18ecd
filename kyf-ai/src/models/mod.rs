//! Data models for the fan-analysis service

pub mod fan_profile;

pub use fan_profile::FanProfile;
