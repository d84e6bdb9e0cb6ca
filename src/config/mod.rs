//! Configuration module
//!
//! Backend endpoint, display and popup settings loaded from TOML.

pub mod config;
