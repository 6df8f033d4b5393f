//! Common types and utilities for the PR KPI reporter

pub mod config;
pub mod error;
pub mod models;
pub mod stats;
pub mod time;

pub use config::Config;
pub use error::{Error, Result};
