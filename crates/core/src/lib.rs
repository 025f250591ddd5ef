//! Core types and shared functionality for the curriculum week resolver.
//!
//! This crate provides:
//! - Shared data model (curriculum items, resolved answers)
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod model;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{CurriculumItem, MatchDebug, RangeSummary, WeekAnswer};
