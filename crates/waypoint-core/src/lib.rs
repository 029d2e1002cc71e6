//! Core types, config, and errors for Waypoint.

pub mod config;
pub mod error;
pub mod types;
