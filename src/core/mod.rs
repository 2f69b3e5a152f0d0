//! Core module - Configuration, errors and output plumbing
//!
//! This module provides:
//! - Typed adapter configuration with layered overrides
//! - Fatal setup error taxonomy
//! - Key to path mapping
//! - CLI result model and rendering

pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
