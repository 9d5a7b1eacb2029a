//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `ExporterError`, so functions can simply return `Result<T>`.
use crate::error::ExporterError;

/// Workspace-wide `Result` alias with `ExporterError` as the default error.
pub type Result<T, E = ExporterError> = std::result::Result<T, E>;
