//! Error types for movement, persistence and configuration.
//!
//! Every failure here is recoverable: callers get a value back and the live
//! world is left as it was.

use std::path::PathBuf;

use thiserror::Error;

use crate::terrain::TerrainKind;

/// Reasons a move request is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    /// No world has been generated yet.
    #[error("no world has been generated")]
    NoWorld,

    /// The direction could not be understood.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// The target lies outside the world map.
    #[error("coordinate ({x}, {y}) is outside the world")]
    InvalidCoordinate { x: i32, y: i32 },

    /// The target tile cannot be walked on.
    #[error("tile ({x}, {y}) is blocked by {kind:?}")]
    Blocked { x: i32, y: i32, kind: TerrainKind },
}

/// Failures while saving or loading a session.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The backing file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The save file is not valid JSON or misses required fields.
    #[error("corrupt save file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No save exists for this session.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Session names must be a single plain path component.
    #[error("invalid session name: {0:?}")]
    InvalidSessionName(String),

    /// The saved position does not fit the regenerated world.
    #[error("saved position ({x}, {y}) is outside a {width}x{height} world")]
    InvalidPosition {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Failures while loading generation parameters.
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameters in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
