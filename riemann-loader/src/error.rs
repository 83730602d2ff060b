// SPDX-License-Identifier: GPL-2.0
//! Rebind error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the scan and migration steps
#[derive(Error, Debug)]
pub enum RebindError {
    /// Driver directory missing or unreadable
    #[error("Failed to list driver directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Device uevent missing or unreadable
    #[error("Failed to read {path}: {source}")]
    ReadUevent {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Kernel rejected a bind/unbind write
    #[error("Failed to write {value:?} to {path}: {source}")]
    WriteControl {
        path: PathBuf,
        value: String,
        #[source]
        source: io::Error,
    },

    /// Module loader could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RebindError>;
