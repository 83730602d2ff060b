// SPDX-License-Identifier: GPL-2.0
//! Moving devices from the generic driver to the riemann driver

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use tracing::{error, info, warn};

use crate::config::DriverDir;
use crate::device_id::HidDeviceId;
use crate::error::{RebindError, Result};
use crate::scan::Candidate;

/// Writes a device name into a driver `bind`/`unbind` file
pub trait ControlWriter {
    fn write_control(&mut self, path: &Path, value: &str) -> io::Result<()>;
}

/// Writes straight to sysfs.
///
/// The control files already exist and take the whole name in one write, so
/// the file is opened without create/truncate and written once.
#[derive(Debug, Default)]
pub struct SysfsWriter;

impl ControlWriter for SysfsWriter {
    fn write_control(&mut self, path: &Path, value: &str) -> io::Result<()> {
        let mut f = OpenOptions::new().write(true).open(path)?;
        f.write_all(value.as_bytes())
    }
}

/// Logs the writes it would make and makes none
#[derive(Debug, Default)]
pub struct DryRunWriter;

impl ControlWriter for DryRunWriter {
    fn write_control(&mut self, path: &Path, value: &str) -> io::Result<()> {
        info!("(dry run) would write {:?} to {}", value, path.display());
        Ok(())
    }
}

/// What happened to one device
#[derive(Debug)]
pub enum MigrationOutcome {
    Migrated,
    /// Still on the generic driver
    UnbindFailed(RebindError),
    /// Bind refused, device given back to the generic driver
    BindFailed(RebindError),
    /// Bind refused and rebinding to the generic driver failed too;
    /// the device is attached to no driver
    Orphaned {
        bind: RebindError,
        restore: RebindError,
    },
}

impl MigrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MigrationOutcome::Migrated)
    }
}

#[derive(Debug)]
pub struct DeviceResult {
    pub id: HidDeviceId,
    pub outcome: MigrationOutcome,
}

/// Per-device outcomes, in migration order
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub results: Vec<DeviceResult>,
}

impl MigrationReport {
    pub fn migrated(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.migrated()
    }

    pub fn orphaned(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, MigrationOutcome::Orphaned { .. }))
            .count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

fn write(writer: &mut dyn ControlWriter, path: &Path, id: &HidDeviceId) -> Result<()> {
    writer
        .write_control(path, id.as_str())
        .map_err(|source| RebindError::WriteControl {
            path: path.to_path_buf(),
            value: id.as_str().to_owned(),
            source,
        })
}

/// Unbind `id` from `from`, bind it to `to`, and put it back on `from` if
/// the bind is refused.
pub fn migrate_device(
    writer: &mut dyn ControlWriter,
    from: &DriverDir,
    to: &DriverDir,
    id: &HidDeviceId,
) -> MigrationOutcome {
    info!("unbind \"{}\" from {}", id, from.path().display());
    if let Err(e) = write(writer, &from.unbind_path(), id) {
        warn!("{}", e);
        return MigrationOutcome::UnbindFailed(e);
    }

    info!("bind \"{}\" to {}", id, to.path().display());
    let bind_err = match write(writer, &to.bind_path(), id) {
        Ok(()) => return MigrationOutcome::Migrated,
        Err(e) => e,
    };

    warn!("{}; rebinding to {}", bind_err, from.path().display());
    match write(writer, &from.bind_path(), id) {
        Ok(()) => MigrationOutcome::BindFailed(bind_err),
        Err(restore) => {
            error!("{} is now bound to no driver: {}", id, restore);
            MigrationOutcome::Orphaned {
                bind: bind_err,
                restore,
            }
        }
    }
}

/// Migrate every candidate in order, one at a time
pub fn migrate_all(
    writer: &mut dyn ControlWriter,
    from: &DriverDir,
    to: &DriverDir,
    candidates: &[Candidate],
) -> MigrationReport {
    let mut report = MigrationReport::default();

    for c in candidates {
        let outcome = migrate_device(writer, from, to, &c.id);
        report.results.push(DeviceResult {
            id: c.id.clone(),
            outcome,
        });
    }

    report
}
