// SPDX-License-Identifier: GPL-2.0
//! Device discovery under the generic HID driver

use std::fs;

use tracing::{debug, info, trace, warn};

use crate::config::{DeviceMatch, DriverDir};
use crate::device_id::HidDeviceId;
use crate::error::{RebindError, Result};
use crate::uevent::Uevent;

/// A device that passed every filter step
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: HidDeviceId,
    pub hid_name: Option<String>,
}

/// Why a vendor/product match was not taken
#[derive(Debug)]
pub enum SkipReason {
    /// uevent has no matching `HID_PHYS` (another port or interface)
    PhysMismatch,
    /// uevent could not be read
    Unreadable(RebindError),
}

#[derive(Debug)]
pub struct Skipped {
    pub name: String,
    pub reason: SkipReason,
}

/// Output of one pass over the driver directory, in listing order
#[derive(Debug, Default)]
pub struct ScanReport {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<Skipped>,
}

/// List entry names in a driver directory.
///
/// Includes the driver's own control files (`bind`, `unbind`, ...); the
/// filter drops them.
pub fn list_bound_devices(dir: &DriverDir) -> Result<Vec<String>> {
    let read_err = |source: std::io::Error| RebindError::ReadDir {
        path: dir.path().to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir.path()).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Bus/vendor/product check on a raw entry name
pub fn match_name(name: &str, matcher: &DeviceMatch) -> Option<HidDeviceId> {
    let id: HidDeviceId = match name.parse() {
        Ok(id) => id,
        Err(e) => {
            trace!("Ignoring {}: {}", name, e);
            return None;
        }
    };
    matcher.matches_id(&id).then_some(id)
}

/// Read `<dir>/<name>/uevent`
pub fn read_uevent(dir: &DriverDir, name: &str) -> Result<Uevent> {
    let path = dir.device_path(name).join("uevent");
    fs::read_to_string(&path)
        .map(Uevent::new)
        .map_err(|source| RebindError::ReadUevent { path, source })
}

/// Enumerate `dir` and keep the devices `matcher` accepts.
///
/// Only a failure to list the directory is an error. A device whose uevent
/// cannot be read is skipped and the scan goes on.
pub fn scan(dir: &DriverDir, matcher: &DeviceMatch) -> Result<ScanReport> {
    debug!("Scanning {}", dir.path().display());

    let mut report = ScanReport::default();

    for name in list_bound_devices(dir)? {
        let Some(id) = match_name(&name, matcher) else {
            continue;
        };

        debug!("Checking {}...", name);

        let uevent = match read_uevent(dir, &name) {
            Ok(u) => u,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                report.skipped.push(Skipped {
                    name,
                    reason: SkipReason::Unreadable(e),
                });
                continue;
            }
        };

        if !uevent.has_phys(&matcher.phys) {
            debug!(
                "  {} is on {}, not {}",
                name,
                uevent.get("HID_PHYS").unwrap_or("?"),
                matcher.phys
            );
            report.skipped.push(Skipped {
                name,
                reason: SkipReason::PhysMismatch,
            });
            continue;
        }

        let hid_name = uevent.hid_name().map(str::to_owned);
        match &hid_name {
            Some(n) => info!("found riemann hid: {} ({})", name, n),
            None => info!("found riemann hid: {}", name),
        }

        report.candidates.push(Candidate { id, hid_name });
    }

    Ok(report)
}
