// SPDX-License-Identifier: GPL-2.0
//! Rebinds NextWindow Riemann multitouch panels from the generic HID driver
//! to the `riemann` driver (kernel module `hid-nwriemann`).
//!
//! The pipeline is: load the module, list devices bound to `generic-usb`,
//! keep the Riemann multitouch interfaces on the expected USB port, then
//! write each one to `generic-usb/unbind` and `riemann/bind`.

pub mod config;
pub mod device_id;
pub mod error;
pub mod migrate;
pub mod module;
pub mod scan;
pub mod uevent;

pub use config::{DeviceMatch, DriverDir, RebindConfig};
pub use device_id::HidDeviceId;
pub use error::RebindError;
pub use migrate::{ControlWriter, DryRunWriter, MigrationOutcome, MigrationReport, SysfsWriter};
pub use scan::{Candidate, ScanReport};

/// Result of a full scan + migrate pass
#[derive(Debug)]
pub struct RebindSummary {
    pub scan: ScanReport,
    pub migration: MigrationReport,
}

/// Scan the generic driver and migrate every match to the riemann driver.
///
/// Fails only if the generic driver directory cannot be listed; per-device
/// problems are in the returned summary.
pub fn rebind(cfg: &RebindConfig, writer: &mut dyn ControlWriter) -> error::Result<RebindSummary> {
    let scan = scan::scan(&cfg.generic, &cfg.device_match)?;
    let migration = migrate::migrate_all(writer, &cfg.generic, &cfg.riemann, &scan.candidates);
    Ok(RebindSummary { scan, migration })
}
