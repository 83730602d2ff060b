// SPDX-License-Identifier: GPL-2.0
//! Fixed rebind configuration
//!
//! All values are constants of the Riemann panel setup. The only knob is the
//! sysfs root, so tests and `--sysfs-root` can point at a synthetic tree.

use std::path::{Path, PathBuf};

use crate::device_id::{HidDeviceId, BUS_USB};

/// Generic HID driver directory, relative to the sysfs root
pub const GENERIC_USB_HID: &str = "bus/hid/drivers/generic-usb";

/// Riemann HID driver directory, relative to the sysfs root
pub const RIEMANN: &str = "bus/hid/drivers/riemann";

pub const SYSFS_ROOT: &str = "/sys";

/// Kernel module providing the riemann driver
pub const MODULE_NAME: &str = "hid-nwriemann";

pub const MODPROBE: &str = "modprobe";

/// NextWindow vendor id
pub const VID_NEXTWINDOW: u16 = 0x1926;

/// Riemann panel product ids
pub const RIEMANN_PIDS: [u16; 4] = [0x0008, 0x00FF, 0x025E, 0x0262];

/// Physical path of the multitouch collection (first HID input on the port)
pub const RIEMANN_PHYS: &str = "usb-0000:00:1d.1-2/input0";

/// A HID driver directory under `/sys/bus/hid/drivers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDir {
    path: PathBuf,
}

impl DriverDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bind_path(&self) -> PathBuf {
        self.path.join("bind")
    }

    pub fn unbind_path(&self) -> PathBuf {
        self.path.join("unbind")
    }

    /// Directory of a device currently bound to this driver
    pub fn device_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Which devices get moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMatch {
    pub bus: u16,
    pub vendor: u16,
    pub products: Vec<u16>,
    pub phys: String,
}

impl DeviceMatch {
    /// Bus, vendor and product check; the physical path needs the uevent
    pub fn matches_id(&self, id: &HidDeviceId) -> bool {
        id.bus() == self.bus
            && id.vendor() == self.vendor
            && self.products.contains(&id.product())
    }
}

impl Default for DeviceMatch {
    fn default() -> Self {
        Self {
            bus: BUS_USB,
            vendor: VID_NEXTWINDOW,
            products: RIEMANN_PIDS.to_vec(),
            phys: RIEMANN_PHYS.to_owned(),
        }
    }
}

/// Everything the pipeline needs to know about the system
#[derive(Debug, Clone)]
pub struct RebindConfig {
    pub generic: DriverDir,
    pub riemann: DriverDir,
    pub module_name: String,
    pub modprobe: String,
    pub device_match: DeviceMatch,
}

impl RebindConfig {
    /// Configuration with driver paths under `root` instead of `/sys`
    pub fn with_sysfs_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            generic: DriverDir::new(root.join(GENERIC_USB_HID)),
            riemann: DriverDir::new(root.join(RIEMANN)),
            module_name: MODULE_NAME.to_owned(),
            modprobe: MODPROBE.to_owned(),
            device_match: DeviceMatch::default(),
        }
    }
}

impl Default for RebindConfig {
    fn default() -> Self {
        Self::with_sysfs_root(SYSFS_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> HidDeviceId {
        s.parse().unwrap()
    }

    #[test]
    fn default_paths() {
        let cfg = RebindConfig::default();
        assert_eq!(
            cfg.generic.unbind_path(),
            Path::new("/sys/bus/hid/drivers/generic-usb/unbind")
        );
        assert_eq!(
            cfg.riemann.bind_path(),
            Path::new("/sys/bus/hid/drivers/riemann/bind")
        );
        assert_eq!(
            cfg.generic.device_path("0003:1926:0008.0001"),
            Path::new("/sys/bus/hid/drivers/generic-usb/0003:1926:0008.0001")
        );
        assert_eq!(cfg.module_name, "hid-nwriemann");
    }

    #[test]
    fn accepts_every_riemann_product() {
        let m = DeviceMatch::default();
        for name in [
            "0003:1926:0008.0001",
            "0003:1926:00FF.0002",
            "0003:1926:025E.0003",
            "0003:1926:0262.0004",
        ] {
            assert!(m.matches_id(&id(name)), "{name}");
        }
    }

    #[test]
    fn rejects_other_products_and_vendors() {
        let m = DeviceMatch::default();
        assert!(!m.matches_id(&id("0003:1926:1234.0001")));
        assert!(!m.matches_id(&id("0003:1927:0008.0001")));
        // Bluetooth bus, same vendor/product
        assert!(!m.matches_id(&id("0005:1926:0008.0001")));
    }
}
