// SPDX-License-Identifier: GPL-2.0
//! Per-device `uevent` metadata

/// Contents of a HID device `uevent` file (`KEY=VALUE` per line)
#[derive(Debug, Clone, Default)]
pub struct Uevent {
    text: String,
}

impl Uevent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Value of the first `key=` line, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.text.lines().find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k == key).then_some(v)
        })
    }

    /// `HID_NAME`, the product string the device reported
    pub fn hid_name(&self) -> Option<&str> {
        self.get("HID_NAME")
    }

    /// True if the text contains `HID_PHYS=<phys>` anywhere
    pub fn has_phys(&self, phys: &str) -> bool {
        self.text.contains(&format!("HID_PHYS={phys}"))
    }
}
