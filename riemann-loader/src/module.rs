// SPDX-License-Identifier: GPL-2.0
//! Kernel module loading

use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::RebindError;

/// Result of the modprobe call. Never fatal: the module is often built in
/// or already loaded, and the bind writes report the real problem if not.
#[derive(Debug)]
pub enum ModuleLoad {
    Loaded,
    Failed { status: Option<i32>, stderr: String },
    NotRun(RebindError),
}

impl ModuleLoad {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModuleLoad::Loaded)
    }
}

/// Run `<program> <module>` once and log the outcome
pub fn load_module(program: &str, module: &str) -> ModuleLoad {
    info!("Loading kernel module {}...", module);

    let output = match Command::new(program).arg(module).output() {
        Ok(o) => o,
        Err(source) => {
            let err = RebindError::Spawn {
                program: program.to_owned(),
                source,
            };
            warn!("{}; continuing without it", err);
            return ModuleLoad::NotRun(err);
        }
    };

    if output.status.success() {
        debug!("{} {} succeeded", program, module);
        return ModuleLoad::Loaded;
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    warn!(
        "{} {} failed ({}): {}",
        program, module, output.status, stderr
    );
    ModuleLoad::Failed {
        status: output.status.code(),
        stderr,
    }
}
