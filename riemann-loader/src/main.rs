// SPDX-License-Identifier: GPL-2.0
//! NextWindow Riemann rebind tool
//!
//! Moves Riemann multitouch panels from generic-usb to the riemann HID driver.
//! Meant to run once at boot or by hand after plugging the panel in.
//!
//! Usage:
//!   riemann-loader              # Load module and rebind (default)
//!   riemann-loader run --dry-run
//!   riemann-loader list         # Show matching devices, change nothing

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use riemann_loader::config::SYSFS_ROOT;
use riemann_loader::migrate::{ControlWriter, DryRunWriter, MigrationOutcome, SysfsWriter};
use riemann_loader::module::{self, ModuleLoad};
use riemann_loader::scan::{self, SkipReason};
use riemann_loader::{RebindConfig, RebindSummary};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// NextWindow Riemann multitouch rebind tool
#[derive(Parser)]
#[command(name = "riemann-loader", version = VERSION, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this directory instead of /sys
    #[arg(long, global = true, value_name = "DIR")]
    sysfs_root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load hid-nwriemann and move matching devices to it
    Run {
        /// Scan and log, but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Do not call modprobe
        #[arg(long)]
        no_modprobe: bool,
    },
    /// List matching devices on generic-usb and devices already on riemann
    List,
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let cfg = match &cli.sysfs_root {
        Some(root) => RebindConfig::with_sysfs_root(root),
        None => RebindConfig::default(),
    };

    match cli.command {
        Some(Commands::List) => do_list(&cfg),
        Some(Commands::Run {
            dry_run,
            no_modprobe,
        }) => do_run(&cfg, cli.sysfs_root.as_deref(), dry_run, no_modprobe),
        None => do_run(&cfg, cli.sysfs_root.as_deref(), false, false),
    }
}

fn do_run(
    cfg: &RebindConfig,
    sysfs_root: Option<&Path>,
    dry_run: bool,
    no_modprobe: bool,
) -> Result<()> {
    let real_sysfs = sysfs_root.map_or(true, |r| r == Path::new(SYSFS_ROOT));
    if real_sysfs && !dry_run && !nix::unistd::geteuid().is_root() {
        bail!("Must run as root to rebind HID devices");
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    info!("[{}] Riemann rebind v{}", timestamp, VERSION);

    let module_load = if no_modprobe || dry_run {
        info!("Skipping modprobe {}", cfg.module_name);
        None
    } else {
        Some(module::load_module(&cfg.modprobe, &cfg.module_name))
    };

    let mut sysfs = SysfsWriter;
    let mut dry = DryRunWriter;
    let writer: &mut dyn ControlWriter = if dry_run { &mut dry } else { &mut sysfs };

    let summary = riemann_loader::rebind(cfg, writer)?;
    print_summary(&summary, module_load.as_ref(), &cfg.module_name);

    let migration = &summary.migration;
    if !migration.all_succeeded() {
        bail!(
            "{} of {} devices failed to migrate ({} bound to no driver)",
            migration.failed(),
            migration.results.len(),
            migration.orphaned()
        );
    }

    Ok(())
}

fn print_summary(summary: &RebindSummary, module_load: Option<&ModuleLoad>, module_name: &str) {
    let migration = &summary.migration;

    if summary.scan.candidates.is_empty() {
        info!("No riemann multitouch devices found");
    }

    for skipped in &summary.scan.skipped {
        if let SkipReason::Unreadable(e) = &skipped.reason {
            warn!("Not migrated: {} ({})", skipped.name, e);
        }
    }

    for result in &migration.results {
        match &result.outcome {
            MigrationOutcome::Migrated => {}
            MigrationOutcome::UnbindFailed(e) => {
                warn!("{}: still on generic driver: {}", result.id, e)
            }
            MigrationOutcome::BindFailed(e) => {
                warn!("{}: returned to generic driver: {}", result.id, e)
            }
            MigrationOutcome::Orphaned { bind, restore } => warn!(
                "{}: bound to no driver (bind: {}; rebind: {})",
                result.id, bind, restore
            ),
        }
    }

    let bind_refused = migration.results.iter().any(|r| {
        matches!(
            r.outcome,
            MigrationOutcome::BindFailed(_) | MigrationOutcome::Orphaned { .. }
        )
    });
    if bind_refused && module_load.is_some_and(|m| !m.is_loaded()) {
        warn!("{} did not load; the riemann driver may be missing", module_name);
    }

    println!(
        "Migrated {} device(s), {} failed",
        migration.migrated(),
        migration.failed()
    );
}

fn do_list(cfg: &RebindConfig) -> Result<()> {
    let report = scan::scan(&cfg.generic, &cfg.device_match)?;

    println!("=== {} ===", cfg.generic.path().display());
    if report.candidates.is_empty() {
        println!("  (no matching devices)");
    }
    for c in &report.candidates {
        match &c.hid_name {
            Some(name) => println!("  {} {}", c.id, name),
            None => println!("  {}", c.id),
        }
    }
    for s in &report.skipped {
        match &s.reason {
            SkipReason::PhysMismatch => println!("  {} (other port/interface)", s.name),
            SkipReason::Unreadable(e) => println!("  {} ({})", s.name, e),
        }
    }

    println!("\n=== {} ===", cfg.riemann.path().display());
    match scan::list_bound_devices(&cfg.riemann) {
        Ok(names) => {
            let bound: Vec<_> = names
                .iter()
                .filter(|n| n.parse::<riemann_loader::HidDeviceId>().is_ok())
                .collect();
            if bound.is_empty() {
                println!("  (no devices bound)");
            }
            for name in bound {
                println!("  {}", name);
            }
        }
        Err(e) => println!("  driver not loaded ({})", e),
    }

    Ok(())
}
