//! Logger initialization.
//!
//! Our crates log at `debug` when verbose. Verbosity can be switched on late,
//! by a `VERBOSE=1` directive in the input, so the per-module filter is set up
//! once and the global max level is raised afterwards.

use anyhow::Result;
use log::LevelFilter;

const CRATES: [&str; 2] = ["reqpipe_core", "reqpipe_cli"];

/// Initialize `env_logger`. If `RUST_LOG` is set it is honoured as is and
/// the verbose switch has no effect on filtering.
pub fn init_logger(verbose: bool) -> Result<()> {
    let from_env = env_controlled();

    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp(None);
    if !from_env {
        builder.filter_level(LevelFilter::Warn);
        for module in CRATES {
            builder.filter_module(module, LevelFilter::Debug);
        }
    }
    builder.try_init()?;

    set_verbose(verbose);
    Ok(())
}

fn env_controlled() -> bool {
    std::env::var_os("RUST_LOG").is_some()
}

/// Raise or lower the global cap between `warn` and `debug`. No-op when
/// `RUST_LOG` is set.
pub fn set_verbose(verbose: bool) {
    if env_controlled() {
        return;
    }
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}
