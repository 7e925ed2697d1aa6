use std::sync::atomic::{AtomicBool, Ordering};

use clap::ValueEnum;

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Progress line on stderr, so stdout carries only results. Silenced by `--quiet`.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Table,
}

impl OutputFormat {
    /// Parses the `defaults.format` config value, ignoring unknown names.
    pub fn from_config(value: Option<&str>) -> Option<Self> {
        value.and_then(|name| Self::from_str(name, true).ok())
    }
}
