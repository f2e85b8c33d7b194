//! Diagnostic logging to stderr.
//!
//! stdout is reserved for the transcript, so every record goes to stderr.

use crate::defaults::LOG_FILTER;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global logger. Safe to call more than once.
///
/// The filter defaults to `info` and follows `RUST_LOG` when set.
pub fn init() {
    INIT.call_once(|| {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(LOG_FILTER));

        builder
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                if record.level() == log::Level::Info {
                    writeln!(buf, "{}", record.args())
                } else {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
            });

        if let Err(e) = builder.try_init() {
            eprintln!("Logger already initialized: {e}");
        }
    });
}
