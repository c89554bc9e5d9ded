//! Session logging for AR replays and live sessions.
//!
//! Each record goes to stderr as `[elapsed LEVEL target] message`, where
//! `elapsed` counts seconds since the logger was installed, so per-frame
//! reconcile and overlay-skip messages line up against session time.
//! Binaries call [`init_with_level`] once; with the `tracing` feature,
//! `init_tracing` routes the same records and the frame spans through a
//! `tracing-subscriber` formatter.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| FrameLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

#[cfg(feature = "tracing")]
fn fallback_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::new(level.to_string().to_ascii_lowercase())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`, or by `default_level`
/// when `RUST_LOG` is unset or invalid.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(default_level));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with_level(LevelFilter::Warn).expect("first init");
        init_with_level(LevelFilter::Debug).expect("second init");
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn fallback_filter_follows_requested_level() {
        assert_eq!(fallback_filter(LevelFilter::Warn).to_string(), "warn");
        assert_eq!(fallback_filter(LevelFilter::Off).to_string(), "off");
        assert_eq!(fallback_filter(LevelFilter::Trace).to_string(), "trace");
    }
}
