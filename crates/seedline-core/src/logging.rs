//! Logging setup: env_logger, bridged through indicatif on a TTY

use indicatif::MultiProgress;

/// How chatty the default filter is (before `RUST_LOG` overrides it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    /// TTY: quiet unless --debug, progress bars show activity.
    /// Non-TTY: info unless --debug, logs are the only progress indicator.
    pub fn for_terminal(is_tty: bool, debug: bool) -> Self {
        match (debug, is_tty) {
            (true, _) => Self::Debug,
            (false, true) => Self::Quiet,
            (false, false) => Self::Normal,
        }
    }

    fn default_filter(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Debug => "debug",
        }
    }
}

fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

fn level_color(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    }
}

/// Logger that prints through indicatif MultiProgress to avoid mixing with progress bars.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress) -> Self {
        Self { inner, multi }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            let line = format!(
                "[{}{}\x1b[0m] {}",
                level_color(record.level()),
                level_label(record.level()),
                record.args()
            );
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize logging. With `multi`, log lines are drawn above progress bars.
///
/// Calling this twice is harmless: the second logger is rejected and dropped.
pub fn init_logging(verbosity: Verbosity, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(verbosity.default_filter());

    if let Some(multi) = multi {
        let logger = env_logger::Builder::from_env(env).build();
        let max_level = logger.filter();
        if log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone()))).is_ok() {
            log::set_max_level(max_level);
        }
    } else {
        // Non-TTY: no ANSI colors
        let _ = env_logger::Builder::from_env(env)
            .format(|buf, record| {
                writeln!(buf, "[{}] {}", level_label(record.level()), record.args())
            })
            .try_init();
    }
}
