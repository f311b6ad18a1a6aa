//! Logging through `env_logger`, bridged to indicatif when stderr is a TTY

use std::fmt::Arguments;

use indicatif::MultiProgress;

/// ANSI color code and padded label for a log level.
fn level_style(level: log::Level, color: bool) -> (&'static str, &'static str, &'static str) {
    let label = match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    };
    if !color {
        return ("", label, "");
    }
    let ansi = match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    };
    (ansi, label, "\x1b[0m")
}

/// Short origin shown in debug output: `texpipe_symbols::matcher` → `symbols`.
fn short_target(target: &str) -> &str {
    let krate = target.split("::").next().unwrap_or(target);
    krate.strip_prefix("texpipe_").unwrap_or(krate)
}

fn format_line(
    level: log::Level,
    target: &str,
    args: &Arguments<'_>,
    color: bool,
    debug: bool,
) -> String {
    let (pre, label, post) = level_style(level, color);
    if debug {
        format!("[{pre}{label}{post}] {}: {args}", short_target(target))
    } else {
        format!("[{pre}{label}{post}] {args}")
    }
}

/// Logger that prints through indicatif MultiProgress so log lines do not
/// tear spinner lines.
pub struct IndicatifLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
    debug: bool,
}

impl IndicatifLogger {
    pub fn new(inner: env_logger::Logger, multi: MultiProgress, debug: bool) -> Self {
        Self {
            inner,
            multi,
            debug,
        }
    }
}

impl log::Log for IndicatifLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            let line = format_line(
                record.level(),
                record.target(),
                record.args(),
                true,
                self.debug,
            );
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize logging.
///
/// `RUST_LOG` takes precedence; otherwise `debug` selects the debug level and
/// `quiet` restricts output to warnings. Passing a `MultiProgress` routes
/// lines through it (TTY mode).
pub fn init_logging(
    quiet: bool,
    debug: bool,
    multi: Option<&MultiProgress>,
) -> Result<(), log::SetLoggerError> {
    use std::io::Write;

    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let env = env_logger::Env::default().default_filter_or(default_level);

    if let Some(multi) = multi {
        let logger = env_logger::Builder::from_env(env).build();
        let max_level = logger.filter();

        log::set_boxed_logger(Box::new(IndicatifLogger::new(logger, multi.clone(), debug)))?;
        log::set_max_level(max_level);
        Ok(())
    } else {
        // Non-TTY: no ANSI colors
        env_logger::Builder::from_env(env)
            .format(move |buf, record| {
                let line =
                    format_line(record.level(), record.target(), record.args(), false, debug);
                writeln!(buf, "{line}")
            })
            .try_init()
    }
}
