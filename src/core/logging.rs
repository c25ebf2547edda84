//! Logging initialisation built on flexi_logger

// Global static logger handle for flexi_logger
static LOGGER_HANDLE: std::sync::OnceLock<std::sync::Mutex<flexi_logger::LoggerHandle>> =
    std::sync::OnceLock::new();

/// Initialise logging for the embedding application
///
/// `log_level` is a flexi_logger level spec ("info", "debug",
/// "queueflow=trace"); `log_file` redirects output to a file when given.
/// Safe to call once per process; subsequent level changes go through
/// [`reconfigure_log_level`].
pub fn init_logging(
    log_level: Option<&str>,
    log_file: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let level_str = log_level.unwrap_or("info");

    let mut logger = Logger::try_with_str(level_str)?.format(compact_format);

    if let Some(file_path) = log_file {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(std::sync::Mutex::new(handle));

    Ok(())
}

/// Change the active log level at runtime
///
/// Only the level spec can change after initialisation; output target and
/// format are fixed by flexi_logger's design.
pub fn reconfigure_log_level(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(handle_mutex) = LOGGER_HANDLE.get() {
        if let Ok(mut handle) = handle_mutex.lock() {
            let _ = handle.parse_and_push_temp_spec(log_level);
            Ok(())
        } else {
            Err("Could not acquire logger handle lock".into())
        }
    } else {
        Err("Logger handle not initialised. Call init_logging first.".into())
    }
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message (queueflow::queue::engine)"
fn compact_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let level_abbr = match record.level() {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    };

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr,
        record.args(),
        record.target()
    )
}
