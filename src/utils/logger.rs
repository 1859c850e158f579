use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

/// Installs a logger writing the records of level `Info` and above on the standard error.
///
/// See [`init_logger_with_level`].
pub fn init_logger() {
    init_logger_with_level(log::LevelFilter::Info)
}

/// Installs a logger writing the records of the given level and above on the standard error.
///
/// Records are prefixed by their colored level and a timestamp.
/// Only the first call has an effect; it is a no-op if another logger was installed before.
pub fn init_logger_with_level(level: log::LevelFilter) {
    LOGGER_INIT.call_once(|| {
        let colors = fern::colors::ColoredLevelConfig::new().info(fern::colors::Color::Cyan);
        fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{:5}] {} {}: {}",
                    colors.color(record.level()),
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                    record.target(),
                    message
                ))
            })
            .level(level)
            .chain(std::io::stderr())
            .apply()
            .unwrap_or(());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init_logger_with_level(log::LevelFilter::Debug);
        init_logger();
        log::debug!("logger initialized");
    }
}
