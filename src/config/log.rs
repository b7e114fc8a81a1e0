use envmode::EnvMode;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::{env, time::SystemTime};

/// Installs the stderr logger. Stdout is left to the report.
///
/// Reads `ENVIRONMENT` directly so it can run before the validated config is
/// loaded and config errors still get logged.
pub fn setup(verbose: bool) {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| EnvMode::Dev.into());

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let dispatch = fern::Dispatch::new()
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn);

    let dispatch = if EnvMode::is_dev(&environment) {
        let colors_line = ColoredLevelConfig::new()
            .error(Color::Red)
            .warn(Color::Yellow)
            .info(Color::White)
            .debug(Color::White)
            .trace(Color::BrightBlack);
        let colors_level = colors_line.info(Color::Green);

        dispatch.format(move |out, message, record| {
            out.finish(format_args!(
                "{color_line}[{date} {level} {target} {color_line}] {message}\x1B[0m",
                color_line = format_args!(
                    "\x1B[{}m",
                    colors_line.get_color(&record.level()).to_fg_str()
                ),
                date = humantime::format_rfc3339_seconds(SystemTime::now()),
                target = record.target(),
                level = colors_level.color(record.level()),
                message = message,
            ))
        })
    } else {
        dispatch.format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message,
            ))
        })
    };

    if let Err(e) = dispatch.chain(std::io::stderr()).apply() {
        eprintln!("failed to install logger: {}", e);
    }
}
