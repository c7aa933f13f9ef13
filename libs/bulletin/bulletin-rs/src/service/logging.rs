use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::{env, panic};

use chrono::Local;
use tracing::metadata::LevelFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, fmt, Layer};

use crate::model::errors::{core_err_unexpected, BulletinResult};
use crate::{get_code_version, Config};

pub static LOG_FILE: &str = "bulletin.log";

fn keep(log_level: LevelFilter) -> impl Fn(&Metadata) -> bool + Clone {
    move |metadata| wanted(log_level, metadata.target(), *metadata.level())
}

/// Our own events at the configured level; from dependencies (reqwest, hyper, rustls) only
/// warnings and errors, which is where a failing GitHub connection shows up.
fn wanted(log_level: LevelFilter, target: &str, level: Level) -> bool {
    // covers bulletin_rs and the bulletin cli
    if target.starts_with("bulletin") {
        log_level >= level
    } else {
        level <= Level::WARN
    }
}

pub fn init(config: &Config) -> BulletinResult<()> {
    if config.logs {
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| s.as_str().parse().ok())
            .unwrap_or(LevelFilter::DEBUG);

        let mut layers = Vec::with_capacity(2);

        layers.push(
            fmt::Layer::new()
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_ansi(config.colored_logs)
                .with_target(true)
                .with_writer(tracing_appender::rolling::never(&config.writeable_path, LOG_FILE))
                .with_filter(filter::filter_fn(keep(log_level)))
                .boxed(),
        );

        if config.stdout_logs {
            layers.push(
                fmt::Layer::new()
                    .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                    .with_ansi(config.colored_logs)
                    .with_target(true)
                    .with_filter(filter::filter_fn(keep(log_level)))
                    .boxed(),
            );
        }

        tracing::subscriber::set_global_default(
            tracing_subscriber::Registry::default().with(layers),
        )
        .map_err(core_err_unexpected)?;
        panic_capture(config);
    }
    Ok(())
}

/// Panics are logged, and also written to their own file next to [LOG_FILE] so a crash report
/// survives even when the log file is being rotated or truncated.
fn panic_capture(config: &Config) {
    let dir = config.writeable_path.clone();
    let repository = config.store.repository.clone();
    panic::set_hook(Box::new(move |panic_info| {
        let bt = Backtrace::force_capture();
        let version = get_code_version();
        tracing::error!(%version, %repository, "panic detected: {panic_info} {bt}");
        eprintln!("bulletin {version} crashed: {panic_info}\nsee {dir}/{LOG_FILE}");

        let timestamp = Local::now().format("%Y-%m-%d---%H-%M-%S");
        let file_name = format!("{dir}/bulletin-panic---{timestamp}.log");
        let content =
            format!("VERSION: {version}\nREPOSITORY: {repository}\nINFO: {panic_info}\nBT: {bt}");

        // already panicking, nowhere left to report a failed write
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&file_name) {
            let _ = file.write_all(content.as_bytes());
        }
    }));
}
