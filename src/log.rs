// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Log module, file logging through log4rs, reference
//! https://docs.rs/log4rs
//!
//! The library itself only uses the `log` facade. Programs call `init_log`
//! once; without it every log line is discarded.

use crate::error::{FbglError, Result};
#[cfg(feature = "log4rs")]
use crate::util::get_abs_path;
use log::LevelFilter;

#[cfg(feature = "log4rs")]
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// init logs system
#[cfg(feature = "log4rs")]
pub fn init_log(level: LevelFilter, file_path: &str) -> Result<()> {
    let fpstr = get_abs_path(file_path);
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(&fpstr)
        .map_err(|e| FbglError::Log(format!("{}: {}", fpstr, e)))?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|e| FbglError::Log(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| FbglError::Log(e.to_string()))?;
    Ok(())
}

/// Without log4rs only the max level is set, records go nowhere.
#[cfg(not(feature = "log4rs"))]
pub fn init_log(level: LevelFilter, _file_path: &str) -> Result<()> {
    log::set_max_level(level);
    Ok(())
}

/// Parses "off", "error", "warn", "info", "debug" or "trace".
pub fn parse_level(s: &str) -> Result<LevelFilter> {
    s.trim()
        .parse::<LevelFilter>()
        .map_err(|_| FbglError::Config(format!("bad log level {:?}", s)))
}
