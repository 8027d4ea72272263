// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Utilities: Point, path helpers used by the logger and asset loaders,
//! and the frame clock: clock.rs

use std::{
    env,
    fs::read_dir,
    io::{self, ErrorKind},
    path::{Path, PathBuf, MAIN_SEPARATOR},
};

mod clock;
pub use clock::*;

/// Integer pixel coordinate. Passed by value, never stored by the library.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifted copy, clamped to the i32 range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from(p: (i32, i32)) -> Self {
        Point { x: p.0, y: p.1 }
    }
}

/// get flag_file path...
pub fn get_project_root(flag_file: &str) -> io::Result<PathBuf> {
    let path = env::current_dir()?;
    for p in path.as_path().ancestors() {
        let mut found = false;
        for entry in read_dir(p)? {
            if entry?.file_name() == *flag_file {
                found = true;
                break;
            }
        }
        if found {
            return Ok(PathBuf::from(p));
        }
    }
    Err(io::Error::new(
        ErrorKind::NotFound,
        "Ran out of places to find flag_file",
    ))
}

/// Root used to resolve relative log and asset paths. It looks for the
/// directory holding Cargo.lock and falls back to ".".
pub fn get_root_path() -> PathBuf {
    get_project_root("Cargo.lock").unwrap_or_else(|_| PathBuf::from("."))
}

pub fn get_abs_path(fpath: &str) -> String {
    if Path::new(fpath).is_relative() {
        format!(
            "{}{}{}",
            get_root_path().display(),
            MAIN_SEPARATOR,
            fpath
        )
    } else {
        fpath.to_string()
    }
}
