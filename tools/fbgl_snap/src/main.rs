// FBGL
// copyright zipxing@hotmail.com 2022～2025

/// Saves the emulated surface of a running program as a PNG.
///
/// Usage:
/// fbgl-snap out.png
/// fbgl-snap --key 0x1234FBCD out.png
/// fbgl-snap --remove out.png    # also drop the segment afterwards
///
use clap::Parser;
use fbgl::Result;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fbgl-snap", author = "zipxing@hotmail.com", version)]
#[command(about = "Snapshot the shared memory framebuffer")]
struct Args {
    /// output PNG file
    output: String,

    /// SysV key, decimal or 0x hex; defaults to the configured key
    #[arg(short, long)]
    key: Option<String>,

    /// remove the segment after the snapshot
    #[arg(short, long)]
    remove: bool,
}

#[cfg(linux_fb)]
fn run(args: Args) -> Result<()> {
    use fbgl::config::{get_config, parse_key};
    use fbgl::render::{backend::shm, surface::save_png};

    let key = match args.key.as_deref() {
        Some(k) => parse_key(k)?,
        None => get_config().shm_key,
    };
    let viewer = shm::ShmViewer::attach(key)?;
    save_png(
        viewer.frame(),
        viewer.width(),
        viewer.height(),
        viewer.width() as usize,
        &args.output,
    )?;
    drop(viewer);
    println!("saved {} from shm key {:#010x}", args.output, key);
    if args.remove {
        shm::remove_segment(key)?;
    }
    Ok(())
}

#[cfg(headless)]
fn run(_args: Args) -> Result<()> {
    Err(fbgl::FbglError::ResourceUnavailable(
        "shared memory surfaces need Linux".to_string(),
    ))
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fbgl-snap: {}", e);
            ExitCode::FAILURE
        }
    }
}
