// FBGL
// copyright zipxing@hotmail.com 2022～2025

/// Prints the geometry of a framebuffer surface.
///
/// Usage:
/// fbgl-info                 # /dev/fb0 or FBGL_DEVICE
/// fbgl-info /dev/fb1
/// fbgl-info --emulate       # shared memory surface
/// fbgl-info --config fbgl.toml
///
use clap::Parser;
use fbgl::{
    config::{init_config, FbglConfig},
    log::{init_log, parse_level},
    name_info,
    render::{Surface, SurfaceSource},
    version_info, Result, EMULATED_DEVICE,
};
#[cfg(linux_fb)]
use fbgl::render::backend::device::DeviceBackend;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fbgl-info", author = "zipxing@hotmail.com", version)]
#[command(about = "Show framebuffer geometry")]
struct Args {
    /// device path, "default" or /dev/fbgl-emu
    device: Option<String>,

    /// use the shared memory surface instead of a device
    #[arg(short, long)]
    emulate: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// also write a log file at the configured path
    #[arg(short, long)]
    log: bool,
}

fn run(args: Args) -> Result<()> {
    let mut cfg = FbglConfig::load(args.config.as_deref())?;
    if args.emulate {
        cfg.emulate = true;
    }
    if args.log {
        init_log(parse_level(&cfg.log_level)?, &cfg.log_file)?;
    }
    init_config(cfg.clone());

    let path = if args.emulate && args.device.is_none() {
        Some(EMULATED_DEVICE)
    } else {
        args.device.as_deref()
    };
    let source = SurfaceSource::from_path_with(path, &cfg);
    let mut surface = Surface::open(source.clone())?;
    println!("{} {}", name_info(), version_info());
    println!("source:       {:?}", source);
    #[cfg(linux_fb)]
    {
        if let Some(dev) = surface
            .backend_mut()
            .and_then(|b| b.as_any().downcast_ref::<DeviceBackend>())
        {
            println!("device:       {}", dev.path().display());
        }
    }
    println!("{}", surface.info());
    println!(
        "stride:       {} bytes, buffer {} bytes",
        surface.stride(),
        surface.len()
    );
    surface.close()
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fbgl-info: {}", e);
            ExitCode::FAILURE
        }
    }
}
