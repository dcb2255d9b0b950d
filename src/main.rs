//! segdisp - render a segmented alphanumeric display to PNG
//!
//! # Flow
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Config (TOML)  +  command line          │
//! │                   ↓                      │
//! │  ShapeLibrary  →  SegmentDisplay         │
//! │                   ↓   (resize, frame)    │
//! │  OwnedSurface  ←  draw × repeat          │
//! │                   ↓                      │
//! │              PNG snapshot                │
//! └──────────────────────────────────────────┘
//! ```

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use segdisp::config::{self, Config};
use segdisp::snapshot;
use segdisp::{DisplayFrame, FpsCounter, OwnedSurface, SegmentDisplay, ShapeLibrary};

/// Print help message
fn print_help() {
    println!(
        r#"segdisp {} - segmented alphanumeric display renderer

USAGE:
    segdisp [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --init-config           Generate config file with default settings
    -f, --force             Overwrite config file without confirmation
    --width PX              Canvas width (overrides [canvas] width)
    --height PX             Canvas height (overrides [canvas] height)
    --masks LIST            Cell masks, hex or decimal, comma separated
    --frame-file PATH       Read cell masks from a file
    --out PATH              Output PNG (default: timestamped file in snapshot_dir)
    --repeat N              Draw the frame N times and report FPS

MASKS:
    Bit j lights segment j (0 = top ... 15 = dot). Missing cells are blank.

EXAMPLES:
    segdisp --masks 0x3f,0x6,0xFFFF --out demo.png
    segdisp --frame-file frame.txt --repeat 500
    segdisp --init-config --force

CONFIG FILE:
    ~/.config/segdisp/config.toml  (or $SEGDISP_CONFIG)
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Value of `--name VALUE` or `--name=VALUE`
fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let prefix = format!("{}=", name);
    for (i, arg) in args.iter().enumerate() {
        if arg == name {
            return args.get(i + 1).map(String::as_str);
        }
        if let Some(v) = arg.strip_prefix(&prefix) {
            return Some(v);
        }
    }
    None
}

/// Parse an optional numeric argument
fn parse_arg<T: std::str::FromStr>(args: &[String], name: &str) -> Result<Option<T>> {
    match arg_value(args, name) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid value for {}: {:?}", name, v)),
        None => Ok(None),
    }
}

/// Generate the config file, asking before overwriting
fn init_config(force: bool) -> Result<()> {
    let path = config::default_config_path()
        .ok_or_else(|| anyhow!("Config directory not found"))?;

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        print!("Overwrite? [y/N]: ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input != "y" && input != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let path = Config::write_default(Some(&path))?;
    println!("Config file generated:");
    println!("  Path: {}", path.display());
    Ok(())
}

/// Build the frame from --masks / --frame-file, fitted to the grid
fn load_frame(args: &[String], cells: usize) -> Result<DisplayFrame> {
    let frame: DisplayFrame = if let Some(list) = arg_value(args, "--masks") {
        list.parse().context("Failed to parse --masks")?
    } else if let Some(path) = arg_value(args, "--frame-file") {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read frame file: {}", path))?;
        text.parse()
            .with_context(|| format!("Failed to parse frame file: {}", path))?
    } else {
        DisplayFrame::blank(cells)
    };

    if frame.len() > cells {
        warn!(
            "Frame has {} cells, display shows {}; extra cells dropped",
            frame.len(),
            cells
        );
    }
    Ok(frame.resized(cells))
}

fn output_path(args: &[String], cfg: &Config) -> Result<PathBuf> {
    if let Some(out) = arg_value(args, "--out") {
        return Ok(PathBuf::from(out));
    }
    let dir = cfg.output.snapshot_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create snapshot dir: {}", dir.display()))?;
    Ok(snapshot::snapshot_path(&dir))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("segdisp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // --init-config
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        return init_config(force);
    }

    info!("segdisp starting...");

    let cfg = Config::load();
    let width = parse_arg(&args, "--width")?.unwrap_or(cfg.canvas.width);
    let height = parse_arg(&args, "--height")?.unwrap_or(cfg.canvas.height);
    let repeat: u64 = parse_arg(&args, "--repeat")?.unwrap_or(1).max(1);

    let source = cfg.shapes.source();
    let library = ShapeLibrary::load(source.as_ref())
        .with_context(|| format!("Failed to load shapes from {}", source.describe()))?;

    let fps = Rc::new(RefCell::new(FpsCounter::new()));
    let mut display = SegmentDisplay::new(library, cfg.display_settings())
        .with_observer(Box::new(Rc::clone(&fps)));
    display
        .resize(width, height)
        .context("Failed to set up display geometry")?;

    let frame = load_frame(&args, display.cell_count())?;
    display.update_frame(frame);

    let mut surface = OwnedSurface::new(width, height);
    for _ in 0..repeat {
        display.draw(&mut surface)?;
    }

    let out = output_path(&args, &cfg)?;
    surface.save_png(&out)?;

    let fps = fps.borrow();
    println!("Saved {}x{} frame: {}", width, height, out.display());
    if repeat > 1 {
        println!("Frames: {}, FPS: {:.1}", fps.frames(), fps.fps());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_value_forms() {
        let a = args(&["segdisp", "--width", "640", "--height=200"]);
        assert_eq!(arg_value(&a, "--width"), Some("640"));
        assert_eq!(arg_value(&a, "--height"), Some("200"));
        assert_eq!(arg_value(&a, "--out"), None);
    }

    #[test]
    fn test_parse_arg_rejects_garbage() {
        let a = args(&["segdisp", "--repeat", "lots"]);
        assert!(parse_arg::<u64>(&a, "--repeat").is_err());
        assert_eq!(parse_arg::<u32>(&a, "--width").unwrap(), None);
    }

    #[test]
    fn test_load_frame_fits_grid() {
        let a = args(&["segdisp", "--masks", "0x3f,6"]);
        let frame = load_frame(&a, 4).unwrap();
        assert_eq!(frame.masks(), &[0x3f, 6, 0, 0]);

        let blank = load_frame(&args(&["segdisp"]), 3).unwrap();
        assert_eq!(blank.masks(), &[0, 0, 0]);
    }
}
