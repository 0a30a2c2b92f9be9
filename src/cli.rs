// src/cli.rs

//! Command line arguments and startup resolution: which canvas the editor
//! opens with and where the save key writes.

use crate::buffer::PixelBuffer;
use crate::config::Config;
use crate::grid::Canvas;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

/// Pixel-art editor for the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Initial canvas size as two values: width height
    #[arg(long, num_args = 2, value_names = ["DX", "DY"])]
    pub size: Option<Vec<u32>>,

    /// Image file to open at startup and to use as the save target
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// What the editor starts with, resolved from flags, config, and disk.
pub struct Startup {
    pub canvas: Canvas,
    pub save_path: PathBuf,
}

/// Resolves the starting canvas. An existing `--output` image wins over
/// `--size`; otherwise the editor starts with a fresh noise canvas at the
/// requested (or configured) size. A `--output` path that does not exist
/// yet is fine, it just becomes the save target.
pub fn resolve(args: &Args, config: &Config) -> Result<Startup> {
    let save_path = args
        .output
        .clone()
        .unwrap_or_else(|| config.canvas.output.clone());

    if args.output.is_some() && save_path.exists() {
        if args.size.is_some() {
            warn!("--size is ignored because {} exists.", save_path.display());
        }
        let bytes = std::fs::read(&save_path)
            .with_context(|| format!("could not read {}", save_path.display()))?;
        let buffer = PixelBuffer::from_png_bytes(&bytes)
            .with_context(|| format!("could not open {}", save_path.display()))?;
        info!(
            "Opened {} as a {}x{} canvas.",
            save_path.display(),
            buffer.dx(),
            buffer.dy()
        );
        return Ok(Startup {
            canvas: Canvas::new(buffer),
            save_path,
        });
    }

    let (dx, dy) = match args.size.as_deref() {
        Some([dx, dy]) => (*dx as usize, *dy as usize),
        Some(_) => bail!("--size takes exactly two values"),
        None => (config.canvas.width, config.canvas.height),
    };
    let canvas = Canvas::noise(dx, dy)
        .with_context(|| format!("cannot start with a {}x{} canvas", dx, dy))?;
    info!(
        "Starting with a fresh {}x{} canvas, saving to {}.",
        dx,
        dy,
        save_path.display()
    );
    Ok(Startup { canvas, save_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::grid::PixelGrid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("termpaint-cli-{}-{}.png", std::process::id(), name))
    }

    #[test]
    fn flags_parse() {
        let args =
            Args::try_parse_from(["termpaint", "--size", "12", "6", "-o", "art.png"]).unwrap();
        assert_eq!(args.size, Some(vec![12, 6]));
        assert_eq!(args.output, Some(PathBuf::from("art.png")));

        let bare = Args::try_parse_from(["termpaint"]).unwrap();
        assert_eq!(bare.size, None);
        assert_eq!(bare.output, None);

        assert!(Args::try_parse_from(["termpaint", "--size", "12"]).is_err());
    }

    #[test]
    fn requested_size_beats_config_for_fresh_canvases() {
        let args = Args {
            size: Some(vec![12, 6]),
            output: None,
        };
        let startup = resolve(&args, &Config::default()).unwrap();
        assert_eq!(startup.canvas.buffer().dimensions(), (12, 6));
        assert_eq!(startup.save_path, PathBuf::from("out.png"));
    }

    #[test]
    fn config_size_applies_without_flags() {
        let args = Args {
            size: None,
            output: None,
        };
        let startup = resolve(&args, &Config::default()).unwrap();
        assert_eq!(startup.canvas.buffer().dimensions(), (20, 20));
    }

    #[test]
    fn missing_output_file_starts_fresh_but_keeps_the_path() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        let args = Args {
            size: Some(vec![5, 4]),
            output: Some(path.clone()),
        };
        let startup = resolve(&args, &Config::default()).unwrap();
        assert_eq!(startup.canvas.buffer().dimensions(), (5, 4));
        assert_eq!(startup.save_path, path);
        assert!(!path.exists(), "resolution must not create the file");
    }

    #[test]
    fn existing_output_file_wins_over_size() {
        let path = temp_path("existing");
        let saved = PixelBuffer::filled(3, 2, Rgb::new(40, 50, 60)).unwrap();
        std::fs::write(&path, saved.to_png_bytes().unwrap()).unwrap();

        let args = Args {
            size: Some(vec![9, 9]),
            output: Some(path.clone()),
        };
        let startup = resolve(&args, &Config::default()).unwrap();
        assert_eq!(startup.canvas.buffer().dimensions(), (3, 2));
        assert_eq!(startup.canvas.sample(2, 1), Rgb::new(40, 50, 60));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_startup_image_is_fatal() {
        let path = temp_path("garbage");
        std::fs::write(&path, b"not a png").unwrap();
        let args = Args {
            size: None,
            output: Some(path.clone()),
        };
        assert!(resolve(&args, &Config::default()).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn zero_canvas_size_is_rejected() {
        let args = Args {
            size: Some(vec![0, 5]),
            output: None,
        };
        assert!(resolve(&args, &Config::default()).is_err());
    }
}
