//! Round trip every image of a directory through I420, I444 and NV12 and report the error
//!
//! ```text
//! convert <directory> [bt601|bt709]
//! ```
//!
//! Next to every source image `<name>.<format>.png` is written with the result of the round trip.

use anyhow::{Context as _, bail};
use ezk_color_primitives::{ColorSpace, ImageFormat, PixelFormat};
use image::RgbImage;
use std::path::{Path, PathBuf};

const SOURCE_EXTENSIONS: [&str; 5] = ["ppm", "pnm", "png", "jpg", "jpeg"];

const TARGETS: [(&str, PixelFormat); 3] = [
    ("i420", PixelFormat::I420),
    ("i444", PixelFormat::I444),
    ("nv12", PixelFormat::NV12),
];

/// Difference between the source image and its round trip, over the R, G and B channels
#[derive(Debug, Clone, Copy, PartialEq)]
struct RoundTripError {
    max: u8,
    psnr: f64,
}

impl RoundTripError {
    /// Compare two BGRA buffers of equal size, alpha is ignored
    fn measure(expected: &[u8], actual: &[u8]) -> Self {
        let mut max = 0;
        let mut squared_sum = 0u64;
        let mut samples = 0u64;

        for (expected, actual) in expected.chunks_exact(4).zip(actual.chunks_exact(4)) {
            for c in 0..3 {
                let diff = expected[c].abs_diff(actual[c]);

                max = max.max(diff);
                squared_sum += u64::from(diff) * u64::from(diff);
                samples += 1;
            }
        }

        let mse = squared_sum as f64 / samples.max(1) as f64;

        let psnr = if mse == 0.0 {
            f64::INFINITY
        } else {
            10.0 * (255.0 * 255.0 / mse).log10()
        };

        Self { max, psnr }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);

    let Some(dir) = args.next() else {
        bail!("usage: convert <directory> [bt601|bt709]");
    };

    let color_space = match args.next().as_deref() {
        None | Some("bt601") => ColorSpace::BT601,
        Some("bt709") => ColorSpace::BT709,
        Some(other) => bail!("unknown color space {other}, expected bt601 or bt709"),
    };

    ezk_color_primitives::initialize();

    if let Some(acceleration) = ezk_color_primitives::describe_acceleration() {
        log::info!("Using {acceleration}");
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .with_context(|| format!("failed to read directory {dir}"))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| is_source(path))
        .collect();

    paths.sort();

    if paths.is_empty() {
        log::warn!("No images found in {dir}");
    }

    for path in paths {
        round_trip(&path, color_space)
            .with_context(|| format!("failed to convert {}", path.display()))?;
    }

    Ok(())
}

/// Images with a known extension which were not written by a previous run
fn is_source(path: &Path) -> bool {
    let has_extension = |path: &Path, extensions: &[&str]| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
    };

    let written = path.file_stem().is_some_and(|stem| {
        has_extension(Path::new(stem), &TARGETS.map(|(name, _)| name))
    });

    has_extension(path, &SOURCE_EXTENSIONS) && !written
}

fn round_trip(path: &Path, color_space: ColorSpace) -> anyhow::Result<()> {
    let image = image::open(path)?.to_rgb8();

    // Subsampled formats need even dimensions
    let (width, height) = (image.width() & !1, image.height() & !1);

    if width == 0 || height == 0 {
        log::warn!("Skipping {}, it is smaller than 2x2", path.display());
        return Ok(());
    }

    let image = image::imageops::crop_imm(&image, 0, 0, width, height).to_image();

    let rgb_format = ImageFormat::new(PixelFormat::RGB, ColorSpace::LRGB, 1);
    let bgra_format = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);

    let mut bgra = vec![0u8; width as usize * height as usize * 4];
    ezk_color_primitives::convert_image(
        width,
        height,
        &rgb_format,
        None,
        &[image.as_raw()],
        &bgra_format,
        None,
        &mut [&mut bgra],
    )?;

    for (name, pixel_format) in TARGETS {
        let format = ImageFormat::new(pixel_format, color_space, 1);

        let mut size = [0];
        ezk_color_primitives::get_buffers_size(width, height, &format, None, &mut size)?;

        let mut ycbcr = vec![0u8; size[0]];
        ezk_color_primitives::convert_image(
            width,
            height,
            &bgra_format,
            None,
            &[&bgra],
            &format,
            None,
            &mut [&mut ycbcr],
        )?;

        let mut result = vec![0u8; bgra.len()];
        ezk_color_primitives::convert_image(
            width,
            height,
            &format,
            None,
            &[&ycbcr],
            &bgra_format,
            None,
            &mut [&mut result],
        )?;

        let error = RoundTripError::measure(&bgra, &result);

        println!(
            "{}: {name} max error {}, PSNR {:.2} dB",
            path.display(),
            error.max,
            error.psnr
        );

        let mut rgb = vec![0u8; image.as_raw().len()];
        ezk_color_primitives::convert_image(
            width,
            height,
            &bgra_format,
            None,
            &[&result],
            &rgb_format,
            None,
            &mut [&mut rgb],
        )?;

        let output = path.with_extension(format!("{name}.png"));

        RgbImage::from_raw(width, height, rgb)
            .context("round trip produced a buffer of the wrong size")?
            .save(&output)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    Ok(())
}
