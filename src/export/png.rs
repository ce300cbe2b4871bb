//! PNG export of planet grids.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma, Rgb};
use log::info;
use thiserror::Error;

use crate::terrain::{Heightmap, Planet};

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("No biome data available - classify biomes first")]
    Unclassified,
}

/// Which planet layer to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMode {
    /// 16-bit grayscale elevation, clamped to [0, 1].
    Elevation,
    /// Shaded ocean, beach and land ramp.
    Terrain,
    /// Fixed biome palette.
    Biomes,
    /// Blue to red heatmap over the grid's own range.
    Temperature,
    /// Brown to green to blue over [0, 1].
    Moisture,
}

impl ExportMode {
    pub const ALL: [ExportMode; 5] = [
        ExportMode::Elevation,
        ExportMode::Terrain,
        ExportMode::Biomes,
        ExportMode::Temperature,
        ExportMode::Moisture,
    ];

    /// Suffix used in generated file names.
    pub fn suffix(self) -> &'static str {
        match self {
            ExportMode::Elevation => "elevation",
            ExportMode::Terrain => "terrain",
            ExportMode::Biomes => "biomes",
            ExportMode::Temperature => "temperature",
            ExportMode::Moisture => "moisture",
        }
    }
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

type RgbImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Writes one layer of `planet` to `path`.
///
/// # Arguments
/// * `planet` - The planet to render
/// * `mode` - Which layer and colour ramp to use
/// * `path` - Output file path
/// * `options` - PNG encoder settings
///
/// # Returns
/// `Ok(())` on success. [`ExportMode::Biomes`] fails with
/// [`ExportError::Unclassified`] if the planet has no biome map.
pub fn export_png(
    planet: &Planet,
    mode: ExportMode,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let (w, h) = (planet.width(), planet.height());
    let img: RgbImage = match mode {
        ExportMode::Elevation => return export_grid_png(planet.elevation(), path, options),
        ExportMode::Terrain => {
            let sea = planet.sea_level();
            let e = planet.elevation();
            ImageBuffer::from_fn(w, h, |x, y| Rgb(terrain_color(e.get(x, y), sea)))
        }
        ExportMode::Biomes => {
            if !planet.is_classified() {
                return Err(ExportError::Unclassified);
            }
            ImageBuffer::from_fn(w, h, |x, y| Rgb(planet.biome_at(x, y).color()))
        }
        ExportMode::Temperature => {
            let t = planet.temperature();
            let lo = t.min_value();
            let mut range = t.max_value() - lo;
            if range < 1e-6 {
                range = 1.0;
            }
            ImageBuffer::from_fn(w, h, |x, y| {
                Rgb(temperature_color((t.get(x, y) - lo) / range))
            })
        }
        ExportMode::Moisture => {
            let m = planet.moisture();
            ImageBuffer::from_fn(w, h, |x, y| Rgb(moisture_color(m.get(x, y))))
        }
    };

    write_rgb(&img, path, options)?;
    info!("Exported {} map: {}", mode.suffix(), path.display());
    Ok(())
}

/// Writes a grid as 16-bit grayscale, mapping [0, 1] to the full range.
pub fn export_grid_png(
    grid: &Heightmap,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    let (w, h) = (grid.width(), grid.height());
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(w, h, |x, y| {
        let v = grid.get(x, y).clamp(0.0, 1.0);
        Luma([(v * 65535.0) as u16])
    });

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, w, h, image::ExtendedColorType::L16)?;

    info!("Exported heightmap: {}", path.display());
    Ok(())
}

/// Exports every mode as `{base_name}_{suffix}.png` under `output_dir`.
///
/// Skips [`ExportMode::Biomes`] when the planet is unclassified.
pub fn export_all(
    planet: &Planet,
    output_dir: &Path,
    base_name: &str,
    options: &PngExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(ExportMode::ALL.len());
    for mode in ExportMode::ALL {
        if mode == ExportMode::Biomes && !planet.is_classified() {
            continue;
        }
        let path = output_dir.join(format!("{}_{}.png", base_name, mode.suffix()));
        export_png(planet, mode, &path, options)?;
        written.push(path);
    }
    Ok(written)
}

fn write_rgb(img: &RgbImage, path: &Path, options: &PngExportOptions) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

fn terrain_color(elevation: f32, sea_level: f32) -> [u8; 3] {
    let e = elevation;
    if e < sea_level - 0.05 {
        let shallow = 1.0 - (sea_level - e) / sea_level;
        return [
            (15.0 + shallow * 30.0) as u8,
            (50.0 + shallow * 60.0) as u8,
            (100.0 + shallow * 60.0) as u8,
        ];
    }
    if e < sea_level {
        return [40, 100, 150];
    }
    if e < sea_level + 0.02 {
        return [210, 200, 160];
    }

    let land = (e - sea_level) / (1.0 - sea_level);
    if land < 0.3 {
        let t = land / 0.3;
        [
            (50.0 + t * 60.0) as u8,
            (130.0 - t * 20.0) as u8,
            (40.0 + t * 20.0) as u8,
        ]
    } else if land < 0.6 {
        let t = (land - 0.3) / 0.3;
        [
            (110.0 + t * 40.0) as u8,
            (110.0 - t * 20.0) as u8,
            (60.0 + t * 20.0) as u8,
        ]
    } else {
        let grey = (150.0 + (land - 0.6) / 0.4 * 105.0) as u8;
        [grey, grey, grey]
    }
}

/// `t` is the temperature normalised to [0, 1].
fn temperature_color(t: f32) -> [u8; 3] {
    if t < 0.25 {
        let s = t / 0.25;
        [0, (s * 180.0) as u8, (200.0 - s * 50.0) as u8]
    } else if t < 0.5 {
        let s = (t - 0.25) / 0.25;
        [0, (180.0 + s * 50.0) as u8, (150.0 * (1.0 - s)) as u8]
    } else if t < 0.75 {
        let s = (t - 0.5) / 0.25;
        [(s * 230.0) as u8, (230.0 - s * 50.0) as u8, 0]
    } else {
        let s = (t - 0.75) / 0.25;
        [(230.0 + s * 25.0) as u8, (180.0 * (1.0 - s)) as u8, 0]
    }
}

fn moisture_color(moisture: f32) -> [u8; 3] {
    let m = moisture.clamp(0.0, 1.0);
    if m < 0.3 {
        let s = m / 0.3;
        [
            (180.0 - s * 80.0) as u8,
            (150.0 - s * 30.0) as u8,
            (80.0 + s * 20.0) as u8,
        ]
    } else if m < 0.6 {
        let s = (m - 0.3) / 0.3;
        [
            (100.0 * (1.0 - s)) as u8,
            (120.0 + s * 60.0) as u8,
            (100.0 * (1.0 - s) + s * 50.0) as u8,
        ]
    } else {
        let s = (m - 0.6) / 0.4;
        [
            (30.0 * (1.0 - s)) as u8,
            (180.0 - s * 60.0) as u8,
            (50.0 + s * 130.0) as u8,
        ]
    }
}
