//! PNG export of scalar influence layers.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::influence::{InfluenceCell, InfluenceMap};

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Influence map is empty")]
    EmptyMap,
}

/// Scalar attribute of an influence cell that can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Height,
    Temperature,
    Moisture,
    MoistureCapacity,
    PlateDistance,
    Collision,
    TerrainScale,
}

impl Layer {
    pub fn all() -> [Layer; 7] {
        [
            Layer::Height,
            Layer::Temperature,
            Layer::Moisture,
            Layer::MoistureCapacity,
            Layer::PlateDistance,
            Layer::Collision,
            Layer::TerrainScale,
        ]
    }

    /// File stem used by [`export_all_layers`].
    pub fn short_name(&self) -> &'static str {
        match self {
            Layer::Height => "height",
            Layer::Temperature => "temperature",
            Layer::Moisture => "moisture",
            Layer::MoistureCapacity => "moisture_capacity",
            Layer::PlateDistance => "plate_distance",
            Layer::Collision => "collision",
            Layer::TerrainScale => "terrain_scale",
        }
    }

    /// Cell value mapped to `[0, 1]`.
    pub fn normalized(&self, cell: &InfluenceCell) -> f32 {
        let v = match self {
            Layer::Height => cell.height_base,
            Layer::Temperature => cell.temperature,
            Layer::Moisture => cell.moisture,
            Layer::MoistureCapacity => cell.moisture_capacity,
            Layer::PlateDistance => cell.plate_distance_value,
            // [-1, 1] -> [0, 1]
            Layer::Collision => cell.collision * 0.5 + 0.5,
            Layer::TerrainScale => cell.terrain_scale,
        };
        v.clamp(0.0, 1.0)
    }
}

/// Exports one layer of `map` as a 16-bit grayscale PNG, row 0 at the top.
pub fn export_layer_png(map: &InfluenceMap, layer: Layer, path: &Path) -> Result<(), PngExportError> {
    if map.is_empty() {
        return Err(PngExportError::EmptyMap);
    }

    let size = map.size();
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(size.x, size.y);
    for (pixel, cell) in img.pixels_mut().zip(map.cells()) {
        *pixel = Luma([(layer.normalized(cell) * 65535.0) as u16]);
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, size.x, size.y, image::ExtendedColorType::L16)?;

    Ok(())
}

/// Exports every layer as `{base_name}_{layer}.png` into `output_dir`.
pub fn export_all_layers(map: &InfluenceMap, output_dir: &Path, base_name: &str) -> Result<(), PngExportError> {
    std::fs::create_dir_all(output_dir)?;

    for layer in Layer::all() {
        let filename = format!("{}_{}.png", base_name, layer.short_name());
        export_layer_png(map, layer, &output_dir.join(filename))?;
    }

    Ok(())
}
