//! Export module for persisting and visualizing influence grids.
//!
//! Binary `overview.bin`/`normalize.bin` files for reloading a world, and
//! 16-bit PNG layers for inspection.

mod overview;
mod png;

pub use overview::{
    load_normalize, load_overview, read_normalize_header, read_overview_header, save_normalize,
    save_overview, NormalizeHeader, OverviewError, OverviewHeader, FORMAT_VERSION, MARKER,
    NORMALIZE_FILE_NAME, OVERVIEW_FILE_NAME,
};
pub use png::{export_all_layers, export_layer_png, Layer, PngExportError};
