//! Binary persistence of the influence grid and its neighbor table.
//!
//! Both files start with a `#[repr(C)]` header of `u32` fields followed by
//! raw records in native byte order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::UVec2;
use thiserror::Error;

use crate::influence::{InfluenceCell, InfluenceMap, NeighborMap};

pub const OVERVIEW_FILE_NAME: &str = "overview.bin";
pub const NORMALIZE_FILE_NAME: &str = "normalize.bin";

/// Leading marker of both files.
pub const MARKER: u32 = 0x0F0F_0F0F;
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur while reading or writing persisted grids.
#[derive(Error, Debug)]
pub enum OverviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad file marker: {0:#010x}")]
    BadMarker(u32),
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),
    #[error("Cell size mismatch: expected {expected} bytes, found {found}")]
    CellSizeMismatch { expected: u32, found: u32 },
    #[error("Payload size mismatch: expected {expected} bytes, found {found}")]
    SizeMismatch { expected: u64, found: u64 },
    #[error("Truncated file: expected {expected} bytes, read {found}")]
    Truncated { expected: u64, found: u64 },
    #[error("Grid {width}x{height} exceeds the 4 GiB payload limit")]
    GridTooLarge { width: u32, height: u32 },
}

/// Header of `overview.bin`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct OverviewHeader {
    pub marker: u32,
    pub version: u32,
    pub width: u32,
    pub height: u32,
    /// Byte size of one `InfluenceCell` record.
    pub cell_size: u32,
    /// Byte size of the record payload.
    pub total_size: u32,
}

impl OverviewHeader {
    /// Builds the header for a grid of `size` cells.
    ///
    /// Fails when the payload does not fit the `u32` size field.
    pub fn for_size(size: UVec2) -> Result<Self, OverviewError> {
        let cell_size = InfluenceCell::BYTE_SIZE as u32;
        let total_size = size
            .x
            .checked_mul(size.y)
            .and_then(|cells| cells.checked_mul(cell_size))
            .ok_or(OverviewError::GridTooLarge {
                width: size.x,
                height: size.y,
            })?;
        Ok(Self {
            marker: MARKER,
            version: FORMAT_VERSION,
            width: size.x,
            height: size.y,
            cell_size,
            total_size,
        })
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    fn validate(&self) -> Result<(), OverviewError> {
        check_preamble(self.marker, self.version)?;
        let expected_cell = InfluenceCell::BYTE_SIZE as u32;
        if self.cell_size != expected_cell {
            return Err(OverviewError::CellSizeMismatch {
                expected: expected_cell,
                found: self.cell_size,
            });
        }
        let expected = self.width as u64 * self.height as u64 * self.cell_size as u64;
        if self.total_size as u64 != expected {
            return Err(OverviewError::SizeMismatch {
                expected,
                found: self.total_size as u64,
            });
        }
        Ok(())
    }
}

/// Header of `normalize.bin`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct NormalizeHeader {
    pub marker: u32,
    pub version: u32,
    pub float_count: u32,
}

fn check_preamble(marker: u32, version: u32) -> Result<(), OverviewError> {
    if marker != MARKER {
        return Err(OverviewError::BadMarker(marker));
    }
    if version != FORMAT_VERSION {
        return Err(OverviewError::UnsupportedVersion(version));
    }
    Ok(())
}

fn read_header<H: Pod, R: Read>(reader: &mut R) -> Result<H, OverviewError> {
    let mut header = H::zeroed();
    read_payload(reader, bytemuck::bytes_of_mut(&mut header))?;
    Ok(header)
}

fn read_payload<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), OverviewError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => {
                return Err(OverviewError::Truncated {
                    expected: buf.len() as u64,
                    found: filled as u64,
                })
            }
            n => filled += n,
        }
    }
    Ok(())
}

/// Writes the influence grid to `path`.
pub fn save_overview(map: &InfluenceMap, path: &Path) -> Result<(), OverviewError> {
    let header = OverviewHeader::for_size(map.size())?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(bytemuck::bytes_of(&header))?;
    writer.write_all(bytemuck::cast_slice(map.cells()))?;
    writer.flush()?;

    Ok(())
}

/// Reads only the header of an overview file.
pub fn read_overview_header(path: &Path) -> Result<OverviewHeader, OverviewError> {
    let mut reader = BufReader::new(File::open(path)?);
    let header: OverviewHeader = read_header(&mut reader)?;
    header.validate()?;
    Ok(header)
}

/// Reads an influence grid written by [`save_overview`].
pub fn load_overview(path: &Path) -> Result<InfluenceMap, OverviewError> {
    let mut reader = BufReader::new(File::open(path)?);
    let header: OverviewHeader = read_header(&mut reader)?;
    header.validate()?;

    let count = (header.width * header.height) as usize;
    let mut cells = vec![InfluenceCell::default(); count];
    read_payload(&mut reader, bytemuck::cast_slice_mut(&mut cells))?;

    Ok(InfluenceMap::new(header.size(), cells))
}

/// Writes the neighbor table to `path`.
pub fn save_normalize(table: &NeighborMap, path: &Path) -> Result<(), OverviewError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let header = NormalizeHeader {
        marker: MARKER,
        version: FORMAT_VERSION,
        float_count: table.values().len() as u32,
    };
    writer.write_all(bytemuck::bytes_of(&header))?;
    writer.write_all(bytemuck::cast_slice(table.values()))?;
    writer.flush()?;

    Ok(())
}

/// Reads only the header of a normalize file.
pub fn read_normalize_header(path: &Path) -> Result<NormalizeHeader, OverviewError> {
    let mut reader = BufReader::new(File::open(path)?);
    let header: NormalizeHeader = read_header(&mut reader)?;
    check_preamble(header.marker, header.version)?;
    Ok(header)
}

/// Reads a neighbor table written by [`save_normalize`].
///
/// When `cell_count` is given the table must hold four floats per cell.
pub fn load_normalize(path: &Path, cell_count: Option<usize>) -> Result<NeighborMap, OverviewError> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let header: NormalizeHeader = read_header(&mut reader)?;
    check_preamble(header.marker, header.version)?;

    if let Some(cells) = cell_count {
        let expected = (cells * NeighborMap::FLOATS_PER_CELL) as u64;
        if header.float_count as u64 != expected {
            return Err(OverviewError::SizeMismatch {
                expected: expected * 4,
                found: header.float_count as u64 * 4,
            });
        }
    }

    let payload = header.float_count as u64 * 4;
    let available = file_len.saturating_sub(std::mem::size_of::<NormalizeHeader>() as u64);
    if payload > available {
        return Err(OverviewError::Truncated {
            expected: payload,
            found: available,
        });
    }

    let mut values = vec![0.0f32; header.float_count as usize];
    read_payload(&mut reader, bytemuck::cast_slice_mut(&mut values))?;

    Ok(NeighborMap::from_values(values))
}
