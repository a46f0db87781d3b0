//! Influence grid: per-cell plate, climate and elevation attributes.
//!
//! Built once per world by composition and moisture diffusion, then treated as
//! read-only. The neighbor table is derived from the composed heights.

mod cell;
mod map;
mod compose;
mod normalize;

pub use cell::InfluenceCell;
pub use map::InfluenceMap;
pub use compose::{compose_cells, Composition, CompositionFields};
pub use normalize::NeighborMap;
