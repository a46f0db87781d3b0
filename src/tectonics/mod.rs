//! Tectonic plate model.
//!
//! This module implements:
//! - Plate discovery from a dual-nearest cellular field
//! - Symmetric plate adjacency and per-plate distance normalization
//! - Random plate drift rotated onto the sphere
//! - Signed collision magnitudes between adjacent plates
//! - Boundary blend weights and terrain profiles

mod config;
mod identity;
mod plate;
mod collision;
mod assign;
pub mod curves;

pub use config::TectonicConfig;
pub use identity::PlateIdentitySet;
pub use plate::PlateInfo;
pub use collision::{collision_magnitude, resolve_collisions};
pub use assign::{assign_plates, CellPlate, PlateAssignment, PlateFields};
pub use curves::{calculate_curve, convergent_curve, divergent_curve, BoundaryKind};
