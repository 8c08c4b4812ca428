//! Amrgeom is the geometry layer of a block-structured adaptive mesh
//! refinement (AMR) code. It describes the index space of a level (an
//! inclusive box of cells), the physical domain the cells cover, which axes
//! wrap around periodically, and how the level's domain is grown, coarsened
//! and refined. It also provides a roundoff-safe test of whether a physical
//! point maps to a cell inside the domain.
//!
//! Defaults used to build a geometry without naming every part are held by a
//! `Session`, which is initialized from `key=value` runtime parameters.

pub mod config;
pub mod error;
pub mod geometry;
pub mod index_space;
pub mod int_vect;
pub mod periodicity;
pub mod real_box;
pub mod session;

pub use error::{Error, Result};
pub use geometry::{CoordSys, Geometry};
pub use index_space::{range3d, IndexSpace};
pub use int_vect::IntVect;
pub use periodicity::Periodicity;
pub use real_box::RealBox;
pub use session::{GeometryDefaults, Session};




/// The number of spatial dimensions.
pub const SPACEDIM: usize = 3;
