//! Core value types shared by the store and its collaborators.
//!
//! - [`CellType`] and [`Sentinel`] describe how a single matrix cell is laid
//!   out on disk and what an unwritten cell looks like.
//! - [`Platform`] is the closed set of array designs with a canonical probe
//!   catalog.
//! - [`UnknownProbePolicy`] controls how fills treat unrecognised probes.
//! - [`BetaSlice`] is the dense result of reading cells back.

mod enums;
mod slice;

pub use enums::{
    CellType,
    Platform,
    Sentinel,
    UnknownProbePolicy,
};
pub use slice::BetaSlice;
