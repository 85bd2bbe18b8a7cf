//! # methstore
//!
//! `methstore` persists a large probes × samples matrix of DNA methylation
//! beta values on disk and gives random access to individual cells or whole
//! sample columns without loading the matrix into memory.
//!
//! ## Key Features
//!
//! * **Fixed layout**: the matrix file is a header-less, column-major block of
//!   little-endian floats, so the position of any cell is a pure function of
//!   its row and column ([`StoreLayout`]).
//! * **Separate catalog**: probe and sample identifiers are kept in a
//!   bincode-encoded [`IndexCatalog`] next to the matrix and loaded verbatim
//!   when a store is reopened.
//! * **Column fills**: one sample is written at a time from a probe -> value
//!   map ([`StoreHandle::fill`]), touching only that sample's byte range.
//! * **Sparse reads**: arbitrary (sample, probe) cells are read with
//!   independent seeks into an `ndarray` matrix ([`StoreHandle::slice`]);
//!   whole columns can be read in parallel ([`StoreHandle::read_columns`]).
//! * **Array designs**: stores can be allocated from the canonical probe list
//!   of an Illumina [`Platform`], resolved through an injected
//!   [`ProbeCatalog`] such as [`PlatformManifest`].
//!
//! Number of threads used for parallel column reads can be configured with
//! the `METHSTORE_NUM_THREADS` environment variable.
//!
//! ## Usage
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use methstore::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = StoreHandle::allocate(
//!         "betas.bin",
//!         ["cg1", "cg2", "cg3"],
//!         ["s1", "s2"],
//!         AllocateOptions::default(),
//!     )?;
//!
//!     let values = HashMap::from([("cg1", 0.1), ("cg2", 0.5), ("cg3", 0.9)]);
//!     store.fill("s2", values)?;
//!
//!     let reopened = StoreHandle::open("betas.bin")?;
//!     let slice = reopened.slice(&["s2"], &["cg3", "cg1"])?;
//!     assert_eq!(slice.get("cg3", "s2"), Some(0.9));
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod utils;

pub use crate::annotation::{
    PlatformManifest,
    ProbeCatalog,
};
pub use crate::data_structs::{
    BetaSlice,
    CellType,
    Platform,
    Sentinel,
    UnknownProbePolicy,
};
pub use crate::error::{
    StoreError,
    StoreResult,
};
pub use crate::io::matrix::{
    AllocateOptions,
    FillSummary,
    IndexCatalog,
    StoreHandle,
    StoreLayout,
};
