//! Indexed out-of-core beta-value matrix.
//!
//! A store is two files:
//!
//! * the matrix file, exactly `P * S * width` bytes of little-endian floats in
//!   column-major order with no header, where cell `(probe i, sample j)` sits
//!   at byte `(j * P + i) * width`;
//! * the catalog `<matrix>.catalog`, a bincode-encoded [`IndexCatalog`]
//!   listing the probe and sample identifiers in row/column order.
//!
//! All operations go through a [`StoreHandle`]: [`StoreHandle::allocate`]
//! creates a store, [`StoreHandle::fill`] writes one sample's column,
//! [`StoreHandle::slice`] reads arbitrary cells, and [`StoreHandle::open`]
//! reloads the catalog of an existing store.
//!
//! There is no locking. Fills of different samples touch disjoint byte
//! ranges; fills of the same sample, or a slice concurrent with a fill of the
//! sampled column, must be serialized by the caller.

mod allocate;
mod catalog;
mod fill;
mod handle;
mod layout;
mod slice;

use std::io::{
    ErrorKind,
    Read,
    Seek,
    SeekFrom,
};
use std::path::Path;

pub use allocate::AllocateOptions;
pub use catalog::{
    catalog_path,
    IndexCatalog,
    CATALOG_SUFFIX,
};
pub use fill::FillSummary;
pub use handle::StoreHandle;
pub use layout::{
    cell_offset,
    StoreLayout,
};

use crate::error::{
    StoreError,
    StoreResult,
};

/// Fills `buffer` from `offset`, reporting a short file as
/// [`StoreError::Truncated`].
fn read_exact_at<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    buffer: &mut [u8],
    path: &Path,
) -> StoreResult<()> {
    reader.seek(SeekFrom::Start(offset))?;
    match reader.read_exact(buffer) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(StoreError::Truncated {
                path: path.to_path_buf(),
                offset,
            })
        },
        Err(e) => Err(e.into()),
    }
}
