use std::ops::Range;

use crate::data_structs::CellType;

/// Byte-offset arithmetic for a column-major `n_probes x n_samples` matrix
/// with fixed-width cells and no header.
///
/// Cell `(i, j)` lives at `(j * n_probes + i) * width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLayout {
    n_probes:  usize,
    n_samples: usize,
    cell_type: CellType,
}

impl StoreLayout {
    pub fn new(
        n_probes: usize,
        n_samples: usize,
        cell_type: CellType,
    ) -> Self {
        Self {
            n_probes,
            n_samples,
            cell_type,
        }
    }

    pub fn n_probes(&self) -> usize {
        self.n_probes
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn cell_width(&self) -> usize {
        self.cell_type.byte_width()
    }

    /// Byte offset of the cell at `probe` row, `sample` column.
    #[inline]
    pub fn offset(
        &self,
        probe: usize,
        sample: usize,
    ) -> u64 {
        debug_assert!(probe < self.n_probes && sample < self.n_samples);
        cell_offset(probe, sample, self.n_probes, self.cell_width())
    }

    /// Byte range occupied by one sample's column.
    pub fn column_range(
        &self,
        sample: usize,
    ) -> Range<u64> {
        let start = self.offset(0, sample);
        start..start + self.column_len() as u64
    }

    /// Length of one column in bytes.
    pub fn column_len(&self) -> usize {
        self.n_probes * self.cell_width()
    }

    /// Exact size of the matrix file, or `None` on overflow.
    pub fn total_len(&self) -> Option<u64> {
        (self.n_probes as u64)
            .checked_mul(self.n_samples as u64)?
            .checked_mul(self.cell_width() as u64)
    }
}

/// `(sample * n_probes + probe) * width`.
#[inline]
pub const fn cell_offset(
    probe: usize,
    sample: usize,
    n_probes: usize,
    width: usize,
) -> u64 {
    (sample as u64 * n_probes as u64 + probe as u64) * width as u64
}
