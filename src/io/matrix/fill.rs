use std::borrow::Borrow;
use std::fs::{
    File,
    OpenOptions,
};
use std::io::{
    Seek,
    SeekFrom,
    Write,
};

use log::{
    debug,
    warn,
};

use super::handle::StoreHandle;
use super::read_exact_at;
use crate::data_structs::UnknownProbePolicy;
use crate::error::{
    StoreError,
    StoreResult,
};

/// Outcome of a single fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillSummary {
    /// Cells written in the target column.
    pub written: usize,
    /// Probes of the store that received no value and kept their content.
    pub missing: usize,
    /// Provided identifiers that are not probes of the store.
    pub ignored: usize,
}

impl FillSummary {
    /// Whether every probe of the store received a value.
    pub fn is_complete(&self) -> bool {
        self.missing == 0
    }
}

impl StoreHandle {
    /// Writes one sample's values into its column.
    ///
    /// `values` maps probe identifiers to beta values; if a probe appears
    /// more than once the last value wins. Probes of the store that are not
    /// in `values` keep their current content. Identifiers the store does not
    /// know are handled according to
    /// [`with_unknown_probes`](Self::with_unknown_probes).
    ///
    /// Only the byte range of the sample's column is modified. The write is
    /// not atomic: an interrupted fill can leave the column partly updated.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownSample`] and, under
    /// [`UnknownProbePolicy::Reject`], [`StoreError::UnknownProbe`] are
    /// returned before any byte is written.
    pub fn fill<I, K, V>(
        &self,
        sample: &str,
        values: I,
    ) -> StoreResult<FillSummary>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Borrow<f64>, {
        let col = self.resolve_sample(sample)?;

        let mut column: Vec<Option<f64>> = vec![None; self.n_probes()];
        let mut ignored = 0;
        for (probe, value) in values {
            let probe = probe.as_ref();
            match (self.catalog.probe_index(probe), self.unknown_probes) {
                (Some(row), _) => column[row] = Some(*value.borrow()),
                (None, UnknownProbePolicy::Ignore) => ignored += 1,
                (None, UnknownProbePolicy::Reject) => {
                    return Err(StoreError::UnknownProbe(probe.to_string()))
                },
            }
        }
        if ignored > 0 {
            warn!(
                "Ignored {} identifiers not present in store {} while filling '{}'",
                ignored,
                self.path.display(),
                sample
            );
        }

        let written = column.iter().filter(|value| value.is_some()).count();
        let missing = column.len() - written;
        let layout = self.layout();
        let cell_type = layout.cell_type();

        let mut file = self.open_for_write(layout.column_range(col).end)?;
        let start = layout.column_range(col).start;
        let mut buffer = vec![0u8; layout.column_len()];
        if missing > 0 {
            read_exact_at(&mut file, start, &mut buffer, &self.path)?;
        }
        for (cell, value) in buffer.chunks_exact_mut(layout.cell_width()).zip(&column) {
            if let Some(value) = value {
                cell_type.encode(*value, cell);
            }
        }
        write_at(&mut file, start, &buffer)?;

        debug!(
            "Filled sample '{}' (column {}): {} written, {} missing, {} ignored",
            sample, col, written, missing, ignored
        );
        Ok(FillSummary {
            written,
            missing,
            ignored,
        })
    }

    /// Writes a full column given in probe (row) order.
    pub fn fill_column(
        &self,
        sample: &str,
        values: &[f64],
    ) -> StoreResult<FillSummary> {
        let col = self.resolve_sample(sample)?;
        if values.len() != self.n_probes() {
            return Err(StoreError::ColumnLength {
                sample:   sample.to_string(),
                expected: self.n_probes(),
                actual:   values.len(),
            });
        }

        let layout = self.layout();
        let cell_type = layout.cell_type();
        let mut buffer = vec![0u8; layout.column_len()];
        for (cell, value) in buffer.chunks_exact_mut(layout.cell_width()).zip(values) {
            cell_type.encode(*value, cell);
        }

        let range = layout.column_range(col);
        let mut file = self.open_for_write(range.end)?;
        write_at(&mut file, range.start, &buffer)?;

        debug!("Filled sample '{}' (column {}) from a dense column", sample, col);
        Ok(FillSummary {
            written: values.len(),
            missing: 0,
            ignored: 0,
        })
    }

    pub(super) fn resolve_sample(
        &self,
        sample: &str,
    ) -> StoreResult<usize> {
        self.catalog
            .sample_index(sample)
            .ok_or_else(|| StoreError::UnknownSample(sample.to_string()))
    }

    /// Opens the matrix for writing, refusing to touch a file too short to
    /// hold `required_len` bytes so that writes never grow it.
    fn open_for_write(
        &self,
        required_len: u64,
    ) -> StoreResult<File> {
        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        let len = file.metadata()?.len();
        if len < required_len {
            return Err(StoreError::Truncated {
                path:   self.path.clone(),
                offset: len,
            });
        }
        Ok(file)
    }
}

fn write_at(
    file: &mut File,
    offset: u64,
    buffer: &[u8],
) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(buffer)?;
    file.flush()
}
