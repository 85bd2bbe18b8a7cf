use std::fs::File;

use itertools::Itertools;
use log::debug;
use ndarray::{
    Array1,
    Array2,
};
use rayon::prelude::*;

use super::handle::StoreHandle;
use super::read_exact_at;
use crate::data_structs::BetaSlice;
use crate::error::StoreResult;
use crate::utils::THREAD_POOL;

impl StoreHandle {
    /// Reads arbitrary cells into a dense matrix.
    ///
    /// Rows follow `probes` and columns follow `samples` in the order given.
    /// Identifiers that the store does not contain are dropped from the
    /// result rather than reported as errors, so callers that need every
    /// requested identifier should compare [`BetaSlice::shape`] with the
    /// request.
    ///
    /// Every cell is an independent seek and read, which suits sparse lookups.
    /// For many probes of a few samples prefer
    /// [`read_columns`](Self::read_columns).
    pub fn slice<S, P>(
        &self,
        samples: &[S],
        probes: &[P],
    ) -> StoreResult<BetaSlice>
    where
        S: AsRef<str>,
        P: AsRef<str>, {
        let rows = resolve(probes, |id| self.catalog.probe_index(id));
        let cols = resolve(samples, |id| self.catalog.sample_index(id));
        if rows.len() < probes.len() || cols.len() < samples.len() {
            debug!(
                "Dropped {} unknown probes and {} unknown samples from slice of {}",
                probes.len() - rows.len(),
                samples.len() - cols.len(),
                self.path.display()
            );
        }

        let layout = self.layout();
        let cell_type = layout.cell_type();
        let mut values = Array2::<f64>::zeros((rows.len(), cols.len()));
        if !values.is_empty() {
            let mut file = File::open(&self.path)?;
            let mut cell = vec![0u8; layout.cell_width()];
            for (out_col, (_, col)) in cols.iter().enumerate() {
                for (out_row, (_, row)) in rows.iter().enumerate() {
                    let offset = layout.offset(*row, *col);
                    read_exact_at(&mut file, offset, &mut cell, &self.path)?;
                    values[[out_row, out_col]] = cell_type.decode(&cell);
                }
            }
        }

        Ok(BetaSlice::new(
            rows.into_iter().map(|(id, _)| id).collect(),
            cols.into_iter().map(|(id, _)| id).collect(),
            values,
        ))
    }

    /// Reads the full column of one sample in probe order.
    pub fn read_column(
        &self,
        sample: &str,
    ) -> StoreResult<Array1<f64>> {
        let col = self.resolve_sample(sample)?;
        let mut file = File::open(&self.path)?;
        self.read_column_at(&mut file, col)
    }

    /// Reads whole columns for several samples, all probes in storage order.
    ///
    /// Columns are read in parallel on the crate thread pool, each worker
    /// with its own file handle. Unknown samples are dropped as in
    /// [`slice`](Self::slice).
    pub fn read_columns<S: AsRef<str> + Sync>(
        &self,
        samples: &[S],
    ) -> StoreResult<BetaSlice> {
        let cols = resolve(samples, |id| self.catalog.sample_index(id));
        let columns: Vec<Array1<f64>> = THREAD_POOL.install(|| {
            cols.par_iter()
                .map(|(_, col)| {
                    let mut file = File::open(&self.path)?;
                    self.read_column_at(&mut file, *col)
                })
                .collect::<StoreResult<Vec<_>>>()
        })?;

        let mut values = Array2::<f64>::zeros((self.n_probes(), cols.len()));
        for (out_col, column) in columns.into_iter().enumerate() {
            values.column_mut(out_col).assign(&column);
        }
        Ok(BetaSlice::new(
            self.probes().iter().cloned().collect(),
            cols.into_iter().map(|(id, _)| id).collect(),
            values,
        ))
    }

    fn read_column_at(
        &self,
        file: &mut File,
        col: usize,
    ) -> StoreResult<Array1<f64>> {
        let layout = self.layout();
        let cell_type = layout.cell_type();
        let mut buffer = vec![0u8; layout.column_len()];
        read_exact_at(file, layout.column_range(col).start, &mut buffer, &self.path)?;
        Ok(buffer
            .chunks_exact(layout.cell_width())
            .map(|cell| cell_type.decode(cell))
            .collect())
    }
}

/// Keeps the identifiers that resolve, in request order, paired with their
/// storage index.
fn resolve<I, F>(
    ids: &[I],
    lookup: F,
) -> Vec<(String, usize)>
where
    I: AsRef<str>,
    F: Fn(&str) -> Option<usize>, {
    ids.iter()
        .filter_map(|id| {
            let id = id.as_ref();
            lookup(id).map(|idx| (id.to_string(), idx))
        })
        .collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_request_order() {
        let known = ["a", "b", "c"];
        let lookup = |id: &str| known.iter().position(|k| *k == id);
        let resolved = resolve(&["c", "x", "a", "c"], lookup);
        assert_eq!(
            resolved,
            vec![
                ("c".to_string(), 2),
                ("a".to_string(), 0),
                ("c".to_string(), 2)
            ]
        );
    }
}
