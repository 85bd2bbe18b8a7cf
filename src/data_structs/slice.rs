use ndarray::{
    Array2,
    ArrayView1,
    Axis,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::getter_fn;

/// Dense block of beta values read from a store.
///
/// Rows correspond to [`probes`](Self::probes) and columns to
/// [`samples`](Self::samples), both in the order the caller requested them.
/// Identifiers the store did not know are absent, so the shape may be smaller
/// than the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaSlice {
    probes:  Vec<String>,
    samples: Vec<String>,
    values:  Array2<f64>,
}

impl BetaSlice {
    getter_fn!(probes, Vec<String>);
    getter_fn!(samples, Vec<String>);
    getter_fn!(values, Array2<f64>);

    pub(crate) fn new(
        probes: Vec<String>,
        samples: Vec<String>,
        values: Array2<f64>,
    ) -> Self {
        debug_assert_eq!(values.dim(), (probes.len(), samples.len()));
        Self {
            probes,
            samples,
            values,
        }
    }

    /// `(rows, columns)`, i.e. `(matched probes, matched samples)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first row named `probe` in the first column named
    /// `sample`.
    pub fn get(
        &self,
        probe: &str,
        sample: &str,
    ) -> Option<f64> {
        let row = self.probes.iter().position(|p| p == probe)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        self.values.get((row, col)).copied()
    }

    /// Values of one sample across all rows.
    pub fn column(
        &self,
        sample: &str,
    ) -> Option<ArrayView1<'_, f64>> {
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.values.index_axis(Axis(1), col))
    }

    /// Values of one probe across all columns.
    pub fn row(
        &self,
        probe: &str,
    ) -> Option<ArrayView1<'_, f64>> {
        let row = self.probes.iter().position(|p| p == probe)?;
        Some(self.values.index_axis(Axis(0), row))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn demo() -> BetaSlice {
        BetaSlice::new(
            vec!["cg3".into(), "cg1".into()],
            vec!["s2".into(), "s1".into()],
            array![[0.9, 0.3], [0.1, 0.7]],
        )
    }

    #[test]
    fn test_get() {
        let slice = demo();
        assert_eq!(slice.shape(), (2, 2));
        assert_eq!(slice.get("cg3", "s2"), Some(0.9));
        assert_eq!(slice.get("cg1", "s1"), Some(0.7));
        assert_eq!(slice.get("cg2", "s1"), None);
    }

    #[test]
    fn test_row_column() {
        let slice = demo();
        assert_eq!(slice.column("s1").unwrap().to_vec(), vec![0.3, 0.7]);
        assert_eq!(slice.row("cg1").unwrap().to_vec(), vec![0.1, 0.7]);
        assert!(slice.row("cg9").is_none());
    }
}
