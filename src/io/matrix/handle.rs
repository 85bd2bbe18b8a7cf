use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use indexmap::IndexSet;
use log::info;

use super::catalog::{
    catalog_path,
    IndexCatalog,
};
use super::layout::StoreLayout;
use crate::data_structs::{
    CellType,
    Sentinel,
    UnknownProbePolicy,
};
use crate::error::{
    StoreError,
    StoreResult,
};

/// Handle to an on-disk beta-value matrix.
///
/// The handle owns the loaded [`IndexCatalog`] and the path of the matrix
/// file. It never keeps the file open: every fill or slice opens its own
/// file descriptor, so a handle can be shared by reference between threads.
/// Cloning copies the whole catalog, which for array-sized stores holds
/// hundreds of thousands of identifiers. The catalog is never modified after
/// the handle is created.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    pub(super) path:           PathBuf,
    pub(super) catalog:        IndexCatalog,
    pub(super) unknown_probes: UnknownProbePolicy,
}

impl StoreHandle {
    pub(super) fn from_parts(
        path: PathBuf,
        catalog: IndexCatalog,
    ) -> Self {
        Self {
            path,
            catalog,
            unknown_probes: UnknownProbePolicy::default(),
        }
    }

    /// Reopens an existing store by loading its catalog.
    ///
    /// The matrix file itself is not touched; a truncated store only
    /// surfaces when affected cells are read. Use [`verify`](Self::verify)
    /// for an eager check.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let catalog = IndexCatalog::read(&path)?;
        info!(
            "Opened store {} ({} probes x {} samples, {})",
            path.display(),
            catalog.n_probes(),
            catalog.n_samples(),
            catalog.cell_type()
        );
        Ok(Self::from_parts(path, catalog))
    }

    /// Sets how [`fill`](Self::fill) treats probes the store does not know.
    pub fn with_unknown_probes(
        mut self,
        policy: UnknownProbePolicy,
    ) -> Self {
        self.unknown_probes = policy;
        self
    }

    /// Checks that the matrix file has exactly the size the catalog implies.
    pub fn verify(&self) -> StoreResult<()> {
        let expected = self.expected_len();
        let actual = File::open(&self.path)?.metadata()?.len();
        if actual < expected {
            return Err(StoreError::Truncated {
                path:   self.path.clone(),
                offset: actual,
            });
        }
        if actual != expected {
            return Err(StoreError::SizeMismatch {
                path: self.path.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl StoreHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog_path(&self) -> PathBuf {
        catalog_path(&self.path)
    }

    pub fn catalog(&self) -> &IndexCatalog {
        &self.catalog
    }

    /// Probe identifiers in row order.
    pub fn probes(&self) -> &IndexSet<String> {
        self.catalog.probes()
    }

    /// Sample identifiers in column order.
    pub fn samples(&self) -> &IndexSet<String> {
        self.catalog.samples()
    }

    pub fn n_probes(&self) -> usize {
        self.catalog.n_probes()
    }

    pub fn n_samples(&self) -> usize {
        self.catalog.n_samples()
    }

    pub fn cell_type(&self) -> CellType {
        self.catalog.cell_type()
    }

    pub fn cell_byte_width(&self) -> usize {
        self.catalog.cell_type().byte_width()
    }

    pub fn sentinel(&self) -> Sentinel {
        self.catalog.sentinel()
    }

    pub fn unknown_probes(&self) -> UnknownProbePolicy {
        self.unknown_probes
    }

    /// Whether `value` is the bit pattern of a never-written cell.
    pub fn is_sentinel(
        &self,
        value: f64,
    ) -> bool {
        self.sentinel().matches(value)
    }

    pub fn layout(&self) -> StoreLayout {
        self.catalog.layout()
    }

    /// Size in bytes the matrix file must have.
    pub fn expected_len(&self) -> u64 {
        // Catalogs are only built from dimensions whose product fits.
        self.layout().total_len().unwrap_or(u64::MAX)
    }
}
