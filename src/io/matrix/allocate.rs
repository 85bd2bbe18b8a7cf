use std::fs;
use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;

use itertools::Itertools;
use log::{
    debug,
    info,
};
use tempfile::NamedTempFile;

use super::catalog::{
    catalog_path,
    IndexCatalog,
};
use super::handle::StoreHandle;
use super::layout::StoreLayout;
use crate::annotation::ProbeCatalog;
use crate::data_structs::{
    CellType,
    Platform,
    Sentinel,
};
use crate::error::{
    StoreError,
    StoreResult,
};
use crate::utils::parent_dir;
use crate::with_field_fn;

/// Parameters of a new store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocateOptions {
    /// Bytes per cell; 4 (`f32`) or 8 (`f64`).
    pub cell_byte_width: usize,
    pub sentinel:        Sentinel,
    /// Replace an existing store and catalog at the target path.
    pub overwrite:       bool,
}

impl Default for AllocateOptions {
    fn default() -> Self {
        Self {
            cell_byte_width: CellType::default().byte_width(),
            sentinel:        Sentinel::default(),
            overwrite:       false,
        }
    }
}

impl AllocateOptions {
    with_field_fn!(cell_byte_width, usize);
    with_field_fn!(sentinel, Sentinel);
    with_field_fn!(overwrite, bool);

    pub fn with_cell_type(
        mut self,
        cell_type: CellType,
    ) -> Self {
        self.cell_byte_width = cell_type.byte_width();
        self
    }
}

impl StoreHandle {
    /// Creates a new store at `path` holding one column per sample and one
    /// row per probe, with every cell set to the sentinel.
    ///
    /// The matrix file and its catalog (`<path>.catalog`) are first written to
    /// temporary files next to `path` and then moved into place, so a failed
    /// allocation leaves nothing behind. With
    /// [`overwrite`](AllocateOptions::overwrite), a failed allocation leaves
    /// the previous store and its catalog in place.
    pub fn allocate<P, I, S, J, T>(
        path: P,
        probes: I,
        samples: J,
        options: AllocateOptions,
    ) -> StoreResult<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>, {
        let path = path.as_ref().to_path_buf();

        let cell_type =
            CellType::from_byte_width(options.cell_byte_width).ok_or_else(|| {
                StoreError::allocation(
                    &path,
                    format!("unsupported cell width of {} bytes", options.cell_byte_width),
                )
            })?;
        let catalog = IndexCatalog::try_new(
            &path,
            probes.into_iter().map(Into::into).collect_vec(),
            samples.into_iter().map(Into::into).collect_vec(),
            cell_type,
            options.sentinel,
        )?;

        let layout = catalog.layout();
        let total_len = layout
            .total_len()
            .filter(|len| *len > 0)
            .ok_or_else(|| {
                StoreError::allocation(&path, "dimensions produce no addressable storage")
            })?;

        let catalog_path = catalog_path(&path);
        if !options.overwrite && (path.exists() || catalog_path.exists()) {
            return Err(StoreError::allocation(&path, "store already exists"));
        }

        let dir = parent_dir(&path);
        let matrix_tmp = write_matrix(&dir, &layout, options.sentinel)
            .map_err(|e| StoreError::allocation(&path, e))?;
        let catalog_tmp = write_catalog(&dir, &catalog)
            .map_err(|e| StoreError::allocation(&path, e))?;
        debug!(
            "Wrote {} matrix bytes and catalog to temporary files in {}",
            total_len,
            dir.display()
        );

        // The catalog goes first: if it cannot be placed, the existing matrix
        // is still untouched.
        let previous_catalog = if options.overwrite && catalog_path.is_file() {
            Some(fs::read(&catalog_path).map_err(|e| StoreError::allocation(&path, e))?)
        }
        else {
            None
        };
        catalog_tmp
            .persist(&catalog_path)
            .map_err(|e| StoreError::allocation(&path, e.error))?;
        if let Err(e) = matrix_tmp.persist(&path) {
            let _ = match previous_catalog {
                Some(bytes) => fs::write(&catalog_path, bytes),
                None => fs::remove_file(&catalog_path),
            };
            return Err(StoreError::allocation(&path, e.error));
        }

        info!(
            "Allocated store {} ({} probes x {} samples, {} bytes, sentinel {})",
            path.display(),
            layout.n_probes(),
            layout.n_samples(),
            total_len,
            options.sentinel
        );
        Ok(Self::from_parts(path, catalog))
    }

    /// Allocates a store whose rows are the canonical probe list of
    /// `platform`, as provided by `resolver`.
    pub fn allocate_for_platform<P, J, T, C>(
        path: P,
        platform: Platform,
        samples: J,
        resolver: &C,
        options: AllocateOptions,
    ) -> StoreResult<Self>
    where
        P: AsRef<Path>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
        C: ProbeCatalog + ?Sized, {
        let probes = resolver
            .probes(platform)
            .ok_or_else(|| StoreError::UnknownPlatform(platform.to_string()))?;
        debug!(
            "Resolved {} probes for platform {}",
            probes.len(),
            platform.array_name()
        );
        Self::allocate(path, probes.iter().cloned(), samples, options)
    }
}

fn write_matrix(
    dir: &Path,
    layout: &StoreLayout,
    sentinel: Sentinel,
) -> std::io::Result<NamedTempFile> {
    let tmp = NamedTempFile::new_in(dir)?;
    match sentinel {
        Sentinel::Zero => {
            // Extending a file fills it with zero bytes.
            let len = layout.total_len().unwrap_or_default();
            tmp.as_file().set_len(len)?;
        },
        Sentinel::NaN => {
            let cell_type = layout.cell_type();
            let mut column = vec![0u8; layout.column_len()];
            for cell in column.chunks_exact_mut(layout.cell_width()) {
                cell_type.encode(sentinel.value(), cell);
            }
            let mut writer = BufWriter::new(tmp.as_file());
            for _ in 0..layout.n_samples() {
                writer.write_all(&column)?;
            }
            writer.flush()?;
        },
    }
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

fn write_catalog(
    dir: &Path,
    catalog: &IndexCatalog,
) -> std::io::Result<NamedTempFile> {
    let tmp = NamedTempFile::new_in(dir)?;
    catalog.write_into(tmp.as_file())?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = AllocateOptions::default()
            .with_cell_type(CellType::Float32)
            .with_sentinel(Sentinel::Zero)
            .with_overwrite(true);
        assert_eq!(options.cell_byte_width, 4);
        assert_eq!(options.sentinel, Sentinel::Zero);
        assert!(options.overwrite);

        let defaults = AllocateOptions::default();
        assert_eq!(defaults.cell_byte_width, 8);
        assert_eq!(defaults.sentinel, Sentinel::NaN);
        assert!(!defaults.overwrite);
    }

    #[test]
    fn test_write_matrix_nan() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(3, 2, CellType::Float32);
        let tmp = write_matrix(dir.path(), &layout, Sentinel::NaN).unwrap();
        let bytes = fs::read(tmp.path()).unwrap();
        assert_eq!(bytes.len(), 24);
        assert!(bytes
            .chunks_exact(4)
            .all(|cell| CellType::Float32.decode(cell).is_nan()));
    }

    #[test]
    fn test_write_matrix_zero() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(4, 3, CellType::Float64);
        let tmp = write_matrix(dir.path(), &layout, Sentinel::Zero).unwrap();
        let bytes = fs::read(tmp.path()).unwrap();
        assert_eq!(bytes.len(), 96);
        assert!(bytes.iter().all(|b| *b == 0));
    }
}
