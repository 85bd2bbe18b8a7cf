use std::fs::File;
use std::io::{
    BufReader,
    BufWriter,
    ErrorKind,
    Read,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use super::layout::StoreLayout;
use crate::data_structs::{
    CellType,
    Sentinel,
};
use crate::error::{
    StoreError,
    StoreResult,
};
use crate::utils::append_suffix;

/// Suffix appended to the store path to name its catalog file.
pub const CATALOG_SUFFIX: &str = "catalog";

const CATALOG_MAGIC: [u8; 4] = *b"MSTC";
const CATALOG_VERSION: u16 = 1;
/// Upper bound on bytes bincode may claim while decoding a catalog.
const CATALOG_DECODE_LIMIT: usize = 1 << 30;

/// Path of the catalog that describes the store at `store_path`.
pub fn catalog_path<P: AsRef<Path>>(store_path: P) -> PathBuf {
    append_suffix(store_path, CATALOG_SUFFIX)
}

/// On-disk shape of the catalog. Encoded with `&str` and decoded into
/// `String`.
#[derive(Serialize, Deserialize)]
struct CatalogRecord<S> {
    magic:     [u8; 4],
    version:   u16,
    store:     S,
    cell_type: CellType,
    sentinel:  Sentinel,
    probes:    Vec<S>,
    samples:   Vec<S>,
}

/// Index metadata of a matrix store: the fixed, ordered probe and sample
/// identifiers and the cell encoding.
///
/// Positions in `probes` are row indices and positions in `samples` are
/// column indices. Both sets double as the identifier -> index lookup.
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    store:     String,
    probes:    IndexSet<String>,
    samples:   IndexSet<String>,
    cell_type: CellType,
    sentinel:  Sentinel,
}

/// Catalogs are equal only if their identifiers are in the same order, since
/// the order fixes every row and column position.
impl PartialEq for IndexCatalog {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.store == other.store
            && self.cell_type == other.cell_type
            && self.sentinel == other.sentinel
            && self.probes.iter().eq(other.probes.iter())
            && self.samples.iter().eq(other.samples.iter())
    }
}

impl Eq for IndexCatalog {}

impl IndexCatalog {
    /// Builds the catalog of the store at `store_path`, rejecting empty or
    /// duplicated identifier lists with [`StoreError::Allocation`].
    pub fn try_new<P: AsRef<Path>>(
        store_path: P,
        probes: Vec<String>,
        samples: Vec<String>,
        cell_type: CellType,
        sentinel: Sentinel,
    ) -> StoreResult<Self> {
        let store_path = store_path.as_ref();
        let store = store_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| StoreError::allocation(store_path, "path has no file name"))?;
        let invalid = |reason: String| StoreError::allocation(store_path, reason);
        Ok(Self {
            store,
            probes: unique_ids("probe", probes).map_err(invalid)?,
            samples: unique_ids("sample", samples).map_err(invalid)?,
            cell_type,
            sentinel,
        })
    }

    /// Serializes the catalog to a writer using bincode.
    pub fn to_writer<W: Write>(
        &self,
        writer: &mut W,
    ) -> Result<(), bincode::error::EncodeError> {
        let record = CatalogRecord {
            magic:     CATALOG_MAGIC,
            version:   CATALOG_VERSION,
            store:     self.store.as_str(),
            cell_type: self.cell_type,
            sentinel:  self.sentinel,
            probes:    self.probes.iter().map(String::as_str).collect_vec(),
            samples:   self.samples.iter().map(String::as_str).collect_vec(),
        };
        let config = bincode::config::standard();
        bincode::serde::encode_into_std_write(&record, writer, config)?;
        Ok(())
    }

    /// Deserializes a catalog from the whole content of `reader`. Anything
    /// that is not exactly one valid catalog record is reported as
    /// [`StoreError::CatalogCorrupt`] for `path`.
    pub fn from_reader<R: Read>(
        reader: &mut R,
        path: &Path,
    ) -> StoreResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let config = bincode::config::standard().with_limit::<CATALOG_DECODE_LIMIT>();
        let (record, consumed): (CatalogRecord<String>, usize) =
            bincode::serde::decode_from_slice(&bytes, config)
                .map_err(|e| StoreError::corrupt(path, e))?;

        if consumed != bytes.len() {
            return Err(StoreError::corrupt(
                path,
                format!("{} trailing bytes after catalog record", bytes.len() - consumed),
            ));
        }
        if record.magic != CATALOG_MAGIC {
            return Err(StoreError::corrupt(path, format!("bad magic {:?}", record.magic)));
        }
        if record.version != CATALOG_VERSION {
            return Err(StoreError::corrupt(
                path,
                format!("unsupported catalog version {}", record.version),
            ));
        }

        let invalid = |reason: String| StoreError::corrupt(path, reason);
        Ok(Self {
            store:     record.store,
            probes:    unique_ids("probe", record.probes).map_err(invalid)?,
            samples:   unique_ids("sample", record.samples).map_err(invalid)?,
            cell_type: record.cell_type,
            sentinel:  record.sentinel,
        })
    }

    /// Reads the catalog stored next to `store_path`.
    pub fn read<P: AsRef<Path>>(store_path: P) -> StoreResult<Self> {
        let path = catalog_path(store_path);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::CatalogNotFound(path))
            },
            Err(e) => return Err(e.into()),
        };
        let catalog = Self::from_reader(&mut BufReader::new(file), &path)?;
        debug!(
            "Loaded catalog {} ({} probes x {} samples)",
            path.display(),
            catalog.n_probes(),
            catalog.n_samples()
        );
        Ok(catalog)
    }

    /// Writes the catalog into an already created file.
    pub(crate) fn write_into(
        &self,
        file: &File,
    ) -> std::io::Result<()> {
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e.to_string()))?;
        writer.flush()
    }
}

impl IndexCatalog {
    /// File name of the matrix store this catalog describes.
    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn probes(&self) -> &IndexSet<String> {
        &self.probes
    }

    pub fn samples(&self) -> &IndexSet<String> {
        &self.samples
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn sentinel(&self) -> Sentinel {
        self.sentinel
    }

    pub fn n_probes(&self) -> usize {
        self.probes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Row index of a probe identifier.
    pub fn probe_index(
        &self,
        probe: &str,
    ) -> Option<usize> {
        self.probes.get_index_of(probe)
    }

    /// Column index of a sample identifier.
    pub fn sample_index(
        &self,
        sample: &str,
    ) -> Option<usize> {
        self.samples.get_index_of(sample)
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(self.n_probes(), self.n_samples(), self.cell_type)
    }
}

fn unique_ids(
    kind: &str,
    ids: Vec<String>,
) -> Result<IndexSet<String>, String> {
    if ids.is_empty() {
        return Err(format!("{} list is empty", kind));
    }
    let expected = ids.len();
    let set: IndexSet<String> = ids.into_iter().collect();
    if set.len() != expected {
        return Err(format!(
            "{} list contains {} duplicate identifiers",
            kind,
            expected - set.len()
        ));
    }
    Ok(set)
}
