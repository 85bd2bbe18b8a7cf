//! Reference datasets consumed by the store.
//!
//! Allocation can derive its probe list from an array design. The mapping
//! from [`Platform`] to the canonical, ordered probe identifiers is supplied
//! by the caller as a [`ProbeCatalog`]; [`PlatformManifest`] is the provided
//! implementation, filled programmatically or from Illumina manifest files.

use std::fs::File;
use std::io::{
    BufReader,
    Read,
};
use std::path::Path;

use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
};

use crate::data_structs::Platform;
use crate::error::{
    StoreError,
    StoreResult,
};

/// Read-only source of canonical probe lists.
pub trait ProbeCatalog {
    /// Ordered probe identifiers of `platform`, or `None` if the dataset does
    /// not cover it.
    fn probes(
        &self,
        platform: Platform,
    ) -> Option<&[String]>;
}

/// In-memory platform -> probe list dataset.
#[derive(Debug, Clone, Default)]
pub struct PlatformManifest {
    probes: HashMap<Platform, Vec<String>>,
}

impl PlatformManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probes(
        mut self,
        platform: Platform,
        probes: Vec<String>,
    ) -> Self {
        self.insert(platform, probes);
        self
    }

    /// Sets the probe list of `platform`, returning the previous one.
    pub fn insert(
        &mut self,
        platform: Platform,
        probes: Vec<String>,
    ) -> Option<Vec<String>> {
        self.probes.insert(platform, probes)
    }

    /// Loads the probe list of `platform` from a manifest file and returns
    /// the number of probes read.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        platform: Platform,
        path: P,
    ) -> StoreResult<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let probes = read_manifest(BufReader::new(file))?;
        let n = probes.len();
        info!(
            "Loaded {} probes for {} from {}",
            n,
            platform.array_name(),
            path.display()
        );
        self.insert(platform, probes);
        Ok(n)
    }

    /// Platforms covered by this dataset.
    pub fn platforms(&self) -> Vec<Platform> {
        self.probes.keys().copied().sorted().collect()
    }
}

impl ProbeCatalog for PlatformManifest {
    fn probes(
        &self,
        platform: Platform,
    ) -> Option<&[String]> {
        self.probes.get(&platform).map(Vec::as_slice)
    }
}

/// Column headers that identify probes in Illumina manifests. `Name` is
/// preferred when both exist.
const ID_HEADERS: [&str; 2] = ["Name", "IlmnID"];

/// Reads probe identifiers from either an Illumina manifest CSV or a plain
/// list with one identifier per line.
///
/// In a manifest, identifiers are taken from the `Name` (or `IlmnID`)
/// column of the `[Assay]` section; reading stops at the next section
/// marker such as `[Controls]`. Lines before the header row are discarded.
/// Blank lines and lines starting with `#` are skipped.
pub fn read_manifest<R: Read>(reader: R) -> StoreResult<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut id_column: Option<usize> = None;
    let mut probes = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| StoreError::Manifest(e.to_string()))?;
        let first = record.get(0).unwrap_or_default();
        if first.is_empty() || first.starts_with('#') {
            continue;
        }
        if first.starts_with('[') {
            if id_column.is_some() {
                break;
            }
            continue;
        }
        if id_column.is_none() {
            let header = ID_HEADERS
                .iter()
                .find_map(|name| record.iter().position(|field| field == *name));
            if let Some(idx) = header {
                debug!("Manifest header found, probe ids in column {}", idx);
                id_column = Some(idx);
                probes.clear();
                continue;
            }
        }

        let id = record.get(id_column.unwrap_or(0)).unwrap_or_default();
        if !id.is_empty() {
            probes.push(id.to_string());
        }
    }

    if probes.is_empty() {
        return Err(StoreError::Manifest(
            "no probe identifiers found".to_string(),
        ));
    }
    Ok(probes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const ILLUMINA_MANIFEST: &str = "\
Illumina, Inc.,,
[Heading],,
Descriptor File Name,HumanMethylation450_15017482_v1-2.bpm,
Assay Format,Infinium HD Methylation,
[Assay],,
IlmnID,Name,AddressA_ID
cg00035864,cg00035864,31729416
cg00050873,cg00050873,32735311
ch.1.1234R,ch.1.1234R,12345678
[Controls],,
28684356,STAINING,Red
";

    #[test]
    fn test_read_illumina_manifest() {
        let probes = read_manifest(Cursor::new(ILLUMINA_MANIFEST)).unwrap();
        assert_eq!(probes, vec!["cg00035864", "cg00050873", "ch.1.1234R"]);
    }

    #[test]
    fn test_read_plain_list() {
        let probes = read_manifest(Cursor::new("# 27k\ncg1\n\ncg2\ncg3\n")).unwrap();
        assert_eq!(probes, vec!["cg1", "cg2", "cg3"]);
    }

    #[test]
    fn test_read_empty_manifest() {
        assert!(matches!(
            read_manifest(Cursor::new("# nothing\n")),
            Err(StoreError::Manifest(_))
        ));
    }

    #[test]
    fn test_platform_manifest_lookup() {
        let manifest = PlatformManifest::new()
            .with_probes(Platform::Hm450, vec!["cg1".into(), "cg2".into()]);
        assert_eq!(manifest.probes(Platform::Hm450).unwrap().len(), 2);
        assert!(manifest.probes(Platform::Epic).is_none());
        assert_eq!(manifest.platforms(), vec![Platform::Hm450]);
    }

    #[test]
    fn test_platform_manifest_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, ILLUMINA_MANIFEST.as_bytes()).unwrap();

        let mut manifest = PlatformManifest::new();
        let n = manifest.load(Platform::Hm450, file.path()).unwrap();
        assert_eq!(n, 3);
        assert_eq!(manifest.probes(Platform::Hm450).unwrap()[0], "cg00035864");
    }
}
