#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use methstore::prelude::*;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use tempfile::TempDir;

/// Generates probe/sample identifiers and beta values for test stores.
pub struct DemoStoreBuilder<R: Rng> {
    n_probes:  usize,
    n_samples: usize,
    rng:       R,
}

impl DemoStoreBuilder<StdRng> {
    pub fn new(
        n_probes: usize,
        n_samples: usize,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            n_probes,
            n_samples,
            rng,
        }
    }
}

impl<R: Rng> DemoStoreBuilder<R> {
    pub fn probes(&self) -> Vec<String> {
        (0..self.n_probes)
            .map(|i| format!("cg{:08}", i * 7 + 3))
            .collect()
    }

    pub fn samples(&self) -> Vec<String> {
        (0..self.n_samples)
            .map(|i| format!("GSM{}", 1_000 + i))
            .collect()
    }

    /// Random beta values in `[0, 1)` for every probe.
    pub fn beta_values(&mut self) -> HashMap<String, f64> {
        self.probes()
            .into_iter()
            .map(|probe| (probe, self.rng.gen_range(0.0..1.0)))
            .collect()
    }

    pub fn allocate(
        &self,
        path: &Path,
        options: AllocateOptions,
    ) -> StoreResult<StoreHandle> {
        StoreHandle::allocate(path, self.probes(), self.samples(), options)
    }
}

/// Temporary directory holding a store path that does not exist yet.
pub struct StoreDir {
    dir: TempDir,
}

impl StoreDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("betas.bin")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Store of the 3 x 2 example: probes cg1..cg3, samples s1 and s2.
pub fn small_store(
    dir: &StoreDir,
    options: AllocateOptions,
) -> StoreHandle {
    StoreHandle::allocate(
        dir.store_path(),
        ["cg1", "cg2", "cg3"],
        ["s1", "s2"],
        options,
    )
    .expect("Failed to allocate store")
}

pub fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).expect("Missing store").len()
}
