mod common;

use std::fs::{
    self,
    OpenOptions,
};

use common::{
    small_store,
    DemoStoreBuilder,
    StoreDir,
};
use methstore::io::matrix::catalog_path;
use methstore::prelude::*;
use rstest::{
    fixture,
    rstest,
};

#[fixture]
fn store_dir() -> StoreDir {
    StoreDir::new()
}

#[rstest]
#[case::f64_nan(CellType::Float64, Sentinel::NaN)]
#[case::f32_zero(CellType::Float32, Sentinel::Zero)]
fn reopen_equivalence(
    store_dir: StoreDir,
    #[case] cell_type: CellType,
    #[case] sentinel: Sentinel,
) -> anyhow::Result<()> {
    let mut builder = DemoStoreBuilder::new(400, 5, Some(1234));
    let store = builder.allocate(
        &store_dir.store_path(),
        AllocateOptions::default()
            .with_cell_type(cell_type)
            .with_sentinel(sentinel),
    )?;
    // Leave the last sample unfilled.
    for sample in builder.samples().iter().take(4) {
        let values = builder.beta_values();
        store.fill(sample, &values)?;
    }

    let samples = ["GSM1004", "GSM1000", "GSM1002"];
    let probes = builder
        .probes()
        .into_iter()
        .rev()
        .step_by(3)
        .collect::<Vec<_>>();
    let original = store.slice(&samples, &probes)?;

    let reopened = StoreHandle::open(store_dir.store_path())?;
    assert_eq!(reopened.catalog(), store.catalog());
    assert_eq!(reopened.cell_type(), cell_type);
    assert_eq!(reopened.sentinel(), sentinel);

    let again = reopened.slice(&samples, &probes)?;
    assert_eq!(again.probes(), original.probes());
    assert_eq!(again.samples(), original.samples());
    // NaN sentinels compare unequal, so compare bit patterns.
    let bits = |slice: &BetaSlice| slice.values().mapv(f64::to_bits);
    assert_eq!(bits(&again), bits(&original));
    Ok(())
}

#[rstest]
fn missing_catalog(store_dir: StoreDir) {
    let result = StoreHandle::open(store_dir.store_path());
    assert!(matches!(result, Err(StoreError::CatalogNotFound(_))));

    let store = small_store(&store_dir, AllocateOptions::default());
    fs::remove_file(store.catalog_path()).unwrap();
    let result = StoreHandle::open(store.path());
    assert!(matches!(result, Err(StoreError::CatalogNotFound(_))));
}

#[rstest]
#[case::garbage(b"definitely not a catalog".to_vec())]
#[case::empty(Vec::new())]
fn corrupt_catalog(
    store_dir: StoreDir,
    #[case] contents: Vec<u8>,
) {
    let store = small_store(&store_dir, AllocateOptions::default());
    fs::write(catalog_path(store.path()), contents).unwrap();
    let result = StoreHandle::open(store.path());
    assert!(matches!(result, Err(StoreError::CatalogCorrupt { .. })));
}

#[rstest]
fn truncated_catalog(store_dir: StoreDir) {
    let store = small_store(&store_dir, AllocateOptions::default());
    let bytes = fs::read(store.catalog_path()).unwrap();
    fs::write(store.catalog_path(), &bytes[..bytes.len() - 3]).unwrap();
    let result = StoreHandle::open(store.path());
    assert!(matches!(result, Err(StoreError::CatalogCorrupt { .. })));
}

#[rstest]
fn catalog_with_trailing_bytes(store_dir: StoreDir) -> anyhow::Result<()> {
    let store = small_store(&store_dir, AllocateOptions::default());
    let mut bytes = fs::read(store.catalog_path())?;
    bytes.extend_from_slice(b"GARBAGE GARBAGE");
    fs::write(store.catalog_path(), bytes)?;

    let result = StoreHandle::open(store.path());
    assert!(matches!(result, Err(StoreError::CatalogCorrupt { .. })));
    Ok(())
}

#[rstest]
fn reopened_catalog_keeps_identifier_order(store_dir: StoreDir) -> anyhow::Result<()> {
    let store = StoreHandle::allocate(
        store_dir.store_path(),
        ["cg3", "cg1", "cg2"],
        ["s2", "s1"],
        AllocateOptions::default(),
    )?;
    let reopened = StoreHandle::open(store.path())?;
    assert_eq!(reopened.catalog(), store.catalog());
    assert!(reopened
        .probes()
        .iter()
        .map(String::as_str)
        .eq(["cg3", "cg1", "cg2"]));
    assert!(reopened.samples().iter().map(String::as_str).eq(["s2", "s1"]));
    assert_eq!(reopened.catalog().store(), "betas.bin");
    Ok(())
}

#[rstest]
fn truncated_store_fails_lazily(store_dir: StoreDir) -> anyhow::Result<()> {
    let store = small_store(&store_dir, AllocateOptions::default());
    store.fill("s1", [("cg1", 0.1), ("cg2", 0.2), ("cg3", 0.3)])?;
    store.fill("s2", [("cg1", 0.4), ("cg2", 0.5), ("cg3", 0.6)])?;

    // Cut the file in the middle of column s2 (byte 24..48).
    OpenOptions::new()
        .write(true)
        .open(store.path())?
        .set_len(32)?;

    let reopened = StoreHandle::open(store.path())?;
    assert!(matches!(reopened.verify(), Err(StoreError::Truncated { offset: 32, .. })));

    let ok = reopened.slice(&["s1", "s2"], &["cg1"])?;
    assert_eq!(ok.values()[[0, 0]], 0.1);
    assert_eq!(ok.values()[[0, 1]], 0.4);

    let err = reopened.slice(&["s2"], &["cg3"]);
    assert!(matches!(err, Err(StoreError::Truncated { offset: 40, .. })));

    // Fills refuse to grow a short file.
    let err = reopened.fill("s2", [("cg1", 0.9)]);
    assert!(matches!(err, Err(StoreError::Truncated { .. })));
    assert_eq!(fs::metadata(store.path())?.len(), 32);
    Ok(())
}

#[rstest]
fn oversized_store_detected_by_verify(store_dir: StoreDir) -> anyhow::Result<()> {
    let store = small_store(&store_dir, AllocateOptions::default());
    OpenOptions::new()
        .write(true)
        .open(store.path())?
        .set_len(64)?;
    assert!(matches!(
        store.verify(),
        Err(StoreError::SizeMismatch {
            expected: 48,
            actual: 64,
            ..
        })
    ));
    Ok(())
}
