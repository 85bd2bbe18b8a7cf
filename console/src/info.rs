use std::path::PathBuf;

use clap::Args;
use methstore::prelude::*;
use methstore::utils::n_threads;
use serde::Serialize;

use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct InfoArgs {
    #[arg(required = true, help = "Path of an allocated store")]
    store: PathBuf,

    #[arg(long, default_value_t = false, help = "Print as JSON")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct StoreInfo {
    path:         String,
    store_name:   String,
    probes:       usize,
    samples:      usize,
    cell_type:    CellType,
    sentinel:     Sentinel,
    expected_len: u64,
    status:       String,
    threads:      usize,
}

impl StoreInfo {
    fn collect(store: &StoreHandle) -> Self {
        let status = match store.verify() {
            Ok(()) => "ok".to_string(),
            Err(e) => e.to_string(),
        };
        Self {
            path: store.path().display().to_string(),
            store_name: store.catalog().store().to_string(),
            probes: store.n_probes(),
            samples: store.n_samples(),
            cell_type: store.cell_type(),
            sentinel: store.sentinel(),
            expected_len: store.expected_len(),
            status,
            threads: n_threads(),
        }
    }
}

impl InfoArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let store = StoreHandle::open(&self.store)?;
        let info = StoreInfo::collect(&store);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }

        println!("Store:     {} (catalog of {})", info.path, info.store_name);
        println!("Probes:    {}", info.probes);
        println!("Samples:   {}", info.samples);
        println!("Cell type: {} ({} bytes)", info.cell_type, store.cell_byte_width());
        println!("Sentinel:  {}", info.sentinel);
        println!("Size:      {} bytes", info.expected_len);
        println!("Threads:   {}", info.threads);
        println!("Status:    {}", console::style(&info.status).bold());
        Ok(())
    }
}
