use std::path::PathBuf;

use anyhow::{
    anyhow,
    Context,
};
use clap::builder::{
    PossibleValuesParser,
    TypedValueParser,
};
use clap::Args;
use log::info;
use methstore::prelude::*;

use crate::utils::{
    read_id_list,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct AllocateArgs {
    #[arg(required = true, help = "Path of the store to create")]
    store: PathBuf,

    #[arg(
        short,
        long,
        required = true,
        help = "File listing sample identifiers, one per line"
    )]
    samples: PathBuf,

    #[arg(
        short,
        long,
        conflicts_with = "platform",
        help = "File listing probe identifiers, one per line"
    )]
    probes: Option<PathBuf>,

    #[arg(
        long,
        requires = "manifest",
        help = "Array design (27k, 450k, EPIC) to take the probe list from"
    )]
    platform: Option<Platform>,

    #[arg(
        short,
        long,
        requires = "platform",
        help = "Illumina manifest or probe list for --platform"
    )]
    manifest: Option<PathBuf>,

    #[arg(
        short = 'w',
        long,
        default_value_t = 8,
        value_parser = PossibleValuesParser::new(["4", "8"])
            .map(|s| s.parse::<usize>().unwrap_or(8)),
        help = "Bytes per cell"
    )]
    cell_width: usize,

    #[arg(long, default_value_t = Sentinel::NaN, help = "Value of never-written cells (nan, zero)")]
    sentinel: Sentinel,

    #[arg(short, long, default_value_t = false, help = "Replace an existing store")]
    force: bool,
}

impl AllocateArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let samples = read_id_list(&self.samples)?;
        info!("Read {} samples from {}", samples.len(), self.samples.display());

        let options = AllocateOptions::default()
            .with_cell_byte_width(self.cell_width)
            .with_sentinel(self.sentinel)
            .with_overwrite(self.force);

        let store = match (&self.probes, self.platform, &self.manifest) {
            (Some(probes), _, _) => {
                let probes = read_id_list(probes)?;
                StoreHandle::allocate(&self.store, probes, samples, options)?
            },
            (None, Some(platform), Some(manifest)) => {
                let mut resolver = PlatformManifest::new();
                resolver
                    .load(platform, manifest)
                    .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
                StoreHandle::allocate_for_platform(
                    &self.store,
                    platform,
                    samples,
                    &resolver,
                    options,
                )?
            },
            _ => return Err(anyhow!("Either --probes or --platform with --manifest is required")),
        };

        println!(
            "Allocated {} ({} probes x {} samples, {} bytes)",
            store.path().display(),
            store.n_probes(),
            store.n_samples(),
            store.expected_len()
        );
        Ok(())
    }
}
