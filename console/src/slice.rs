use std::fs::File;
use std::io::{
    self,
    Write,
};
use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use log::{
    info,
    warn,
};
use methstore::prelude::*;

use crate::utils::{
    read_id_list,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct SliceArgs {
    #[arg(required = true, help = "Path of an allocated store")]
    store: PathBuf,

    #[arg(
        short,
        long = "sample",
        num_args = 1..,
        required_unless_present = "sample_list",
        help = "Sample identifiers, in output column order"
    )]
    samples: Vec<String>,

    #[arg(long, help = "File listing sample identifiers, one per line")]
    sample_list: Option<PathBuf>,

    #[arg(
        short,
        long = "probe",
        num_args = 1..,
        required_unless_present = "probe_list",
        help = "Probe identifiers, in output row order"
    )]
    probes: Vec<String>,

    #[arg(long, help = "File listing probe identifiers, one per line")]
    probe_list: Option<PathBuf>,

    #[arg(short, long, help = "Output TSV path. Defaults to stdout")]
    output: Option<PathBuf>,
}

impl SliceArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let samples = collect_ids(&self.samples, self.sample_list.as_ref())?;
        let probes = collect_ids(&self.probes, self.probe_list.as_ref())?;

        let store = StoreHandle::open(&self.store)?;
        let slice = store.slice(&samples, &probes)?;
        let (rows, cols) = slice.shape();
        if rows < probes.len() || cols < samples.len() {
            warn!(
                "Dropped {} unknown probes and {} unknown samples",
                probes.len() - rows,
                samples.len() - cols
            );
        }

        let sink: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout().lock()),
        };
        write_tsv(&slice, &store, sink)?;
        info!("Wrote {} x {} slice", rows, cols);
        Ok(())
    }
}

fn collect_ids(
    inline: &[String],
    list: Option<&PathBuf>,
) -> anyhow::Result<Vec<String>> {
    let mut ids = inline.to_vec();
    if let Some(path) = list {
        ids.extend(read_id_list(path)?);
    }
    Ok(ids)
}

/// Writes a header of sample identifiers followed by one row per probe.
/// Sentinel cells are written as `NA`.
fn write_tsv<W: Write>(
    slice: &BetaSlice,
    store: &StoreHandle,
    sink: W,
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(sink);

    writer.write_record(std::iter::once("probe").chain(slice.samples().iter().map(String::as_str)))?;
    for (probe, row) in slice.probes().iter().zip(slice.values().rows()) {
        let cells = row
            .iter()
            .map(|value| {
                if store.is_sentinel(*value) {
                    "NA".to_string()
                }
                else {
                    value.to_string()
                }
            })
            .collect_vec();
        writer.write_record(std::iter::once(probe.as_str()).chain(cells.iter().map(String::as_str)))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("betas.bin");
        let store = StoreHandle::allocate(
            &path,
            ["cg1", "cg2"],
            ["s1", "s2"],
            AllocateOptions::default(),
        )
        .unwrap();
        store.fill("s2", [("cg1", 0.5), ("cg2", 0.25)]).unwrap();

        let slice = store.slice(&["s2", "s1"], &["cg2"]).unwrap();
        let mut buffer = Vec::new();
        write_tsv(&slice, &store, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "probe\ts2\ts1\ncg2\t0.25\tNA\n");
    }
}
