use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    Context,
};
use clap::Args;
use log::{
    debug,
    info,
    warn,
};
use methstore::prelude::*;

use crate::utils::{
    expand_wildcards,
    init_progress,
    validate_input,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct FillArgs {
    #[arg(required = true, help = "Path of an allocated store")]
    store: PathBuf,

    #[arg(
        required = true,
        num_args = 1..,
        help = "Two-column `probe<TAB>value` files, one per sample (wildcards allowed)"
    )]
    files: Vec<String>,

    #[arg(
        short,
        long,
        help = "Sample identifier; only valid with a single input file. Defaults to the file stem"
    )]
    sample: Option<String>,

    #[arg(
        long,
        default_value_t = false,
        help = "Fail on probe identifiers that are not in the store"
    )]
    strict: bool,
}

impl FillArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let files = expand_wildcards(&self.files)?;
        if files.is_empty() {
            return Err(anyhow!("No input files matched {:?}", self.files));
        }
        if self.sample.is_some() && files.len() > 1 {
            return Err(anyhow!(
                "--sample can only be used with a single input file, got {}",
                files.len()
            ));
        }

        let policy = if self.strict {
            UnknownProbePolicy::Reject
        }
        else {
            UnknownProbePolicy::Ignore
        };
        let store = StoreHandle::open(&self.store)?.with_unknown_probes(policy);
        debug!("Unknown probes policy: {:?}", store.unknown_probes());

        let progress_bar = init_progress(files.len(), utils.progress_off || files.len() < 2)?;
        let mut incomplete = 0;
        for path in files.iter() {
            validate_input(path)?;
            let sample = match &self.sample {
                Some(sample) => sample.clone(),
                None => sample_from_path(path)?,
            };
            progress_bar.set_message(sample.clone());

            let values = read_values(path)?;
            debug!("Read {} values for '{}' from {}", values.len(), sample, path.display());
            let summary = store
                .fill(&sample, values)
                .with_context(|| format!("Failed to fill '{}' from {}", sample, path.display()))?;

            if !summary.is_complete() {
                incomplete += 1;
                warn!(
                    "Sample '{}': {} of {} probes received no value",
                    sample,
                    summary.missing,
                    store.n_probes()
                );
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("Done");

        info!(
            "Filled {} samples into {} ({} incomplete)",
            files.len(),
            store.path().display(),
            incomplete
        );
        Ok(())
    }
}

fn sample_from_path(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Cannot derive a sample id from {}", path.display()))
}

/// Reads `probe<TAB>value` rows. A first row whose value is not a number is
/// taken as a header; `NA` and empty values are skipped.
fn read_values(path: &Path) -> anyhow::Result<Vec<(String, f64)>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(File::open(path)?);

    let mut values = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Malformed row in {}", path.display()))?;
        let (Some(probe), Some(value)) = (record.get(0), record.get(1))
        else {
            return Err(anyhow!(
                "Row {} of {} has fewer than two columns",
                line + 1,
                path.display()
            ));
        };
        if value.is_empty() || value.eq_ignore_ascii_case("na") {
            continue;
        }
        match value.parse::<f64>() {
            Ok(value) => values.push((probe.to_string(), value)),
            Err(_) if line == 0 => continue,
            Err(e) => {
                return Err(anyhow!(
                    "Invalid value '{}' on row {} of {}: {}",
                    value,
                    line + 1,
                    path.display(),
                    e
                ))
            },
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "probe\tbeta").unwrap();
        writeln!(file, "cg1\t0.25").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "cg2\tNA").unwrap();
        writeln!(file, "cg3\t 0.75 ").unwrap();
        let values = read_values(file.path()).unwrap();
        assert_eq!(values, vec![("cg1".to_string(), 0.25), ("cg3".to_string(), 0.75)]);
    }

    #[test]
    fn test_read_values_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cg1\t0.25").unwrap();
        writeln!(file, "cg2\thigh").unwrap();
        assert!(read_values(file.path()).is_err());

        let mut short = tempfile::NamedTempFile::new().unwrap();
        writeln!(short, "cg1").unwrap();
        assert!(read_values(short.path()).is_err());
    }

    #[test]
    fn test_sample_from_path() {
        let sample = sample_from_path(Path::new("/data/GSM1234.tsv")).unwrap();
        assert_eq!(sample, "GSM1234");
    }
}
