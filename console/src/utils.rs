use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
};
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    Context,
};
use clap::Args;
use glob::glob;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;
use methstore::utils::NUM_THREADS_ENV;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)."
    )]
    verbose: u8,

    #[arg(
        short = 't',
        long = "threads",
        global = true,
        help = "Number of threads used for parallel column reads."
    )]
    threads: Option<usize>,

    #[arg(
        long,
        default_value_t = false,
        global = true,
        help = "Do not display progress bars."
    )]
    pub progress_off: bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        if let Some(threads) = self.threads {
            std::env::set_var(NUM_THREADS_ENV, threads.to_string());
        }

        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let mut builder = pretty_env_logger::formatted_builder();
        builder.filter_level(level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        builder
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logger: {}", e))
    }
}

pub(crate) fn init_progress(
    total: usize,
    hidden: bool,
) -> anyhow::Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}, ETA: {eta}] [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub(crate) fn expand_wildcards(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut expanded_paths = Vec::new();

    for path in paths {
        if path.contains('*') || path.contains('?') {
            let matches = glob(path)
                .with_context(|| format!("Invalid wildcard pattern '{}'", path))?;
            for entry in matches.filter_map(Result::ok) {
                expanded_paths.push(entry);
            }
        }
        else {
            expanded_paths.push(PathBuf::from(path));
        }
    }

    Ok(expanded_paths)
}

pub(crate) fn validate_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(anyhow!("Path {} does not exist", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("Path {} is not a file", path.display()));
    }
    Ok(())
}

/// Reads one identifier per line, skipping blank lines and `#` comments.
pub(crate) fn read_id_list(path: &Path) -> anyhow::Result<Vec<String>> {
    validate_input(path)?;
    let reader = BufReader::new(File::open(path)?);
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let id = line.trim();
        if id.is_empty() || id.starts_with('#') {
            continue;
        }
        ids.push(id.to_string());
    }
    Ok(ids)
}
