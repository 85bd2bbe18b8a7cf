//! This module contains utility functions and helper macros used throughout
//! the methstore crate.
//!
//! - The crate-wide rayon [`THREAD_POOL`], sized from the
//!   `METHSTORE_NUM_THREADS` environment variable.
//! - Macros for common struct operations (getter functions, builder-style
//!   `with_*` methods).
//! - Helpers for the sibling-file naming convention of the store.

use std::ffi::OsString;
use std::path::{
    Path,
    PathBuf,
};

use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};

/// Environment variable read once to size [`THREAD_POOL`].
pub const NUM_THREADS_ENV: &str = "METHSTORE_NUM_THREADS";

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var(NUM_THREADS_ENV)
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;

/// Appends `.{suffix}` to the full file name of `path`, keeping any
/// extension it already has (`betas.bin` -> `betas.bin.catalog`).
pub fn append_suffix<P: AsRef<Path>>(
    path: P,
    suffix: &str,
) -> PathBuf {
    let mut name: OsString = path.as_ref().as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Directory that holds `path`, falling back to the working directory for
/// bare file names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
