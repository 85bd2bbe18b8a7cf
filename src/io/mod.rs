pub mod matrix;

pub use matrix::{
    AllocateOptions,
    FillSummary,
    IndexCatalog,
    StoreHandle,
};
