pub use crate::annotation::{
    PlatformManifest,
    ProbeCatalog,
};
pub use crate::data_structs::{
    BetaSlice,
    CellType,
    Platform,
    Sentinel,
    UnknownProbePolicy,
};
pub use crate::error::{
    StoreError,
    StoreResult,
};
pub use crate::io::matrix::{
    AllocateOptions,
    FillSummary,
    StoreHandle,
};
