//! Output: typed frames, CSV/Parquet writers, provenance sidecar.

pub mod frame;
pub mod writer;

pub use frame::{garch_frame, index_frame};
pub use writer::{meta_path, write_csv, write_meta, write_parquet, OutputError, OutputMeta};
