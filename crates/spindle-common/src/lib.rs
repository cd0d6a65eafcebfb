//! # spindle-common
//!
//! Foundation types shared by every stage of the spindle pipeline:
//!
//! - [`Diagnostics`]: the per-call message collector with deterministic ordering
//! - [`Loader`]: how a file's content is interpreted before compilation
//! - [`FileSystem`]: the seam through which paths are absolutized and files read

pub mod diagnostics;
pub mod fs;
pub mod loader;
pub mod report;

pub use diagnostics::{Diagnostic, Diagnostics, Location, Message, MessageKind, sort_diagnostics};
pub use fs::{FileSystem, FsError, FsResult, MemoryFileSystem, SharedFileSystem};
#[cfg(not(target_family = "wasm"))]
pub use fs::OsFileSystem;
pub use loader::{Loader, default_extension_to_loader};
pub use report::{LogLevel, LogOptions, StderrColor, format_message, report_lines};
