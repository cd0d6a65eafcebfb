//! # spindle-bundler
//!
//! The two entry points of spindle: [`build`] and [`transform`].
//!
//! Spindle is the orchestration layer of a JavaScript bundler. It turns a
//! loosely structured set of user options into one validated [`Options`]
//! value, runs plugin setup, and sequences the resolver, scanner and compiler
//! supplied by a [`Toolchain`], stopping as soon as any stage reports an
//! error. Problems never surface as `Err`; every call returns its errors and
//! warnings alongside whatever output it produced.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spindle_bundler::{BuildOptions, Format, build};
//!
//! let result = build(
//!     BuildOptions::new("src/index.ts")
//!         .bundle(true)
//!         .format(Format::Esm)
//!         .outdir("dist"),
//!     &toolchain,
//! )
//! .await;
//!
//! for error in &result.errors {
//!     eprintln!("{}", spindle_bundler::format_message(error));
//! }
//! ```
//!
//! ## Plugins
//!
//! Plugins register loaders that claim files by a regular-expression filter
//! on their path. The toolchain's scanner consults them before reading a file.
//!
//! ```rust
//! use spindle_bundler::{BuildOptions, Loader, LoaderArgs, LoaderOptions, LoaderOutput, Plugin};
//!
//! let yaml = Plugin::new(|build| {
//!     build.set_name("yaml");
//!     build.add_loader(LoaderOptions::new(r"\.ya?ml$"), |args: LoaderArgs| async move {
//!         let text = std::fs::read_to_string(&args.path)?;
//!         Ok::<_, anyhow::Error>(LoaderOutput::new(text, Loader::Text))
//!     });
//! });
//!
//! let options = BuildOptions::new("src/index.js").bundle(true).plugin(yaml);
//! # let _ = options;
//! ```
//!
//! ## Logging
//!
//! Spindle emits `tracing` events and reports each call's messages through
//! `tracing` when the call finishes. Enable the `logging` feature for
//! `logging::init_logging`.

mod build;
#[cfg(feature = "logging")]
pub mod logging;
mod output;
mod toolchain;
mod transform;

#[cfg(not(target_family = "wasm"))]
pub use build::build;
pub use build::build_with_fs;
pub use output::{BuildResult, OutputFile, STDOUT_PATH, TransformResult};
pub use toolchain::{OutputUnit, Toolchain};
pub use transform::transform;

// Re-export the option surface so hosts need only this crate
pub use spindle_common::{
    Diagnostic, Diagnostics, FileSystem, Loader, Location, LogLevel, LogOptions, MemoryFileSystem,
    Message, SharedFileSystem, StderrColor, format_message,
};
#[cfg(not(target_family = "wasm"))]
pub use spindle_common::OsFileSystem;
pub use spindle_config::{
    BuildOptions, ConfigError, Engine, EngineName, Format, Options, Platform, SourceMap,
    StdinOptions, StrictOptions, Target, TransformOptions,
};
pub use spindle_plugin::{
    FilterCache, LoadResult, LoaderArgs, LoaderOptions, LoaderOutput, LoaderPlugin, Plugin,
    PluginBuild, find_loader_plugin,
};
