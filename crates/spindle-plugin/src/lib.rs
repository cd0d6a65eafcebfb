//! # spindle-plugin
//!
//! Plugin registration for spindle builds.
//!
//! A [`Plugin`] is a setup callback. For every build it is handed a fresh
//! [`PluginBuild`] on which it names itself and registers loaders. Each loader
//! pairs a path filter (compiled once per process through the [`FilterCache`])
//! with a [`LoaderCallback`] whose result is decoded into a [`LoadResult`] at
//! the boundary.
//!
//! ```no_run
//! use spindle_common::{Diagnostics, Loader};
//! use spindle_plugin::{
//!     FilterCache, LoaderArgs, LoaderOptions, LoaderOutput, Plugin, load_plugins,
//! };
//!
//! let yaml = Plugin::new(|build| {
//!     build.set_name("yaml");
//!     build.add_loader(LoaderOptions::new(r"\.ya?ml$"), |args: LoaderArgs| async move {
//!         let text = std::fs::read_to_string(&args.path)?;
//!         Ok::<_, anyhow::Error>(LoaderOutput::new(text, Loader::Json))
//!     });
//! });
//!
//! let log = Diagnostics::new();
//! let loaders = load_plugins(&[yaml], &log, FilterCache::global());
//! assert_eq!(loaders.len(), 1);
//! ```

pub mod filter;
pub mod host;
pub mod loader;

pub use filter::{Filter, FilterCache, FilterError};
pub use host::{Plugin, PluginBuild, load_plugins};
pub use loader::{
    LoadResult, LoaderArgs, LoaderCallback, LoaderOptions, LoaderOutput, LoaderPlugin,
    find_loader_plugin,
};
