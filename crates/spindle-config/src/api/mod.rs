//! Public option surface.
//!
//! These structs are what a host program fills in, either through the
//! builder methods or by deserializing JSON with `from_value`. They are raw:
//! nothing here is checked until the options pass through
//! [`normalize_build_options`](crate::normalize_build_options) or
//! [`normalize_transform_options`](crate::normalize_transform_options).

mod types;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spindle_common::{Loader, LogLevel, LogOptions, StderrColor};
use spindle_plugin::{FilterCache, Plugin};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ConfigError, Result as ConfigResult};

pub use types::{Engine, EngineName, Format, Platform, SourceMap, StrictOptions, Target};

/// In-memory entry point for builds that read from standard input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StdinOptions {
    pub contents: String,
    pub loader: Loader,
    /// Name used for the unit in messages and source maps
    pub sourcefile: String,
    /// Directory relative imports resolve from
    pub resolve_dir: Option<PathBuf>,
}

impl StdinOptions {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            ..Default::default()
        }
    }

    pub fn loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    pub fn sourcefile(mut self, name: impl Into<String>) -> Self {
        self.sourcefile = name.into();
        self
    }

    pub fn resolve_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resolve_dir = Some(dir.into());
        self
    }
}

/// Options for one build call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    pub color: StderrColor,
    /// Maximum number of errors reported through tracing; 0 means unlimited
    pub error_limit: usize,
    pub log_level: LogLevel,

    pub sourcemap: SourceMap,
    pub target: Target,
    pub engines: Vec<Engine>,
    pub strict: StrictOptions,

    pub minify_whitespace: bool,
    pub minify_identifiers: bool,
    pub minify_syntax: bool,

    pub jsx_factory: String,
    pub jsx_fragment: String,
    /// Dot-path to substituted value, in declaration order
    pub defines: IndexMap<String, String>,
    pub pure_functions: Vec<String>,

    /// Variable name an IIFE bundle assigns its exports to
    pub global_name: String,
    pub bundle: bool,
    pub splitting: bool,
    pub outfile: Option<PathBuf>,
    pub metafile: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub platform: Platform,
    pub format: Format,
    pub externals: Vec<String>,
    /// Extension to loader overrides, layered on the built-in table
    pub loaders: IndexMap<String, Loader>,
    /// Resolution order; `None` selects the built-in order
    pub resolve_extensions: Option<Vec<String>>,

    pub entry_points: Vec<PathBuf>,
    pub stdin: Option<StdinOptions>,

    #[serde(skip)]
    pub plugins: Vec<Plugin>,
    /// Filter cache for plugin registration; the process-wide cache when unset
    #[serde(skip)]
    pub filter_cache: Option<Arc<FilterCache>>,
}

impl BuildOptions {
    /// Build options for a single entry point.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self::new_multiple([entry])
    }

    pub fn new_multiple<P, I>(entries: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = P>,
    {
        Self {
            entry_points: entries.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Build options with only an in-memory entry point.
    pub fn from_stdin(stdin: StdinOptions) -> Self {
        Self {
            stdin: Some(stdin),
            ..Default::default()
        }
    }

    /// Create from serde_json::Value (for options passed in from a host API)
    ///
    /// # Example
    ///
    /// ```
    /// use spindle_config::{BuildOptions, Format};
    /// use serde_json::json;
    ///
    /// let options = BuildOptions::from_value(json!({
    ///     "entryPoints": ["src/app.ts"],
    ///     "bundle": true,
    ///     "format": "esm",
    ///     "defines": { "DEBUG": "false" }
    /// }))
    /// .unwrap();
    ///
    /// assert!(options.bundle);
    /// assert_eq!(options.format, Format::Esm);
    /// assert_eq!(options.defines["DEBUG"], "false");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ConfigError::invalid("build options", e.to_string()))
    }

    /// Convert to serde_json::Value; plugins are not serialized
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(ConfigError::Serialize)
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level,
            error_limit: self.error_limit,
            color: self.color,
        }
    }

    pub fn bundle(mut self, enabled: bool) -> Self {
        self.bundle = enabled;
        self
    }

    pub fn splitting(mut self, enabled: bool) -> Self {
        self.splitting = enabled;
        self
    }

    pub fn outfile(mut self, file: impl Into<PathBuf>) -> Self {
        self.outfile = Some(file.into());
        self
    }

    pub fn outdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outdir = Some(dir.into());
        self
    }

    pub fn metafile(mut self, file: impl Into<PathBuf>) -> Self {
        self.metafile = Some(file.into());
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn sourcemap(mut self, mode: SourceMap) -> Self {
        self.sourcemap = mode;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn engine(mut self, name: EngineName, version: impl Into<String>) -> Self {
        self.engines.push(Engine::new(name, version));
        self
    }

    /// Enable all three minification passes.
    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify_whitespace = enabled;
        self.minify_identifiers = enabled;
        self.minify_syntax = enabled;
        self
    }

    /// Mark packages or paths as external.
    pub fn external<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            let value = module.into();
            if !self.externals.contains(&value) {
                self.externals.push(value);
            }
        }
        self
    }

    pub fn loader(mut self, extension: impl Into<String>, loader: Loader) -> Self {
        self.loaders.insert(extension.into(), loader);
        self
    }

    pub fn resolve_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn define(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defines.insert(key.into(), value.into());
        self
    }

    pub fn pure_function(mut self, path: impl Into<String>) -> Self {
        self.pure_functions.push(path.into());
        self
    }

    pub fn jsx_factory(mut self, factory: impl Into<String>) -> Self {
        self.jsx_factory = factory.into();
        self
    }

    pub fn jsx_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.jsx_fragment = fragment.into();
        self
    }

    pub fn global_name(mut self, name: impl Into<String>) -> Self {
        self.global_name = name.into();
        self
    }

    pub fn stdin(mut self, stdin: StdinOptions) -> Self {
        self.stdin = Some(stdin);
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }

    /// Add a plugin; plugins run in the order they were added.
    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Register plugin filters in a private cache instead of the process-wide one.
    pub fn filter_cache(mut self, cache: Arc<FilterCache>) -> Self {
        self.filter_cache = Some(cache);
        self
    }
}

/// Options for one transform call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    pub color: StderrColor,
    pub error_limit: usize,
    pub log_level: LogLevel,

    pub sourcemap: SourceMap,
    pub target: Target,
    pub engines: Vec<Engine>,
    pub strict: StrictOptions,

    pub minify_whitespace: bool,
    pub minify_identifiers: bool,
    pub minify_syntax: bool,

    pub jsx_factory: String,
    pub jsx_fragment: String,
    pub defines: IndexMap<String, String>,
    pub pure_functions: Vec<String>,

    /// Name of the input in messages and source maps; `<stdin>` when empty
    pub sourcefile: String,
    /// How the input is interpreted; `js` when left as `none`
    pub loader: Loader,
}

impl TransformOptions {
    pub fn new(loader: Loader) -> Self {
        Self {
            loader,
            ..Default::default()
        }
    }

    /// Create from serde_json::Value
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ConfigError::invalid("transform options", e.to_string()))
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level,
            error_limit: self.error_limit,
            color: self.color,
        }
    }

    pub fn sourcemap(mut self, mode: SourceMap) -> Self {
        self.sourcemap = mode;
        self
    }

    pub fn sourcefile(mut self, name: impl Into<String>) -> Self {
        self.sourcefile = name.into();
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn engine(mut self, name: EngineName, version: impl Into<String>) -> Self {
        self.engines.push(Engine::new(name, version));
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify_whitespace = enabled;
        self.minify_identifiers = enabled;
        self.minify_syntax = enabled;
        self
    }

    pub fn define(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defines.insert(key.into(), value.into());
        self
    }

    pub fn pure_function(mut self, path: impl Into<String>) -> Self {
        self.pure_functions.push(path.into());
        self
    }

    pub fn jsx_factory(mut self, factory: impl Into<String>) -> Self {
        self.jsx_factory = factory.into();
        self
    }

    pub fn jsx_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.jsx_fragment = fragment.into();
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}
