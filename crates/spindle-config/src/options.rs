//! Canonical options.
//!
//! [`Options`] is the single validated configuration the resolver, scanner
//! and compiler receive. It is produced by normalization and never mutated
//! afterwards.

use rustc_hash::{FxHashMap, FxHashSet};
use spindle_common::{Loader, LogOptions};
use spindle_plugin::LoaderPlugin;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{Format, Platform, SourceMap, StrictOptions};
use crate::compat::Feature;
use crate::define::ProcessedDefines;

/// Module format of the emitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Keep whatever module syntax the input uses
    #[default]
    Preserve,
    Iife,
    CommonJs,
    EsModule,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Default => OutputFormat::Preserve,
            Format::Iife => OutputFormat::Iife,
            Format::Cjs => OutputFormat::CommonJs,
            Format::Esm => OutputFormat::EsModule,
        }
    }
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Preserve => Format::Default,
            OutputFormat::Iife => Format::Iife,
            OutputFormat::CommonJs => Format::Cjs,
            OutputFormat::EsModule => Format::Esm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceMapMode {
    #[default]
    None,
    LinkedWithComment,
    Inline,
    ExternalWithoutComment,
}

impl SourceMapMode {
    /// Whether the map is written to its own file next to the output
    pub fn needs_output_path(&self) -> bool {
        matches!(
            self,
            SourceMapMode::LinkedWithComment | SourceMapMode::ExternalWithoutComment
        )
    }
}

impl From<SourceMap> for SourceMapMode {
    fn from(mode: SourceMap) -> Self {
        match mode {
            SourceMap::None => SourceMapMode::None,
            SourceMap::Linked => SourceMapMode::LinkedWithComment,
            SourceMap::Inline => SourceMapMode::Inline,
            SourceMap::External => SourceMapMode::ExternalWithoutComment,
        }
    }
}

impl From<SourceMapMode> for SourceMap {
    fn from(mode: SourceMapMode) -> Self {
        match mode {
            SourceMapMode::None => SourceMap::None,
            SourceMapMode::LinkedWithComment => SourceMap::Linked,
            SourceMapMode::Inline => SourceMap::Inline,
            SourceMapMode::ExternalWithoutComment => SourceMap::External,
        }
    }
}

/// Where compiled output goes. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    /// A single output file at this absolute path
    File(PathBuf),
    /// One file per output inside `Options::abs_output_dir`
    Directory,
    /// Returned in memory only
    #[default]
    Stdout,
}

impl Destination {
    pub fn is_stdout(&self) -> bool {
        matches!(self, Destination::Stdout)
    }
}

/// Imports left unresolved in the output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalModules {
    /// Bare package specifiers such as `react` or `@scope/pkg`
    pub node_modules: FxHashSet<String>,
    pub abs_paths: FxHashSet<PathBuf>,
}

impl ExternalModules {
    pub fn is_empty(&self) -> bool {
        self.node_modules.is_empty() && self.abs_paths.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsxOptions {
    /// Dot-separated factory path; empty for the compiler's default
    pub factory: Vec<String>,
    pub fragment: Vec<String>,
}

/// The in-memory entry unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdinInfo {
    pub loader: Loader,
    pub contents: String,
    pub source_file: String,
    pub abs_resolve_dir: Option<PathBuf>,
}

/// Validated configuration handed to every collaborator.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub unsupported_features: Feature,
    pub strict: StrictOptions,
    pub jsx: JsxOptions,
    /// `None` when there is nothing to substitute
    pub defines: Option<Arc<ProcessedDefines>>,
    pub platform: Platform,
    pub source_map: SourceMapMode,

    pub mangle_syntax: bool,
    pub remove_whitespace: bool,
    pub minify_identifiers: bool,
    /// Global name assigned by IIFE output
    pub module_name: String,

    pub is_bundling: bool,
    pub code_splitting: bool,
    pub output_format: OutputFormat,
    pub destination: Destination,
    /// Base directory for outputs; the working directory when writing to stdout
    pub abs_output_dir: Option<PathBuf>,
    pub abs_metadata_file: Option<PathBuf>,

    pub extension_to_loader: FxHashMap<String, Loader>,
    pub extension_order: Vec<String>,
    pub external_modules: ExternalModules,
    pub stdin: Option<StdinInfo>,
    /// Flat and ordered; the first matching registration wins
    pub loader_plugins: Vec<LoaderPlugin>,

    pub log: LogOptions,
}

impl Options {
    pub fn abs_output_file(&self) -> Option<&PathBuf> {
        match &self.destination {
            Destination::File(path) => Some(path),
            _ => None,
        }
    }

    pub fn write_to_stdout(&self) -> bool {
        self.destination.is_stdout()
    }
}
