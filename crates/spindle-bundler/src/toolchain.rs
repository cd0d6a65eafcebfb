//! The resolver, scanner and compiler seam.
//!
//! Spindle does not parse, resolve or generate code itself. A [`Toolchain`]
//! supplies those three stages; spindle validates options, runs plugin setup
//! and sequences the stages, skipping the rest of a call as soon as any stage
//! has reported an error.

use async_trait::async_trait;
use spindle_common::{Diagnostics, SharedFileSystem};
use spindle_config::Options;
use std::path::PathBuf;

/// One file produced by the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub abs_path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputUnit {
    pub fn new(abs_path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            abs_path: abs_path.into(),
            contents: contents.into(),
        }
    }
}

/// Module resolution, graph scanning and code generation.
///
/// Every stage reports problems into `log` rather than failing. Before the
/// scanner reads a file itself it looks up a registration in
/// `options.loader_plugins` with [`spindle_plugin::find_loader_plugin`] and,
/// on a match, loads the file through [`spindle_plugin::LoaderPlugin::load_into`],
/// which reports callback failures and merges callback messages into `log`.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Resolver state shared by one scan
    type Resolver: Send + Sync;
    /// Module graph handed from the scanner to the compiler
    type Graph: Send;

    fn new_resolver(
        &self,
        fs: SharedFileSystem,
        log: &Diagnostics,
        options: &Options,
    ) -> Self::Resolver;

    /// Parse the entry points (and `options.stdin`, if any) and everything
    /// they import.
    async fn scan(
        &self,
        log: &Diagnostics,
        fs: SharedFileSystem,
        resolver: &Self::Resolver,
        entry_paths: &[PathBuf],
        options: &Options,
    ) -> Self::Graph;

    async fn compile(
        &self,
        graph: Self::Graph,
        log: &Diagnostics,
        options: &Options,
    ) -> Vec<OutputUnit>;
}
