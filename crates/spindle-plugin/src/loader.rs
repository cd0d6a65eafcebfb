//! Loader registrations and the callback adapter.
//!
//! The scanner consults the flat, ordered list of [`LoaderPlugin`]s produced
//! by [`load_plugins`](crate::load_plugins) whenever it loads a file. For the
//! first registration whose filter matches, it calls
//! [`LoaderPlugin::load_into`], which runs the plugin author's callback,
//! decodes whatever came back into a [`LoadResult`] and merges the outcome
//! into the call's [`Diagnostics`].

use async_trait::async_trait;
use spindle_common::{Diagnostic, Diagnostics, Loader, Message, MessageKind};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::filter::Filter;

/// Registration options for one loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Regular expression matched against the absolute path
    pub filter: String,
    /// Whether synthetic files generated by the bundler may also match
    pub match_internal: bool,
}

impl LoaderOptions {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            match_internal: false,
        }
    }

    pub fn match_internal(mut self, enabled: bool) -> Self {
        self.match_internal = enabled;
        self
    }
}

/// Input handed to a loader callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderArgs {
    /// Absolute path of the file being loaded
    pub path: PathBuf,
}

/// What a loader callback returns on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOutput {
    pub contents: String,
    /// How the scanner should interpret `contents`
    pub loader: Loader,
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
}

impl LoaderOutput {
    pub fn new(contents: impl Into<String>, loader: Loader) -> Self {
        Self {
            contents: contents.into(),
            loader,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(mut self, message: Message) -> Self {
        self.errors.push(message);
        self
    }

    pub fn warning(mut self, message: Message) -> Self {
        self.warnings.push(message);
        self
    }
}

/// A plugin author's load callback.
///
/// Implemented for any `Fn(LoaderArgs) -> impl Future<Output = anyhow::Result<LoaderOutput>>`,
/// so async closures work directly.
#[async_trait]
pub trait LoaderCallback: Send + Sync {
    async fn load(&self, args: LoaderArgs) -> anyhow::Result<LoaderOutput>;
}

#[async_trait]
impl<F, Fut> LoaderCallback for F
where
    F: Fn(LoaderArgs) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<LoaderOutput>> + Send + 'static,
{
    async fn load(&self, args: LoaderArgs) -> anyhow::Result<LoaderOutput> {
        (self)(args).await
    }
}

/// Outcome of running a loader, as consumed by the scanner.
#[derive(Debug)]
pub enum LoadResult {
    /// The callback failed; the file cannot be loaded
    Failure(anyhow::Error),
    /// New content for the file
    Success {
        contents: String,
        loader: Loader,
        /// Callback diagnostics, already sorted into presentation order
        diagnostics: Vec<Diagnostic>,
    },
}

impl LoadResult {
    fn from_callback(result: anyhow::Result<LoaderOutput>) -> Self {
        match result {
            Err(error) => LoadResult::Failure(error),
            Ok(output) => {
                let mut diagnostics: Vec<Diagnostic> =
                    Diagnostic::from_messages(MessageKind::Error, output.errors)
                        .chain(Diagnostic::from_messages(
                            MessageKind::Warning,
                            output.warnings,
                        ))
                        .collect();
                spindle_common::sort_diagnostics(&mut diagnostics);
                LoadResult::Success {
                    contents: output.contents,
                    loader: output.loader,
                    diagnostics,
                }
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LoadResult::Failure(_))
    }
}

/// One installed loader: owning plugin, compiled filter and callback.
#[derive(Clone)]
pub struct LoaderPlugin {
    name: Arc<str>,
    filter: Filter,
    match_internal: bool,
    callback: Arc<dyn LoaderCallback>,
}

impl LoaderPlugin {
    pub(crate) fn new(
        name: Arc<str>,
        filter: Filter,
        match_internal: bool,
        callback: Arc<dyn LoaderCallback>,
    ) -> Self {
        Self {
            name,
            filter,
            match_internal,
            callback,
        }
    }

    /// Name of the plugin that registered this loader
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn match_internal(&self) -> bool {
        self.match_internal
    }

    /// Whether this loader applies to `path`.
    ///
    /// Internal files only match registrations that opted in.
    pub fn matches(&self, path: &Path, is_internal: bool) -> bool {
        if is_internal && !self.match_internal {
            return false;
        }
        self.filter.is_match(&path.to_string_lossy())
    }

    /// Run the callback for `path` and decode its result.
    pub async fn load(&self, path: &Path) -> LoadResult {
        tracing::trace!(plugin = %self.name, path = %path.display(), "running loader");
        let result = self
            .callback
            .load(LoaderArgs {
                path: path.to_path_buf(),
            })
            .await;
        LoadResult::from_callback(result)
    }

    /// Run the callback for `path` and merge its outcome into `log`.
    ///
    /// A failure becomes one error carrying the callback's error text. On
    /// success the callback's messages are added as one sorted batch and the
    /// new contents are returned. `None` means the file could not be loaded.
    pub async fn load_into(&self, path: &Path, log: &Diagnostics) -> Option<(String, Loader)> {
        match self.load(path).await {
            LoadResult::Failure(err) => {
                log.add_error(err.to_string());
                None
            }
            LoadResult::Success {
                contents,
                loader,
                diagnostics,
            } => {
                log.add_batch(diagnostics);
                Some((contents, loader))
            }
        }
    }
}

impl std::fmt::Debug for LoaderPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderPlugin")
            .field("name", &self.name)
            .field("filter", &self.filter.as_str())
            .field("match_internal", &self.match_internal)
            .finish_non_exhaustive()
    }
}

/// First registration, in order, that applies to `path`.
pub fn find_loader_plugin<'a>(
    plugins: &'a [LoaderPlugin],
    path: &Path,
    is_internal: bool,
) -> Option<&'a LoaderPlugin> {
    plugins
        .iter()
        .find(|plugin| plugin.matches(path, is_internal))
}
