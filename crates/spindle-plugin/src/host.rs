//! Plugin setup.
//!
//! Each build runs every plugin's setup callback against its own
//! [`PluginBuild`]. Registration problems are reported into the build's
//! diagnostics instead of aborting setup, so one misconfigured plugin
//! surfaces every mistake at once and the build fails afterwards at the
//! usual error gate.

use spindle_common::Diagnostics;
use std::future::Future;
use std::sync::Arc;

use crate::filter::{FilterCache, FilterError};
use crate::loader::{LoaderArgs, LoaderCallback, LoaderOptions, LoaderOutput, LoaderPlugin};

/// Registration surface handed to a plugin's setup callback.
pub struct PluginBuild<'a> {
    log: &'a Diagnostics,
    cache: &'a FilterCache,
    name: Option<Arc<str>>,
    loaders: Vec<LoaderPlugin>,
}

impl<'a> PluginBuild<'a> {
    fn new(log: &'a Diagnostics, cache: &'a FilterCache) -> Self {
        Self {
            log,
            cache,
            name: None,
            loaders: Vec::new(),
        }
    }

    /// Name the plugin. Must happen once, before any loader is added.
    pub fn set_name(&mut self, name: &str) {
        if name.is_empty() {
            self.log.add_error("Name of plugin cannot be empty");
            return;
        }
        if self.name.is_some() {
            self.log.add_error("Name of plugin cannot be set multiple times");
            return;
        }
        self.name = Some(Arc::from(name));
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Register an async loader callback for paths matching `options.filter`.
    pub fn add_loader<F, Fut>(&mut self, options: LoaderOptions, callback: F)
    where
        F: Fn(LoaderArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<LoaderOutput>> + Send + 'static,
    {
        self.add_loader_with(options, Arc::new(callback));
    }

    /// Register an already type-erased loader callback.
    pub fn add_loader_with(&mut self, options: LoaderOptions, callback: Arc<dyn LoaderCallback>) {
        let Some(name) = self.name.clone() else {
            self.log.add_error("Set the plugin name before adding a loader");
            return;
        };

        let filter = match self.cache.lookup_or_compile(&options.filter) {
            Ok(filter) => filter,
            Err(FilterError::Empty) => {
                self.log.add_error(format!("[{name}] Loader is missing a filter"));
                return;
            }
            Err(FilterError::Invalid { pattern, source }) => {
                tracing::debug!(plugin = %name, %source, "rejected loader filter");
                self.log.add_error(format!(
                    "[{name}] Loader filter is not a valid regular expression: {pattern:?}"
                ));
                return;
            }
        };

        self.loaders.push(LoaderPlugin::new(
            name,
            filter,
            options.match_internal,
            callback,
        ));
    }
}

type SetupFn = dyn Fn(&mut PluginBuild<'_>) + Send + Sync;

/// A plugin: a setup callback run once per build.
#[derive(Clone)]
pub struct Plugin {
    setup: Arc<SetupFn>,
}

impl Plugin {
    pub fn new<F>(setup: F) -> Self
    where
        F: Fn(&mut PluginBuild<'_>) + Send + Sync + 'static,
    {
        Self {
            setup: Arc::new(setup),
        }
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin").finish_non_exhaustive()
    }
}

/// Run every plugin's setup and collect the registered loaders.
///
/// The result is flat and ordered: plugins in the order given, and each
/// plugin's loaders in the order it registered them. Loaders of a plugin
/// that never named itself are dropped with an error.
pub fn load_plugins(
    plugins: &[Plugin],
    log: &Diagnostics,
    cache: &FilterCache,
) -> Vec<LoaderPlugin> {
    let mut loaders = Vec::new();
    for plugin in plugins {
        let mut build = PluginBuild::new(log, cache);
        (plugin.setup)(&mut build);
        tracing::debug!(
            plugin = build.name().unwrap_or("<unnamed>"),
            loaders = build.loaders.len(),
            "plugin setup finished"
        );
        loaders.append(&mut build.loaders);
    }
    loaders
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_common::Loader;

    fn echo(_args: LoaderArgs) -> impl Future<Output = anyhow::Result<LoaderOutput>> {
        async { Ok(LoaderOutput::new("", Loader::Js)) }
    }

    fn texts(log: &Diagnostics) -> Vec<String> {
        log.snapshot()
            .into_iter()
            .map(|d| d.message.text)
            .collect()
    }

    #[test]
    fn empty_name_is_rejected() {
        let log = Diagnostics::new();
        let plugin = Plugin::new(|build| build.set_name(""));
        assert!(load_plugins(&[plugin], &log, &FilterCache::new()).is_empty());
        assert_eq!(texts(&log), ["Name of plugin cannot be empty"]);
    }

    #[test]
    fn loader_before_name_is_dropped() {
        let log = Diagnostics::new();
        let plugin = Plugin::new(|build| {
            build.add_loader(LoaderOptions::new(r"\.js$"), echo);
            build.set_name("late");
        });
        assert!(load_plugins(&[plugin], &log, &FilterCache::new()).is_empty());
        assert_eq!(texts(&log), ["Set the plugin name before adding a loader"]);
    }

    #[test]
    fn filter_errors_are_prefixed_with_plugin_name() {
        let log = Diagnostics::new();
        let plugin = Plugin::new(|build| {
            build.set_name("svg");
            build.add_loader(LoaderOptions::new(""), echo);
            build.add_loader(LoaderOptions::new("(unclosed"), echo);
            build.add_loader(LoaderOptions::new(r"\.svg$"), echo);
        });

        let loaders = load_plugins(&[plugin], &log, &FilterCache::new());
        assert_eq!(loaders.len(), 1);
        assert_eq!(
            texts(&log),
            [
                "[svg] Loader is missing a filter",
                "[svg] Loader filter is not a valid regular expression: \"(unclosed\"",
            ]
        );
    }

    #[test]
    fn loaders_keep_registration_order_across_plugins() {
        let log = Diagnostics::new();
        let first = Plugin::new(|build| {
            build.set_name("first");
            build.add_loader(LoaderOptions::new("a"), echo);
            build.add_loader(LoaderOptions::new("b").match_internal(true), echo);
        });
        let second = Plugin::new(|build| {
            build.set_name("second");
            build.add_loader(LoaderOptions::new("c"), echo);
        });

        let loaders = load_plugins(&[first, second], &log, &FilterCache::new());
        let order: Vec<_> = loaders
            .iter()
            .map(|l| (l.name(), l.filter().as_str(), l.match_internal()))
            .collect();
        assert_eq!(
            order,
            [
                ("first", "a", false),
                ("first", "b", true),
                ("second", "c", false)
            ]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn each_build_gets_fresh_registration_state() {
        let log = Diagnostics::new();
        let plugin = Plugin::new(|build| {
            build.set_name("reused");
            build.add_loader(LoaderOptions::new("x"), echo);
        });
        let cache = FilterCache::new();

        load_plugins(std::slice::from_ref(&plugin), &log, &cache);
        let again = load_plugins(&[plugin], &log, &cache);

        assert_eq!(again.len(), 1);
        assert!(log.is_empty());
        assert_eq!(cache.compile_count(), 1);
    }
}
