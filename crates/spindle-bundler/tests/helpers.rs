//! Test helpers for spindle-bundler integration tests
//!
//! Provides a passthrough toolchain that reads files through the given
//! filesystem, dispatches loader plugins, follows relative `import` lines and
//! emits each entry's text unchanged.

#![allow(dead_code)]

use async_trait::async_trait;
use regex::Regex;
use spindle_bundler::{
    BuildResult, Loader, Message, OutputUnit, SharedFileSystem, Toolchain, find_loader_plugin,
};
use spindle_bundler::{Diagnostics, Options};
use spindle_config::{Destination, SourceMapMode};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:[^'"]*\s+from\s+)?['"]([^'"]+)['"]"#).unwrap()
});

/// Marker that makes the passthrough compiler report an error
pub const COMPILE_ERROR_MARKER: &str = "@compile-error";

#[derive(Debug)]
pub struct Module {
    pub path: PathBuf,
    pub contents: String,
    pub loader: Loader,
    pub is_entry: bool,
}

#[derive(Debug, Default)]
pub struct Graph {
    pub modules: Vec<Module>,
}

pub struct Resolver {
    fs: SharedFileSystem,
}

impl Resolver {
    /// Relative specifiers only; bare ones are left to the runtime
    fn resolve(&self, importer_dir: &Path, specifier: &str) -> Option<PathBuf> {
        if !(specifier.starts_with("./") || specifier.starts_with("../")) {
            return None;
        }
        self.fs.abs(&importer_dir.join(specifier))
    }
}

/// Toolchain that counts how often each stage runs.
#[derive(Debug, Default)]
pub struct PassthroughToolchain {
    scans: AtomicUsize,
    compiles: AtomicUsize,
}

impl PassthroughToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    async fn load(
        &self,
        log: &Diagnostics,
        fs: &SharedFileSystem,
        path: &Path,
        options: &Options,
    ) -> Option<(String, Loader)> {
        if let Some(plugin) = find_loader_plugin(&options.loader_plugins, path, false) {
            return plugin.load_into(path, log).await;
        }

        match fs.read_file(path).await {
            Ok(contents) => Some((contents, loader_for(path, options))),
            Err(err) => {
                log.add_error(err.to_string());
                None
            }
        }
    }
}

fn loader_for(path: &Path, options: &Options) -> Loader {
    path.extension()
        .and_then(|ext| options.extension_to_loader.get(&format!(".{}", ext.to_string_lossy())))
        .copied()
        .unwrap_or(Loader::Js)
}

fn imports(contents: &str) -> Vec<String> {
    IMPORT
        .captures_iter(contents)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn is_script(loader: Loader) -> bool {
    matches!(
        loader,
        Loader::None | Loader::Js | Loader::Jsx | Loader::Ts | Loader::Tsx
    )
}

fn render(module: &Module) -> String {
    if is_script(module.loader) {
        module.contents.clone()
    } else {
        let literal = serde_json::to_string(&module.contents).unwrap();
        format!("export default {literal};\n")
    }
}

#[async_trait]
impl Toolchain for PassthroughToolchain {
    type Resolver = Resolver;
    type Graph = Graph;

    fn new_resolver(
        &self,
        fs: SharedFileSystem,
        _log: &Diagnostics,
        _options: &Options,
    ) -> Resolver {
        Resolver { fs }
    }

    async fn scan(
        &self,
        log: &Diagnostics,
        fs: SharedFileSystem,
        resolver: &Resolver,
        entry_paths: &[PathBuf],
        options: &Options,
    ) -> Graph {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let mut graph = Graph::default();
        let mut queue: VecDeque<(PathBuf, bool)> =
            entry_paths.iter().map(|path| (path.clone(), true)).collect();

        if let Some(stdin) = &options.stdin {
            let dir = stdin
                .abs_resolve_dir
                .clone()
                .or_else(|| fs.cwd().ok())
                .unwrap_or_default();
            for specifier in imports(&stdin.contents) {
                if let Some(path) = resolver.resolve(&dir, &specifier) {
                    queue.push_back((path, false));
                }
            }
            let name = if stdin.source_file.is_empty() {
                "<stdin>"
            } else {
                stdin.source_file.as_str()
            };
            graph.modules.push(Module {
                path: PathBuf::from(name),
                contents: stdin.contents.clone(),
                loader: stdin.loader,
                is_entry: true,
            });
        }

        let mut seen = HashSet::new();
        while let Some((path, is_entry)) = queue.pop_front() {
            if !seen.insert(path.clone())
                || options.external_modules.abs_paths.contains(&path)
            {
                continue;
            }
            let Some((contents, loader)) = self.load(log, &fs, &path, options).await else {
                continue;
            };
            if is_script(loader) {
                let dir = fs.dir(&path);
                for specifier in imports(&contents) {
                    if let Some(dep) = resolver.resolve(&dir, &specifier) {
                        queue.push_back((dep, false));
                    }
                }
            }
            graph.modules.push(Module {
                path,
                contents,
                loader,
                is_entry,
            });
        }
        graph
    }

    async fn compile(&self, graph: Graph, log: &Diagnostics, options: &Options) -> Vec<OutputUnit> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        let mut units = Vec::new();

        for entry in graph.modules.iter().filter(|m| m.is_entry) {
            if entry.contents.contains(COMPILE_ERROR_MARKER) {
                log.add_error(format!("{}: compile error", entry.path.display()));
                continue;
            }

            let mut code = String::new();
            if options.is_bundling {
                for dep in graph.modules.iter().filter(|m| !m.is_entry) {
                    code.push_str(&render(dep));
                }
            }
            code.push_str(&render(entry));
            if options.remove_whitespace {
                code = code.split_whitespace().collect::<Vec<_>>().join(" ");
            }

            let out_path = match &options.destination {
                Destination::File(path) => path.clone(),
                Destination::Directory | Destination::Stdout => {
                    let stem = entry.path.file_stem().unwrap_or_default();
                    let mut name = stem.to_os_string();
                    name.push(".js");
                    options.abs_output_dir.clone().unwrap_or_default().join(name)
                }
            };
            let mut map_path = out_path.clone().into_os_string();
            map_path.push(".map");
            let map_path = PathBuf::from(map_path);
            let map = serde_json::json!({
                "version": 3,
                "sources": [entry.path.display().to_string()],
                "mappings": "",
            })
            .to_string();

            match options.source_map {
                SourceMapMode::None => units.push(OutputUnit::new(out_path, code)),
                SourceMapMode::Inline => {
                    code.push_str(&format!(
                        "\n//# sourceMappingURL=data:application/json,{map}"
                    ));
                    units.push(OutputUnit::new(out_path, code));
                }
                SourceMapMode::LinkedWithComment => {
                    let name = map_path.file_name().unwrap_or_default().to_string_lossy();
                    code.push_str(&format!("\n//# sourceMappingURL={name}"));
                    units.push(OutputUnit::new(out_path, code));
                    units.push(OutputUnit::new(map_path, map));
                }
                SourceMapMode::ExternalWithoutComment => {
                    units.push(OutputUnit::new(out_path, code));
                    units.push(OutputUnit::new(map_path, map));
                }
            }
        }
        units
    }
}

/// Toolchain that skips scanning and returns fixed compiler output.
#[derive(Debug, Default)]
pub struct CannedToolchain {
    pub units: Vec<OutputUnit>,
}

impl CannedToolchain {
    pub fn new(units: Vec<OutputUnit>) -> Self {
        Self { units }
    }
}

#[async_trait]
impl Toolchain for CannedToolchain {
    type Resolver = ();
    type Graph = ();

    fn new_resolver(
        &self,
        _fs: SharedFileSystem,
        _log: &Diagnostics,
        _options: &Options,
    ) -> Self::Resolver {
    }

    async fn scan(
        &self,
        _log: &Diagnostics,
        _fs: SharedFileSystem,
        _resolver: &(),
        _entry_paths: &[PathBuf],
        _options: &Options,
    ) -> Self::Graph {
    }

    async fn compile(&self, _graph: (), _log: &Diagnostics, _options: &Options) -> Vec<OutputUnit> {
        self.units.clone()
    }
}

/// Error texts in order
pub fn error_texts(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.text.as_str()).collect()
}

/// Assert that a build succeeded
pub fn assert_build_success(result: &BuildResult) {
    assert!(
        result.errors.is_empty(),
        "Build should succeed but got errors: {:?}",
        error_texts(&result.errors)
    );
}

/// Output text for the file at `path`
pub fn output_text(result: &BuildResult, path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    result
        .output_files
        .iter()
        .find(|file| file.path == path)
        .unwrap_or_else(|| panic!("no output at {}", path.display()))
        .text()
        .into_owned()
}
