//! Option normalization.
//!
//! Turns the raw public options into one canonical [`Options`] value. Every
//! problem is reported into the call's [`Diagnostics`] and validation keeps
//! going, so a single pass surfaces as many mistakes as possible. Callers
//! must check [`Diagnostics::has_errors`] before handing the result to later
//! stages.

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use spindle_common::{Diagnostics, FileSystem, Loader, default_extension_to_loader};
use spindle_plugin::{FilterCache, load_plugins};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use crate::api::{BuildOptions, Engine, Platform, Target, TransformOptions};
use crate::compat::{CompatEngine, Constraints, Feature, Version, unsupported_features};
use crate::define::{compile_defines, is_identifier_path};
use crate::options::{
    Destination, ExternalModules, JsxOptions, Options, OutputFormat, SourceMapMode, StdinInfo,
};

static VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?$").ok());

/// Resolution order used when none is configured
pub const DEFAULT_RESOLVE_EXTENSIONS: [&str; 7] =
    [".tsx", ".ts", ".jsx", ".mjs", ".cjs", ".js", ".json"];

/// Parse `major[.minor[.patch]]`.
pub fn parse_version(text: &str) -> Option<Version> {
    let captures = VERSION.as_ref()?.captures(text)?;
    captures
        .iter()
        .skip(1)
        .flatten()
        .map(|part| part.as_str().parse().ok())
        .collect()
}

/// Merge the target and engine constraints into the unsupported feature set.
pub fn validate_features(log: &Diagnostics, target: Target, engines: &[Engine]) -> Feature {
    let mut constraints = Constraints::default();

    if let Some(edition) = target.edition() {
        constraints.insert(CompatEngine::Es, vec![edition]);
    }

    for engine in engines {
        match parse_version(&engine.version) {
            Some(version) => {
                constraints.insert(engine.name.into(), version);
            }
            None => log.add_error(format!("Invalid version: {:?}", engine.version)),
        }
    }

    unsupported_features(&constraints)
}

/// Whether an import path names a package rather than a file.
pub fn is_package_path(path: &str) -> bool {
    !path.starts_with('/')
        && !path.starts_with("./")
        && !path.starts_with("../")
        && path != "."
        && path != ".."
}

/// Absolutize a user path. An empty path means "not set".
pub fn validate_path(log: &Diagnostics, fs: &dyn FileSystem, path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    let abs = fs.abs(path);
    if abs.is_none() {
        log.add_error(format!("Invalid path: {}", path.display()));
    }
    abs
}

pub fn validate_externals(
    log: &Diagnostics,
    fs: &dyn FileSystem,
    externals: &[String],
) -> ExternalModules {
    let mut result = ExternalModules::default();
    for external in externals {
        if is_package_path(external) {
            result.node_modules.insert(external.clone());
        } else if let Some(abs) = validate_path(log, fs, Path::new(external)) {
            result.abs_paths.insert(abs);
        }
    }
    result
}

/// `.x` or longer, no leading `..`, no trailing `.`
pub fn is_valid_extension(ext: &str) -> bool {
    let mut chars = ext.chars();
    chars.next() == Some('.')
        && chars.next().is_some_and(|c| c != '.')
        && !ext.ends_with('.')
}

fn check_extension(log: &Diagnostics, ext: &str) {
    if !is_valid_extension(ext) {
        log.add_error(format!("Invalid file extension: {ext:?}"));
    }
}

/// Invalid extensions are reported but still passed through.
pub fn validate_resolve_extensions(log: &Diagnostics, order: Option<&[String]>) -> Vec<String> {
    let Some(order) = order else {
        return DEFAULT_RESOLVE_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect();
    };
    for ext in order {
        check_extension(log, ext);
    }
    order.to_vec()
}

/// Layer user loaders over the built-in table.
pub fn validate_loaders(
    log: &Diagnostics,
    loaders: &IndexMap<String, Loader>,
) -> FxHashMap<String, Loader> {
    let mut result = default_extension_to_loader();
    for (ext, loader) in loaders {
        check_extension(log, ext);
        result.insert(ext.clone(), *loader);
    }
    result
}

/// Split a JSX factory or fragment path; `kind` names it in the error.
pub fn validate_jsx(log: &Diagnostics, text: &str, kind: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if !is_identifier_path(text) {
        log.add_error(format!("Invalid JSX {kind}: {text:?}"));
        return Vec::new();
    }
    text.split('.').map(str::to_string).collect()
}

/// Options shared by build and transform, before destination handling.
fn base_options(
    log: &Diagnostics,
    target: Target,
    engines: &[Engine],
    raw: CommonOptions<'_>,
) -> Options {
    Options {
        unsupported_features: validate_features(log, target, engines),
        strict: raw.strict,
        jsx: JsxOptions {
            factory: validate_jsx(log, raw.jsx_factory, "factory"),
            fragment: validate_jsx(log, raw.jsx_fragment, "fragment"),
        },
        defines: compile_defines(log, raw.defines, raw.pure_functions).map(Arc::new),
        source_map: raw.source_map,
        mangle_syntax: raw.minify_syntax,
        remove_whitespace: raw.minify_whitespace,
        minify_identifiers: raw.minify_identifiers,
        ..Default::default()
    }
}

struct CommonOptions<'a> {
    strict: crate::api::StrictOptions,
    jsx_factory: &'a str,
    jsx_fragment: &'a str,
    defines: &'a IndexMap<String, String>,
    pure_functions: &'a [String],
    source_map: SourceMapMode,
    minify_syntax: bool,
    minify_whitespace: bool,
    minify_identifiers: bool,
}

/// A normalized build: options plus absolute entry paths.
#[derive(Debug, Clone)]
pub struct NormalizedBuild {
    pub options: Options,
    pub entry_paths: Vec<PathBuf>,
}

/// Normalize build options and run plugin setup.
///
/// Plugins are loaded even when validation already failed so their
/// registration errors are reported in the same pass.
pub fn normalize_build_options(
    raw: &BuildOptions,
    fs: &dyn FileSystem,
    log: &Diagnostics,
) -> NormalizedBuild {
    let mut options = base_options(
        log,
        raw.target,
        &raw.engines,
        CommonOptions {
            strict: raw.strict,
            jsx_factory: &raw.jsx_factory,
            jsx_fragment: &raw.jsx_fragment,
            defines: &raw.defines,
            pure_functions: &raw.pure_functions,
            source_map: raw.sourcemap.into(),
            minify_syntax: raw.minify_syntax,
            minify_whitespace: raw.minify_whitespace,
            minify_identifiers: raw.minify_identifiers,
        },
    );
    options.platform = raw.platform;
    options.module_name = raw.global_name.clone();
    options.is_bundling = raw.bundle;
    options.code_splitting = raw.splitting;
    options.output_format = raw.format.into();
    options.abs_metadata_file = raw
        .metafile
        .as_deref()
        .and_then(|path| validate_path(log, fs, path));
    options.extension_to_loader = validate_loaders(log, &raw.loaders);
    options.extension_order = validate_resolve_extensions(log, raw.resolve_extensions.as_deref());
    options.external_modules = validate_externals(log, fs, &raw.externals);
    options.log = raw.log_options();

    let abs_output_file = raw
        .outfile
        .as_deref()
        .and_then(|path| validate_path(log, fs, path));
    let abs_output_dir = raw
        .outdir
        .as_deref()
        .and_then(|path| validate_path(log, fs, path));

    let entry_paths: Vec<PathBuf> = raw
        .entry_points
        .iter()
        .filter_map(|entry| validate_path(log, fs, entry))
        .collect();
    let mut entry_count = raw.entry_points.len();

    if let Some(stdin) = &raw.stdin {
        entry_count += 1;
        options.stdin = Some(StdinInfo {
            loader: match stdin.loader {
                Loader::None => Loader::Js,
                loader => loader,
            },
            contents: stdin.contents.clone(),
            source_file: stdin.sourcefile.clone(),
            abs_resolve_dir: stdin
                .resolve_dir
                .as_deref()
                .and_then(|dir| validate_path(log, fs, dir)),
        });
    }

    resolve_destination(
        log,
        fs,
        &mut options,
        entry_count,
        abs_output_file,
        abs_output_dir,
    );

    if !options.is_bundling {
        if options.output_format != OutputFormat::Preserve {
            log.add_error("Cannot use format without bundle");
        }
        if !options.external_modules.is_empty() {
            log.add_error("Cannot use external without bundle");
        }
    } else if options.output_format == OutputFormat::Preserve {
        options.output_format = match options.platform {
            Platform::Browser => OutputFormat::Iife,
            Platform::Node => OutputFormat::CommonJs,
        };
    }

    if options.code_splitting && options.output_format != OutputFormat::EsModule {
        log.add_error("Splitting currently only works with the esm format");
    }

    let cache: &FilterCache = match &raw.filter_cache {
        Some(cache) => cache,
        None => FilterCache::global(),
    };
    options.loader_plugins = load_plugins(&raw.plugins, log, cache);

    tracing::debug!(
        entries = entry_count,
        bundling = options.is_bundling,
        format = ?options.output_format,
        destination = ?options.destination,
        plugins = raw.plugins.len(),
        errors = log.error_count(),
        "normalized build options"
    );

    NormalizedBuild {
        options,
        entry_paths,
    }
}

/// Pick exactly one output destination.
///
/// The checks form one chain: only the first applicable rule fires.
fn resolve_destination(
    log: &Diagnostics,
    fs: &dyn FileSystem,
    options: &mut Options,
    entry_count: usize,
    abs_output_file: Option<PathBuf>,
    abs_output_dir: Option<PathBuf>,
) {
    match (abs_output_file, abs_output_dir) {
        (_, None) if entry_count > 1 => {
            log.add_error("Must use outdir when there are multiple input files");
        }
        (_, None) if options.code_splitting => {
            log.add_error("Must use outdir when code splitting is enabled");
        }
        (Some(_), Some(dir)) => {
            log.add_error("Cannot use both outfile and outdir");
            options.abs_output_dir = Some(dir);
        }
        (Some(file), None) => {
            options.abs_output_dir = Some(fs.dir(&file));
            options.destination = Destination::File(file);
        }
        (None, None) => {
            options.destination = Destination::Stdout;

            if options.source_map.needs_output_path() {
                log.add_error("Cannot use an external source map without an output path");
            }
            if options.abs_metadata_file.is_some() {
                log.add_error("Cannot use metafile without an output path");
            }
            if options
                .extension_to_loader
                .values()
                .any(Loader::requires_output_path)
            {
                log.add_error("Cannot use the file loader without an output path");
            }

            // Relative externals still need a base directory
            match fs.cwd() {
                Ok(cwd) => options.abs_output_dir = Some(cwd),
                Err(err) => log.add_error(err.to_string()),
            }
        }
        (None, Some(dir)) => {
            options.destination = Destination::Directory;
            options.abs_output_dir = Some(dir);
        }
    }
}

/// Normalize transform options for one in-memory input.
pub fn normalize_transform_options(
    raw: &TransformOptions,
    input: &str,
    log: &Diagnostics,
) -> Options {
    let source_file = if raw.sourcefile.is_empty() {
        "<stdin>".to_string()
    } else {
        raw.sourcefile.clone()
    };
    let loader = match raw.loader {
        Loader::None => Loader::Js,
        loader => loader,
    };

    let mut options = base_options(
        log,
        raw.target,
        &raw.engines,
        CommonOptions {
            strict: raw.strict,
            jsx_factory: &raw.jsx_factory,
            jsx_fragment: &raw.jsx_fragment,
            defines: &raw.defines,
            pure_functions: &raw.pure_functions,
            source_map: raw.sourcemap.into(),
            minify_syntax: raw.minify_syntax,
            minify_whitespace: raw.minify_whitespace,
            minify_identifiers: raw.minify_identifiers,
        },
    );
    options.destination = Destination::File(PathBuf::from(format!("{source_file}-out")));
    options.log = raw.log_options();

    if options.source_map == SourceMapMode::LinkedWithComment {
        log.add_error("Cannot transform with linked source maps");
    }
    if options.source_map != SourceMapMode::None && source_file.is_empty() {
        log.add_error("Must use sourcefile with sourcemap to set the original file name");
    }

    options.stdin = Some(StdinInfo {
        loader,
        contents: input.to_string(),
        source_file,
        abs_resolve_dir: None,
    });

    tracing::debug!(
        loader = %loader,
        source_map = ?options.source_map,
        errors = log.error_count(),
        "normalized transform options"
    );

    options
}
