//! The build entry point.
//!
//! A build runs `validate -> scan -> compile -> emit`. Every arrow is a hard
//! gate: once the call's [`Diagnostics`] hold an error, the remaining stages
//! are skipped and the result carries only the messages collected so far.

use spindle_common::{Diagnostic, Diagnostics, SharedFileSystem};
use spindle_config::{BuildOptions, NormalizedBuild, Options, normalize_build_options};
use std::path::PathBuf;
use std::sync::Arc;

use crate::output::{BuildResult, OutputFile, STDOUT_PATH};
use crate::toolchain::{OutputUnit, Toolchain};

/// Build `options` against the real filesystem.
///
/// Outputs are returned in memory; writing them out is up to the caller.
///
/// # Example
///
/// ```rust,ignore
/// use spindle_bundler::{BuildOptions, build};
///
/// let result = build(
///     BuildOptions::new("src/index.ts").bundle(true).outdir("dist"),
///     &toolchain,
/// )
/// .await;
/// for file in &result.output_files {
///     println!("{}", file.path.display());
/// }
/// ```
#[cfg(not(target_family = "wasm"))]
pub async fn build<T: Toolchain>(options: BuildOptions, toolchain: &T) -> BuildResult {
    let fs: SharedFileSystem = Arc::new(spindle_common::OsFileSystem::new());
    build_with_fs(options, fs, toolchain).await
}

/// Build `options` against an explicit filesystem.
pub async fn build_with_fs<T: Toolchain>(
    options: BuildOptions,
    fs: SharedFileSystem,
    toolchain: &T,
) -> BuildResult {
    let log = Diagnostics::new();
    let NormalizedBuild {
        options,
        entry_paths,
    } = normalize_build_options(&options, fs.as_ref(), &log);

    let output_files = run_stages(toolchain, &log, fs, &entry_paths, &options).await;

    let (errors, warnings) = Diagnostic::partition(log.done(&options.log));
    BuildResult {
        errors,
        warnings,
        output_files,
    }
}

async fn run_stages<T: Toolchain>(
    toolchain: &T,
    log: &Diagnostics,
    fs: SharedFileSystem,
    entry_paths: &[PathBuf],
    options: &Options,
) -> Vec<OutputFile> {
    if log.has_errors() {
        tracing::debug!(errors = log.error_count(), "validation failed, skipping scan");
        return Vec::new();
    }

    let resolver = toolchain.new_resolver(Arc::clone(&fs), log, options);
    tracing::debug!(entries = entry_paths.len(), "scanning");
    let graph = toolchain.scan(log, fs, &resolver, entry_paths, options).await;
    if log.has_errors() {
        tracing::debug!(errors = log.error_count(), "scan failed, skipping compile");
        return Vec::new();
    }

    tracing::debug!("compiling");
    let units = toolchain.compile(graph, log, options).await;
    if log.has_errors() {
        return Vec::new();
    }

    emit(units, options)
}

/// Map compiler units to public output records.
pub(crate) fn emit(units: Vec<OutputUnit>, options: &Options) -> Vec<OutputFile> {
    let to_stdout = options.write_to_stdout();
    tracing::debug!(files = units.len(), to_stdout, "emitting");
    units
        .into_iter()
        .map(|unit| {
            let path = if to_stdout {
                PathBuf::from(STDOUT_PATH)
            } else {
                unit.abs_path
            };
            OutputFile {
                path,
                contents: unit.contents,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_config::Destination;

    #[test]
    fn stdout_outputs_use_the_sentinel_path() {
        let options = Options::default();
        let files = emit(vec![OutputUnit::new("/project/a.js", "a")], &options);
        assert_eq!(files[0].path, PathBuf::from(STDOUT_PATH));
        assert_eq!(files[0].contents, b"a");
    }

    #[test]
    fn file_outputs_keep_their_path() {
        let options = Options {
            destination: Destination::Directory,
            ..Default::default()
        };
        let files = emit(
            vec![
                OutputUnit::new("/dist/a.js", "a"),
                OutputUnit::new("/dist/a.js.map", "{}"),
            ],
            &options,
        );
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            [PathBuf::from("/dist/a.js"), PathBuf::from("/dist/a.js.map")]
        );
    }
}
