//! The transform entry point.
//!
//! A transform compiles one in-memory source string. It runs the same gated
//! stages as a build, but over an empty [`MemoryFileSystem`] so the toolchain
//! cannot observe the real filesystem, and it unpacks the compiler's units
//! into code plus an optional source map.

use spindle_common::{Diagnostic, Diagnostics, MemoryFileSystem, SharedFileSystem};
use spindle_config::{Options, TransformOptions, normalize_transform_options};
use std::sync::Arc;

use crate::output::TransformResult;
use crate::toolchain::{OutputUnit, Toolchain};

/// Compile `input` as a single file.
pub async fn transform<T: Toolchain>(
    input: &str,
    options: TransformOptions,
    toolchain: &T,
) -> TransformResult {
    let log = Diagnostics::new();
    let options = normalize_transform_options(&options, input, &log);

    let units = run_stages(toolchain, &log, &options).await;
    let (code, source_map) = match units {
        Some(units) => unpack(units, &log),
        None => (Vec::new(), None),
    };

    let (errors, warnings) = Diagnostic::partition(log.done(&options.log));
    TransformResult {
        errors,
        warnings,
        code: String::from_utf8_lossy(&code).into_owned(),
        source_map: source_map.map(|map| String::from_utf8_lossy(&map).into_owned()),
    }
}

async fn run_stages<T: Toolchain>(
    toolchain: &T,
    log: &Diagnostics,
    options: &Options,
) -> Option<Vec<OutputUnit>> {
    if log.has_errors() {
        return None;
    }

    let fs: SharedFileSystem = Arc::new(MemoryFileSystem::new());
    let resolver = toolchain.new_resolver(Arc::clone(&fs), log, options);
    let graph = toolchain.scan(log, fs, &resolver, &[], options).await;
    if log.has_errors() {
        return None;
    }

    let units = toolchain.compile(graph, log, options).await;
    if log.has_errors() {
        return None;
    }
    Some(units)
}

type Unpacked = (Vec<u8>, Option<Vec<u8>>);

/// Split compiler output into code and source map.
///
/// Two units are paired when one path is the other's plus `.map`. Any shape
/// that cannot be paired is reported instead of being dropped.
pub(crate) fn unpack(mut units: Vec<OutputUnit>, log: &Diagnostics) -> Unpacked {
    match units.len() {
        1 => {
            let code = units.remove(0).contents;
            return (code, None);
        }
        2 => {
            let second = units.remove(1);
            let first = units.remove(0);
            if is_map_of(&first, &second) {
                return (second.contents, Some(first.contents));
            }
            if is_map_of(&second, &first) {
                return (first.contents, Some(second.contents));
            }
            log.add_error("Internal error: unexpected compiler output (2 files)");
        }
        n => log.add_error(format!("Internal error: unexpected compiler output ({n} files)")),
    }
    (Vec::new(), None)
}

fn is_map_of(map: &OutputUnit, code: &OutputUnit) -> bool {
    let mut expected = code.abs_path.clone().into_os_string();
    expected.push(".map");
    map.abs_path.as_os_str() == expected
}
