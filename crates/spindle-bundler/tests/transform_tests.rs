//! Integration tests for the transform entry point.

mod helpers;

use helpers::{CannedToolchain, PassthroughToolchain, error_texts};
use spindle_bundler::{Loader, OutputUnit, SourceMap, TransformOptions, transform};

#[tokio::test]
async fn plain_javascript_passes_through() {
    let toolchain = PassthroughToolchain::new();

    let result = transform("let x=1+2", TransformOptions::new(Loader::Js), &toolchain).await;

    assert!(result.errors.is_empty());
    assert!(result.code.contains("let x=1+2"));
    assert!(result.source_map.is_none());
}

#[tokio::test]
async fn whitespace_minification_reaches_the_compiler() {
    let toolchain = PassthroughToolchain::new();
    let mut options = TransformOptions::new(Loader::Js);
    options.minify_whitespace = true;

    let result = transform("let  x =\n  1;\n", options, &toolchain).await;

    assert!(result.errors.is_empty());
    assert_eq!(result.code, "let x = 1;");
}

#[tokio::test]
async fn external_source_map_is_returned_separately() {
    let toolchain = PassthroughToolchain::new();

    let result = transform(
        "a();",
        TransformOptions::new(Loader::Js)
            .sourcemap(SourceMap::External)
            .sourcefile("input.js"),
        &toolchain,
    )
    .await;

    assert!(result.errors.is_empty());
    assert_eq!(result.code, "a();");
    let map: serde_json::Value =
        serde_json::from_str(result.source_map.as_deref().unwrap()).unwrap();
    assert_eq!(map["sources"][0], "input.js");
}

#[tokio::test]
async fn inline_source_map_stays_in_the_code() {
    let toolchain = PassthroughToolchain::new();

    let result = transform(
        "a();",
        TransformOptions::new(Loader::Js).sourcemap(SourceMap::Inline),
        &toolchain,
    )
    .await;

    assert!(result.errors.is_empty());
    assert!(result.code.contains("sourceMappingURL=data:"));
    assert!(result.source_map.is_none());
}

#[tokio::test]
async fn linked_source_map_is_rejected_before_scanning() {
    let toolchain = PassthroughToolchain::new();

    let result = transform(
        "a();",
        TransformOptions::new(Loader::Js).sourcemap(SourceMap::Linked),
        &toolchain,
    )
    .await;

    assert_eq!(
        error_texts(&result.errors),
        ["Cannot transform with linked source maps"]
    );
    assert!(result.code.is_empty());
    assert_eq!(toolchain.scan_count(), 0);
}

#[tokio::test]
async fn transform_never_sees_the_real_filesystem() {
    let toolchain = PassthroughToolchain::new();

    let result = transform(
        "import './Cargo.toml'\n",
        TransformOptions::new(Loader::Js),
        &toolchain,
    )
    .await;

    assert_eq!(error_texts(&result.errors), ["File not found: /Cargo.toml"]);
    assert!(result.code.is_empty());
    assert_eq!(toolchain.compile_count(), 0);
}

#[tokio::test]
async fn unpairable_output_is_an_internal_error() {
    let toolchain = CannedToolchain::new(vec![
        OutputUnit::new("a.js", "a"),
        OutputUnit::new("b.js", "b"),
    ]);

    let result = transform("a", TransformOptions::new(Loader::Js), &toolchain).await;

    assert_eq!(
        error_texts(&result.errors),
        ["Internal error: unexpected compiler output (2 files)"]
    );
    assert!(result.code.is_empty());
}

#[tokio::test]
async fn empty_output_without_errors_is_an_internal_error() {
    let toolchain = CannedToolchain::default();

    let result = transform("a", TransformOptions::new(Loader::Js), &toolchain).await;

    assert_eq!(
        error_texts(&result.errors),
        ["Internal error: unexpected compiler output (0 files)"]
    );
}
