//! # spindle-config
//!
//! The public option surface and its normalization.
//!
//! - [`BuildOptions`] / [`TransformOptions`]: what a host fills in
//! - [`normalize_build_options`] / [`normalize_transform_options`]: validate
//!   and produce the canonical [`Options`], reporting every problem into the
//!   call's diagnostics
//! - [`compile_defines`]: substitution rules as plain, evaluable data
//! - [`unsupported_features`]: the feature set implied by target and engines

pub mod api;
pub mod compat;
pub mod define;
pub mod error;
pub mod options;
pub mod validation;

pub use api::{
    BuildOptions, Engine, EngineName, Format, Platform, SourceMap, StdinOptions, StrictOptions,
    Target, TransformOptions,
};
pub use compat::{CompatEngine, Constraints, Feature, unsupported_features};
pub use define::{
    DefineData, DefineExpr, DefineLiteral, DefineValue, DotDefine, ProcessedDefines,
    compile_defines,
};
pub use error::{ConfigError, Result, parse_option};
pub use options::{
    Destination, ExternalModules, JsxOptions, Options, OutputFormat, SourceMapMode, StdinInfo,
};
pub use validation::{NormalizedBuild, normalize_build_options, normalize_transform_options};
