//! Loader tags.
//!
//! A loader tells the scanner how raw file content should be interpreted
//! before it reaches the compiler. Plugins return a loader alongside the
//! content they produce, which lets one loader re-target another (for example
//! "read YAML, emit JSON for the JSON loader").

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How file content is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    /// No loader selected; callers substitute a default
    #[default]
    None,
    Js,
    Jsx,
    Ts,
    Tsx,
    Json,
    Text,
    Base64,
    #[serde(rename = "dataurl")]
    DataUrl,
    /// Copy the raw file next to the output and export its path
    File,
    Binary,
}

impl Loader {
    /// All loaders, in declaration order.
    pub const ALL: [Loader; 11] = [
        Loader::None,
        Loader::Js,
        Loader::Jsx,
        Loader::Ts,
        Loader::Tsx,
        Loader::Json,
        Loader::Text,
        Loader::Base64,
        Loader::DataUrl,
        Loader::File,
        Loader::Binary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::None => "none",
            Loader::Js => "js",
            Loader::Jsx => "jsx",
            Loader::Ts => "ts",
            Loader::Tsx => "tsx",
            Loader::Json => "json",
            Loader::Text => "text",
            Loader::Base64 => "base64",
            Loader::DataUrl => "dataurl",
            Loader::File => "file",
            Loader::Binary => "binary",
        }
    }

    /// Whether this loader needs an output directory to copy files into.
    pub fn requires_output_path(&self) -> bool {
        matches!(self, Loader::File)
    }
}

impl std::str::FromStr for Loader {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Loader::ALL
            .iter()
            .copied()
            .find(|loader| loader.as_str() == s)
            .ok_or_else(|| format!("Invalid loader: {s:?}"))
    }
}

impl std::fmt::Display for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The built-in extension to loader table.
///
/// User-supplied loader overrides are layered on top of this map.
pub fn default_extension_to_loader() -> FxHashMap<String, Loader> {
    [
        (".js", Loader::Js),
        (".mjs", Loader::Js),
        (".cjs", Loader::Js),
        (".jsx", Loader::Jsx),
        (".ts", Loader::Ts),
        (".tsx", Loader::Tsx),
        (".json", Loader::Json),
        (".txt", Loader::Text),
    ]
    .into_iter()
    .map(|(ext, loader)| (ext.to_string(), loader))
    .collect()
}
