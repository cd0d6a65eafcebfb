use serde::{Deserialize, Serialize};

/// Implements `ALL`, `as_str`, `FromStr` and `Display` from one name table.
macro_rules! option_names {
    ($ty:ident, $label:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(format!(concat!("Invalid ", $label, ": {:?}"), s)),
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Browser environment (default)
    #[default]
    Browser,
    /// Node.js
    Node,
}

option_names!(Platform, "platform", {
    Browser => "browser",
    Node => "node",
});

/// Output module format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Keep the input's module format, or pick one from the platform when bundling
    #[default]
    Default,
    /// Self-invoking function wrapper
    Iife,
    /// CommonJS
    Cjs,
    /// ES modules
    Esm,
}

option_names!(Format, "format", {
    Default => "default",
    Iife => "iife",
    Cjs => "cjs",
    Esm => "esm",
});

/// Source map generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMap {
    #[default]
    None,
    /// Sibling `.map` file referenced by a comment
    Linked,
    /// Base64 data URL appended to the output
    Inline,
    /// Sibling `.map` file without a comment
    External,
}

option_names!(SourceMap, "source map", {
    None => "none",
    Linked => "linked",
    Inline => "inline",
    External => "external",
});

/// ECMAScript language level to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Latest syntax, no lowering
    #[default]
    EsNext,
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
}

option_names!(Target, "target", {
    EsNext => "esnext",
    Es5 => "es5",
    Es2015 => "es2015",
    Es2016 => "es2016",
    Es2017 => "es2017",
    Es2018 => "es2018",
    Es2019 => "es2019",
    Es2020 => "es2020",
});

impl Target {
    /// Edition year used as the `ES` compatibility constraint
    pub fn edition(&self) -> Option<u32> {
        match self {
            Target::EsNext => None,
            Target::Es5 => Some(5),
            Target::Es2015 => Some(2015),
            Target::Es2016 => Some(2016),
            Target::Es2017 => Some(2017),
            Target::Es2018 => Some(2018),
            Target::Es2019 => Some(2019),
            Target::Es2020 => Some(2020),
        }
    }
}

/// JavaScript engines with known feature support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineName {
    Chrome,
    Edge,
    Firefox,
    Ios,
    Node,
    Safari,
}

option_names!(EngineName, "engine", {
    Chrome => "chrome",
    Edge => "edge",
    Firefox => "firefox",
    Ios => "ios",
    Node => "node",
    Safari => "safari",
});

/// An engine and the minimum version the output must run on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub name: EngineName,
    /// `major[.minor[.patch]]`
    pub version: String,
}

impl Engine {
    pub fn new(name: EngineName, version: impl Into<String>) -> Self {
        Self {
            name,
            version: version.into(),
        }
    }
}

/// Opt into standards-exact output for features that are usually loosened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrictOptions {
    #[serde(default)]
    pub nullish_coalescing: bool,
    #[serde(default)]
    pub class_fields: bool,
}
