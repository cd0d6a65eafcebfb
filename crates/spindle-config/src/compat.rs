//! Language feature support by target.
//!
//! A build may constrain its output by an ES edition and any number of engine
//! versions. Every constraint is checked against the table below and a
//! feature is unsupported as soon as one constraint predates it.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use crate::api::EngineName;

bitflags! {
    /// Syntax features the compiler may need to lower.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Feature: u32 {
        const ARROW = 1;
        const CLASS = 1 << 1;
        const TEMPLATE_LITERAL = 1 << 2;
        const DESTRUCTURING = 1 << 3;
        const LET_CONST = 1 << 4;
        const EXPONENT_OPERATOR = 1 << 5;
        const ASYNC_AWAIT = 1 << 6;
        const OBJECT_REST_SPREAD = 1 << 7;
        const ASYNC_GENERATOR = 1 << 8;
        const OPTIONAL_CATCH_BINDING = 1 << 9;
        const OPTIONAL_CHAIN = 1 << 10;
        const NULLISH_COALESCING = 1 << 11;
        const BIG_INT = 1 << 12;
        const IMPORT_META = 1 << 13;
        const CLASS_FIELD = 1 << 14;
    }
}

impl Default for Feature {
    fn default() -> Self {
        Feature::empty()
    }
}

/// Anything a feature version can be pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompatEngine {
    /// ECMAScript edition (5, 2015, 2016, ...)
    Es,
    Chrome,
    Edge,
    Firefox,
    Ios,
    Node,
    Safari,
}

impl From<EngineName> for CompatEngine {
    fn from(name: EngineName) -> Self {
        match name {
            EngineName::Chrome => CompatEngine::Chrome,
            EngineName::Edge => CompatEngine::Edge,
            EngineName::Firefox => CompatEngine::Firefox,
            EngineName::Ios => CompatEngine::Ios,
            EngineName::Node => CompatEngine::Node,
            EngineName::Safari => CompatEngine::Safari,
        }
    }
}

/// `major[.minor[.patch]]`; missing components compare as zero
pub type Version = Vec<u32>;

/// Constraint per engine; a later constraint on the same engine replaces the earlier one
pub type Constraints = FxHashMap<CompatEngine, Version>;

type Support = &'static [(CompatEngine, &'static [u32])];

use CompatEngine::{Chrome, Edge, Es, Firefox, Ios, Node, Safari};

static TABLE: &[(Feature, Support)] = &[
    (
        Feature::ARROW,
        &[
            (Es, &[2015]),
            (Chrome, &[49]),
            (Edge, &[13]),
            (Firefox, &[45]),
            (Ios, &[10]),
            (Node, &[6]),
            (Safari, &[10]),
        ],
    ),
    (
        Feature::CLASS,
        &[
            (Es, &[2015]),
            (Chrome, &[49]),
            (Edge, &[13]),
            (Firefox, &[45]),
            (Ios, &[10]),
            (Node, &[6]),
            (Safari, &[10]),
        ],
    ),
    (
        Feature::TEMPLATE_LITERAL,
        &[
            (Es, &[2015]),
            (Chrome, &[41]),
            (Edge, &[13]),
            (Firefox, &[34]),
            (Ios, &[9]),
            (Node, &[4]),
            (Safari, &[9]),
        ],
    ),
    (
        Feature::DESTRUCTURING,
        &[
            (Es, &[2015]),
            (Chrome, &[51]),
            (Edge, &[18]),
            (Firefox, &[53]),
            (Ios, &[10]),
            (Node, &[6, 5]),
            (Safari, &[10]),
        ],
    ),
    (
        Feature::LET_CONST,
        &[
            (Es, &[2015]),
            (Chrome, &[49]),
            (Edge, &[14]),
            (Firefox, &[51]),
            (Ios, &[11]),
            (Node, &[6]),
            (Safari, &[11]),
        ],
    ),
    (
        Feature::EXPONENT_OPERATOR,
        &[
            (Es, &[2016]),
            (Chrome, &[52]),
            (Edge, &[14]),
            (Firefox, &[52]),
            (Ios, &[10, 3]),
            (Node, &[7]),
            (Safari, &[10, 1]),
        ],
    ),
    (
        Feature::ASYNC_AWAIT,
        &[
            (Es, &[2017]),
            (Chrome, &[55]),
            (Edge, &[15]),
            (Firefox, &[52]),
            (Ios, &[11]),
            (Node, &[7, 6]),
            (Safari, &[11]),
        ],
    ),
    (
        Feature::OBJECT_REST_SPREAD,
        &[
            (Es, &[2018]),
            (Chrome, &[60]),
            (Edge, &[79]),
            (Firefox, &[55]),
            (Ios, &[11, 3]),
            (Node, &[8, 3]),
            (Safari, &[11, 1]),
        ],
    ),
    (
        Feature::ASYNC_GENERATOR,
        &[
            (Es, &[2018]),
            (Chrome, &[63]),
            (Edge, &[79]),
            (Firefox, &[57]),
            (Ios, &[12]),
            (Node, &[10]),
            (Safari, &[12]),
        ],
    ),
    (
        Feature::OPTIONAL_CATCH_BINDING,
        &[
            (Es, &[2019]),
            (Chrome, &[66]),
            (Edge, &[79]),
            (Firefox, &[58]),
            (Ios, &[11, 3]),
            (Node, &[10]),
            (Safari, &[11, 1]),
        ],
    ),
    (
        Feature::OPTIONAL_CHAIN,
        &[
            (Es, &[2020]),
            (Chrome, &[80]),
            (Edge, &[80]),
            (Firefox, &[74]),
            (Ios, &[13, 4]),
            (Node, &[14]),
            (Safari, &[13, 1]),
        ],
    ),
    (
        Feature::NULLISH_COALESCING,
        &[
            (Es, &[2020]),
            (Chrome, &[80]),
            (Edge, &[80]),
            (Firefox, &[72]),
            (Ios, &[13, 4]),
            (Node, &[14]),
            (Safari, &[13, 1]),
        ],
    ),
    (
        Feature::BIG_INT,
        &[
            (Es, &[2020]),
            (Chrome, &[67]),
            (Edge, &[79]),
            (Firefox, &[68]),
            (Ios, &[14]),
            (Node, &[10, 4]),
            (Safari, &[14]),
        ],
    ),
    (
        Feature::IMPORT_META,
        &[
            (Es, &[2020]),
            (Chrome, &[64]),
            (Edge, &[79]),
            (Firefox, &[62]),
            (Ios, &[12]),
            (Node, &[10, 4]),
            (Safari, &[11, 1]),
        ],
    ),
    // Not yet part of a published edition
    (
        Feature::CLASS_FIELD,
        &[
            (Chrome, &[73]),
            (Edge, &[79]),
            (Firefox, &[69]),
            (Ios, &[14]),
            (Node, &[12]),
            (Safari, &[14]),
        ],
    ),
];

pub fn compare_versions(a: &[u32], b: &[u32]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or(0);
            let right = b.get(i).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Features that at least one constraint cannot run.
pub fn unsupported_features(constraints: &Constraints) -> Feature {
    let mut unsupported = Feature::empty();
    for (feature, support) in TABLE {
        let missing = constraints.iter().any(|(engine, version)| {
            match support.iter().find(|(listed, _)| listed == engine) {
                Some((_, first)) => compare_versions(version, first).is_lt(),
                None => true,
            }
        });
        if missing {
            unsupported |= *feature;
        }
    }
    unsupported
}
