//! Compile-time substitution rules.
//!
//! `--define` style rules map a dot-separated identifier path to either
//! another identifier or a JSON atom. They are compiled once per call into a
//! [`ProcessedDefines`] table that the compiler consults while it walks
//! expressions. Values are plain data: an identifier reference is only bound
//! to a symbol when [`DefineValue::evaluate`] runs inside the scope being
//! rewritten.

use indexmap::IndexMap;
use oxc_syntax::identifier::is_identifier_name;
use rustc_hash::FxHashMap;
use serde_json::Value;
use spindle_common::Diagnostics;

/// Words that may not be used as a reference target.
static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "import", "in", "instanceof", "new",
    "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
};

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(text)
}

/// Whether every `.`-separated segment of `path` is an identifier.
pub fn is_identifier_path(path: &str) -> bool {
    path.split('.').all(is_identifier_name)
}

/// A JSON atom substituted verbatim
#[derive(Debug, Clone, PartialEq)]
pub enum DefineLiteral {
    Null,
    Bool(bool),
    String(String),
    Number(f64),
}

/// Replacement for a matched expression
#[derive(Debug, Clone, PartialEq)]
pub enum DefineValue {
    /// Replace with a reference to another identifier
    Reference(String),
    Literal(DefineLiteral),
}

/// Result of evaluating a define against a scope.
#[derive(Debug, Clone, PartialEq)]
pub enum DefineExpr<R> {
    Identifier(R),
    Literal(DefineLiteral),
}

impl DefineValue {
    /// Produce the replacement expression.
    ///
    /// `find_symbol` is the compiler's lookup in the scope where the rewrite
    /// is applied; it is only called for references.
    pub fn evaluate<R>(&self, find_symbol: impl FnOnce(&str) -> R) -> DefineExpr<R> {
        match self {
            DefineValue::Reference(name) => DefineExpr::Identifier(find_symbol(name)),
            DefineValue::Literal(literal) => DefineExpr::Literal(literal.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefineData {
    /// `None` for entries that only carry the pure-call flag
    pub value: Option<DefineValue>,
    /// A call to this path whose result is unused may be dropped
    pub call_can_be_unwrapped_if_unused: bool,
}

/// A define on a member chain such as `process.env.NODE_ENV`.
#[derive(Debug, Clone, PartialEq)]
pub struct DotDefine {
    pub parts: Vec<String>,
    pub data: DefineData,
}

/// Define table shared by every file compiled in one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedDefines {
    /// Single-identifier keys
    pub identifier_defines: FxHashMap<String, DefineData>,
    /// Member-chain keys, grouped by their last segment
    pub dot_defines: FxHashMap<String, Vec<DotDefine>>,
}

impl ProcessedDefines {
    fn from_raw(raw: IndexMap<String, DefineData>) -> Self {
        let mut processed = ProcessedDefines::default();
        for (key, data) in raw {
            let parts: Vec<String> = key.split('.').map(str::to_string).collect();
            match parts.as_slice() {
                [single] => {
                    processed.identifier_defines.insert(single.clone(), data);
                }
                [.., tail] => {
                    let tail = tail.clone();
                    processed
                        .dot_defines
                        .entry(tail)
                        .or_default()
                        .push(DotDefine { parts, data });
                }
                [] => {}
            }
        }
        processed
    }

    /// Look up the define for an identifier or member chain.
    pub fn get(&self, path: &[&str]) -> Option<&DefineData> {
        match path {
            [] => None,
            [single] => self.identifier_defines.get(*single),
            [.., tail] => self
                .dot_defines
                .get(*tail)?
                .iter()
                .find(|define| define.parts.iter().map(String::as_str).eq(path.iter().copied()))
                .map(|define| &define.data),
        }
    }

    pub fn len(&self) -> usize {
        self.identifier_defines.len() + self.dot_defines.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_value(value: &str) -> Option<DefineValue> {
    if is_identifier_name(value) && !is_keyword(value) {
        return Some(DefineValue::Reference(value.to_string()));
    }

    let literal = match serde_json::from_str::<Value>(value).ok()? {
        Value::Null => DefineLiteral::Null,
        Value::Bool(b) => DefineLiteral::Bool(b),
        Value::String(s) => DefineLiteral::String(s),
        Value::Number(n) => DefineLiteral::Number(n.as_f64()?),
        Value::Array(_) | Value::Object(_) => return None,
    };
    Some(DefineValue::Literal(literal))
}

/// Compile defines and pure-function paths.
///
/// Returns `None` when there is nothing to substitute so the compiler can skip
/// the pass entirely. Invalid entries are reported and left out.
pub fn compile_defines(
    log: &Diagnostics,
    defines: &IndexMap<String, String>,
    pure_functions: &[String],
) -> Option<ProcessedDefines> {
    if defines.is_empty() && pure_functions.is_empty() {
        return None;
    }

    let mut raw: IndexMap<String, DefineData> = IndexMap::new();

    for (key, value) in defines {
        if !is_identifier_path(key) {
            log.add_error(format!("Invalid define key: {key:?}"));
            continue;
        }
        let Some(value) = parse_value(value) else {
            log.add_error(format!("Invalid define value: {value:?}"));
            continue;
        };
        raw.insert(
            key.clone(),
            DefineData {
                value: Some(value),
                call_can_be_unwrapped_if_unused: false,
            },
        );
    }

    for key in pure_functions {
        if !is_identifier_path(key) {
            log.add_error(format!("Invalid pure function: {key:?}"));
            continue;
        }
        raw.entry(key.clone())
            .or_default()
            .call_can_be_unwrapped_if_unused = true;
    }

    tracing::debug!(entries = raw.len(), "compiled defines");
    Some(ProcessedDefines::from_raw(raw))
}
