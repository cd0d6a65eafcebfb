//! Diagnostic collection and ordering.
//!
//! Every stage of a build (option validation, plugin callbacks, scanning,
//! compilation) reports problems into one [`Diagnostics`] collector instead of
//! returning early. Messages may arrive from concurrently processed files, so
//! the collector makes no assumption about insertion order. Batches (for
//! example the messages returned by one plugin callback) are sorted with
//! [`sort_diagnostics`] before they are merged, which keeps output stable no
//! matter how the producer appended them.

use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::report::{self, LogOptions};

/// Source location attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: String,
    /// 1-based line number
    pub line: u32,
    /// 0-based column in bytes
    pub column: u32,
    pub length: u32,
    pub line_text: String,
}

/// A message as seen by the host program and by plugin authors.
///
/// The severity is implied by which list the message sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
}

/// A message tagged with its severity, the pipeline's internal shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: MessageKind,
    pub message: Message,
}

impl Diagnostic {
    pub fn new(kind: MessageKind, message: Message) -> Self {
        Self { kind, message }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, Message::new(text))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, Message::new(text))
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }

    pub fn text(&self) -> &str {
        &self.message.text
    }

    /// Tag a list of public messages with one severity.
    pub fn from_messages(
        kind: MessageKind,
        messages: impl IntoIterator<Item = Message>,
    ) -> impl Iterator<Item = Diagnostic> {
        messages
            .into_iter()
            .map(move |message| Diagnostic::new(kind, message))
    }

    /// Split diagnostics into public `(errors, warnings)` lists, keeping order.
    pub fn partition(diagnostics: Vec<Diagnostic>) -> (Vec<Message>, Vec<Message>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for diagnostic in diagnostics {
            match diagnostic.kind {
                MessageKind::Error => errors.push(diagnostic.message),
                MessageKind::Warning => warnings.push(diagnostic.message),
            }
        }
        (errors, warnings)
    }
}

/// Total order used for every sorted batch.
///
/// Messages without a location come first. Located messages are ordered by
/// file, line, column and finally text. Two unlocated messages fall back to
/// their text.
pub fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    match (&a.message.location, &b.message.location) {
        (None, None) => a.message.text.cmp(&b.message.text),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(la), Some(lb)) => la
            .file
            .cmp(&lb.file)
            .then(la.line.cmp(&lb.line))
            .then(la.column.cmp(&lb.column))
            .then_with(|| a.message.text.cmp(&b.message.text)),
    }
}

/// Sort a batch of diagnostics into presentation order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(compare_diagnostics);
}

/// Thread-safe collector for one build or transform call.
///
/// Cloning is cheap and every clone appends to the same list, so the
/// collector can be handed to concurrently running collaborators.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, diagnostic: Diagnostic) {
        tracing::trace!(kind = ?diagnostic.kind, text = %diagnostic.message.text, "diagnostic");
        self.entries.lock().push(diagnostic);
    }

    pub fn add_error(&self, text: impl Into<String>) {
        self.add(Diagnostic::error(text));
    }

    pub fn add_warning(&self, text: impl Into<String>) {
        self.add(Diagnostic::warning(text));
    }

    /// Sort a batch and append it as one contiguous run.
    pub fn add_batch(&self, mut batch: Vec<Diagnostic>) {
        if batch.is_empty() {
            return;
        }
        sort_diagnostics(&mut batch);
        self.entries.lock().extend(batch);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.lock().iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.entries.lock().iter().filter(|d| d.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of everything collected so far.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Finish the call: report through `tracing` and hand back every message.
    pub fn done(&self, options: &LogOptions) -> Vec<Diagnostic> {
        let diagnostics = std::mem::take(&mut *self.entries.lock());
        report::emit(&diagnostics, options);
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(text: &str, file: &str, line: u32, column: u32) -> Diagnostic {
        Diagnostic::error(text).located(file, line, column)
    }

    impl Diagnostic {
        fn located(mut self, file: &str, line: u32, column: u32) -> Self {
            self.message.location = Some(Location {
                file: file.to_string(),
                line,
                column,
                ..Default::default()
            });
            self
        }
    }

    #[test]
    fn unlocated_sorts_before_located_in_same_file() {
        let mut batch = vec![
            located("second", "x.js", 5, 2),
            Diagnostic::warning("first"),
        ];
        sort_diagnostics(&mut batch);
        assert_eq!(batch[0].text(), "first");
        assert_eq!(batch[1].text(), "second");
    }

    #[test]
    fn located_sort_by_file_line_column_then_text() {
        let mut batch = vec![
            located("b", "b.js", 1, 0),
            located("z", "a.js", 2, 0),
            located("y", "a.js", 1, 4),
            located("x", "a.js", 1, 4),
            located("w", "a.js", 1, 1),
        ];
        sort_diagnostics(&mut batch);
        let order: Vec<_> = batch.iter().map(Diagnostic::text).collect();
        assert_eq!(order, ["w", "x", "y", "z", "b"]);
    }

    #[test]
    fn batch_order_is_independent_of_insertion_order() {
        let forward = vec![
            located("a", "m.js", 3, 1),
            Diagnostic::error("plain"),
            located("b", "m.js", 1, 9),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let first = Diagnostics::new();
        first.add_batch(forward);
        let second = Diagnostics::new();
        second.add_batch(reversed);

        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let log = Diagnostics::new();
        log.add_warning("careful");
        assert!(!log.has_errors());
        log.add_error("broken");
        assert!(log.has_errors());
        assert_eq!(log.error_count(), 1);
    }

    #[test]
    fn clones_share_one_list() {
        let log = Diagnostics::new();
        let handle = log.clone();
        handle.add_error("from clone");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn partition_keeps_relative_order() {
        let (errors, warnings) = Diagnostic::partition(vec![
            Diagnostic::error("e1"),
            Diagnostic::warning("w1"),
            Diagnostic::error("e2"),
        ]);
        assert_eq!(errors, vec![Message::new("e1"), Message::new("e2")]);
        assert_eq!(warnings, vec![Message::new("w1")]);
    }

    #[test]
    fn done_drains_the_collector() {
        let log = Diagnostics::new();
        log.add_error("once");
        let drained = log.done(&LogOptions::silent());
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }
}
