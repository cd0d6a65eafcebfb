//! Reporting collected messages through `tracing`.
//!
//! Spindle never prints on its own. When a call finishes, its messages are
//! emitted as `tracing` events filtered by the call's [`LogOptions`]; hosts
//! decide where those events go by installing a subscriber.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Message, MessageKind};

/// Minimum severity that gets reported.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
    /// Report nothing
    Silent,
}

impl LogLevel {
    /// Convert to a tracing filter directive
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "off",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn reports(&self, kind: MessageKind) -> bool {
        match kind {
            MessageKind::Error => *self <= LogLevel::Error,
            MessageKind::Warning => *self <= LogLevel::Warning,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "silent" => Ok(LogLevel::Silent),
            _ => Err(format!("Invalid log level: {s:?}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal color preference for hosts that render reported messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StderrColor {
    #[default]
    IfTerminal,
    Never,
    Always,
}

impl StderrColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StderrColor::IfTerminal => "if-terminal",
            StderrColor::Never => "never",
            StderrColor::Always => "always",
        }
    }
}

impl std::str::FromStr for StderrColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "if-terminal" => Ok(StderrColor::IfTerminal),
            "never" => Ok(StderrColor::Never),
            "always" => Ok(StderrColor::Always),
            _ => Err(format!("Invalid color: {s:?}")),
        }
    }
}

impl std::fmt::Display for StderrColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a finished call reports its messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LogLevel,
    /// Maximum number of errors reported; 0 means unlimited
    pub error_limit: usize,
    pub color: StderrColor,
}

impl LogOptions {
    pub fn silent() -> Self {
        Self {
            level: LogLevel::Silent,
            ..Default::default()
        }
    }
}

/// Render a message the way it appears in reported output.
pub fn format_message(message: &Message) -> String {
    match &message.location {
        Some(loc) => format!(
            "{}:{}:{}: {}",
            loc.file, loc.line, loc.column, message.text
        ),
        None => message.text.clone(),
    }
}

pub(crate) fn emit(diagnostics: &[Diagnostic], options: &LogOptions) {
    for (kind, line) in report_lines(diagnostics, options) {
        match kind {
            MessageKind::Error => tracing::error!("{line}"),
            MessageKind::Warning => tracing::warn!("{line}"),
        }
    }
}

/// The lines a finished call reports, in order.
///
/// Messages below the level are skipped. Past `error_limit` errors are
/// counted instead, and one "N more errors" line closes the report.
pub fn report_lines(
    diagnostics: &[Diagnostic],
    options: &LogOptions,
) -> Vec<(MessageKind, String)> {
    let mut lines = Vec::new();
    let mut shown_errors = 0usize;
    let mut hidden_errors = 0usize;

    for diagnostic in diagnostics {
        if !options.level.reports(diagnostic.kind) {
            continue;
        }
        if diagnostic.kind == MessageKind::Error {
            if options.error_limit != 0 && shown_errors >= options.error_limit {
                hidden_errors += 1;
                continue;
            }
            shown_errors += 1;
        }
        lines.push((diagnostic.kind, format_message(&diagnostic.message)));
    }

    if hidden_errors > 0 {
        lines.push((MessageKind::Error, format!("{hidden_errors} more errors")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Location;

    #[test]
    fn levels_gate_by_severity() {
        assert!(LogLevel::Info.reports(MessageKind::Warning));
        assert!(LogLevel::Warning.reports(MessageKind::Warning));
        assert!(!LogLevel::Error.reports(MessageKind::Warning));
        assert!(LogLevel::Error.reports(MessageKind::Error));
        assert!(!LogLevel::Silent.reports(MessageKind::Error));
    }

    #[test]
    fn format_includes_location_prefix() {
        let message = Message::new("Unexpected token").with_location(Location {
            file: "src/a.js".into(),
            line: 3,
            column: 7,
            length: 1,
            line_text: "let = 1".into(),
        });
        assert_eq!(format_message(&message), "src/a.js:3:7: Unexpected token");
        assert_eq!(format_message(&Message::new("plain")), "plain");
    }

    fn mixed() -> Vec<Diagnostic> {
        vec![
            Diagnostic::error("e1"),
            Diagnostic::warning("w1"),
            Diagnostic::error("e2"),
            Diagnostic::error("e3"),
            Diagnostic::warning("w2"),
        ]
    }

    fn texts(lines: &[(MessageKind, String)]) -> Vec<&str> {
        lines.iter().map(|(_, text)| text.as_str()).collect()
    }

    #[test]
    fn error_limit_hides_the_rest_behind_one_notice() {
        let options = LogOptions {
            error_limit: 2,
            ..Default::default()
        };
        let lines = report_lines(&mixed(), &options);
        assert_eq!(texts(&lines), ["e1", "w1", "e2", "w2", "1 more errors"]);
        assert_eq!(lines[4].0, MessageKind::Error);
    }

    #[test]
    fn zero_error_limit_is_unlimited() {
        let lines = report_lines(&mixed(), &LogOptions::default());
        assert_eq!(texts(&lines), ["e1", "w1", "e2", "e3", "w2"]);
    }

    #[test]
    fn level_gates_reported_lines() {
        let errors_only = LogOptions {
            level: LogLevel::Error,
            ..Default::default()
        };
        assert_eq!(
            texts(&report_lines(&mixed(), &errors_only)),
            ["e1", "e2", "e3"]
        );

        let warnings = LogOptions {
            level: LogLevel::Warning,
            error_limit: 1,
            ..Default::default()
        };
        assert_eq!(
            texts(&report_lines(&mixed(), &warnings)),
            ["e1", "w1", "w2", "2 more errors"]
        );

        assert!(report_lines(&mixed(), &LogOptions::silent()).is_empty());
    }

    #[test]
    fn located_lines_carry_their_prefix() {
        let diagnostic = Diagnostic::warning("unused").located_at("a.js", 2, 4);
        let lines = report_lines(&[diagnostic], &LogOptions::default());
        assert_eq!(lines, [(MessageKind::Warning, "a.js:2:4: unused".to_string())]);
    }

    impl Diagnostic {
        fn located_at(mut self, file: &str, line: u32, column: u32) -> Self {
            self.message.location = Some(Location {
                file: file.into(),
                line,
                column,
                ..Default::default()
            });
            self
        }
    }

    #[test]
    fn silent_filter_is_off() {
        assert_eq!(LogLevel::Silent.as_filter(), "off");
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn names_parse_back() {
        for level in [
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
            LogLevel::Silent,
        ] {
            assert_eq!(level.as_str().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!(
            "if-terminal".parse::<StderrColor>().unwrap(),
            StderrColor::IfTerminal
        );
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
