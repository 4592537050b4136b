use std::fmt;

use text_size::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics have overlapping spans, the higher-priority one
/// suppresses the lower-priority one. This prevents cascading error noise:
/// an unclosed brace reported for a whole declaration silences the token
/// errors the recovery pass produced while it limped to the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // These cause cascading errors through the rest of the file
    UnclosedBrace,

    // Root-cause parse errors
    UnexpectedEof,
    UnexpectedToken,

    // Specific mistakes at a location
    InvalidCastTarget,
    UnrecognizedCharacters,
    DuplicateModifier,

    // Valid syntax, unavailable in the configured edition
    ConstructUnavailable,
}

impl DiagnosticKind {
    /// Default severity for this kind. Can be overridden on the builder.
    pub fn default_severity(self) -> Severity {
        match self {
            Self::DuplicateModifier => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind suppresses `other` when spans overlap.
    ///
    /// Uses enum discriminant ordering: lower position = higher priority.
    pub fn suppresses(self, other: DiagnosticKind) -> bool {
        self < other
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnexpectedEof => "unexpected end of input",
            Self::UnexpectedToken => "unexpected token",
            Self::InvalidCastTarget => "cast target is not a type",
            Self::UnrecognizedCharacters => "unrecognized characters",
            Self::DuplicateModifier => "duplicate modifier",
            Self::ConstructUnavailable => "construct not available in this edition",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(self) -> String {
        match self {
            Self::UnclosedBrace => "`{}` is never closed".to_string(),
            Self::UnexpectedToken => "unexpected {}".to_string(),
            Self::DuplicateModifier => "`{}` appears more than once".to_string(),
            Self::ConstructUnavailable => "{} requires a newer language edition".to_string(),
            _ => "{}".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single rendered-ready diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub range: TextRange,
    pub message: String,
    pub severity: Severity,
    pub related: Vec<RelatedInfo>,
}

/// Secondary span attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub range: TextRange,
    pub message: String,
}

impl DiagnosticMessage {
    pub fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            severity: kind.default_severity(),
            related: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{tag}[{}..{}]: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )
    }
}
