mod message;
mod printer;

#[cfg(test)]
mod tests;

use text_size::TextRange;

pub use message::{DiagnosticKind, Severity};
pub use printer::DiagnosticsPrinter;

use message::{DiagnosticMessage, RelatedInfo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    /// Append all diagnostics from `other`, keeping source order by span start.
    pub fn merge(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
        self.messages
            .sort_by_key(|m| (m.range.start(), m.range.end()));
    }

    /// Returns diagnostics with cascading errors suppressed.
    ///
    /// Suppression rules:
    /// 1. Containment: when a higher-priority span contains another, suppress the inner
    /// 2. Same position: the higher-priority kind wins
    pub(crate) fn filtered(&self) -> Vec<DiagnosticMessage> {
        if self.messages.is_empty() {
            return Vec::new();
        }

        let mut suppressed = vec![false; self.messages.len()];

        // O(n²) but n is typically small
        for (i, a) in self.messages.iter().enumerate() {
            for (j, b) in self.messages.iter().enumerate() {
                if i == j || suppressed[i] || suppressed[j] {
                    continue;
                }
                if span_contains(a.range, b.range)
                    && a.range != b.range
                    && a.kind.suppresses(b.kind)
                {
                    suppressed[j] = true;
                    continue;
                }
                if a.range.start() == b.range.start()
                    && a.range == b.range
                    && a.kind.suppresses(b.kind)
                {
                    suppressed[j] = true;
                }
            }
        }

        self.messages
            .iter()
            .enumerate()
            .filter(|(i, _)| !suppressed[*i])
            .map(|(_, m)| m.clone())
            .collect()
    }
}

fn span_contains(outer: TextRange, inner: TextRange) -> bool {
    outer.start() <= inner.start() && inner.end() <= outer.end()
}

impl<'a> DiagnosticBuilder<'a> {
    /// Override the default message for this diagnostic.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message.message = msg.into();
        self
    }

    /// Fill the kind's `{}` message template with the given detail.
    pub fn detail(mut self, detail: impl AsRef<str>) -> Self {
        self.message.message = self
            .message
            .kind
            .custom_message()
            .replace("{}", detail.as_ref());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.message.severity = severity;
        self
    }

    /// Attach a secondary span with its own label.
    pub fn related(mut self, range: TextRange, msg: impl Into<String>) -> Self {
        self.message.related.push(RelatedInfo {
            range,
            message: msg.into(),
        });
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
