use crate::span::Span;

/// A front-end or encoder diagnostic (error or warning) anchored in source.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render the diagnostic to stderr using ariadne.
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let (kind, color) = match self.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };

        // Spans past the end (an inserted semicolon at EOF) would make
        // ariadne point nowhere; clamp them to the source.
        let len = source.len();
        let start = (self.span.start as usize).min(len);
        let end = (self.span.end as usize).clamp(start, len);

        let mut report = Report::build(kind, filename, start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if let Err(e) = report.finish().eprint((filename, Source::from(source))) {
            tracing::warn!(error = %e, "failed to render diagnostic");
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}: {} (at {}..{})",
            label, self.message, self.span.start, self.span.end
        )?;
        if let Some(help) = &self.help {
            write!(f, "; help: {}", help)?;
        }
        Ok(())
    }
}

/// Render a list of diagnostics.
pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str, source: &str) {
    for diag in diagnostics {
        diag.render(filename, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let span = Span::new(6, 11);
        let d = Diagnostic::error("expected expression".to_string(), span);
        assert_eq!(d.severity, Severity::Error);
        assert!(d.is_error());
        assert_eq!(d.span.start, 6);
        assert_eq!(d.span.end, 11);
        assert!(d.notes.is_empty());
        assert!(d.help.is_none());
    }

    #[test]
    fn test_chained_builders() {
        let d = Diagnostic::warning("`if` statement is not encoded".to_string(), Span::new(0, 2))
            .with_note("it contributes nothing to the product".to_string())
            .with_help("move the computation into a return value".to_string());
        assert_eq!(d.severity, Severity::Warning);
        assert!(!d.is_error());
        assert_eq!(d.notes.len(), 1);
        assert!(d.help.is_some());
    }

    #[test]
    fn test_display_includes_span_and_help() {
        let d = Diagnostic::error("bad".to_string(), Span::new(3, 4))
            .with_help("try again".to_string());
        assert_eq!(d.to_string(), "error: bad (at 3..4); help: try again");
    }

    #[test]
    fn test_render_does_not_panic() {
        let source = "package main\n\nconst x = \n";
        let d = Diagnostic::error("expected expression".to_string(), Span::new(24, 25))
            .with_note("a constant needs a value".to_string());
        d.render("test.go", source);
    }

    #[test]
    fn test_render_span_past_end_does_not_panic() {
        let source = "package main";
        let d = Diagnostic::error("unexpected end of file".to_string(), Span::new(40, 41));
        render_diagnostics(&[d], "test.go", source);
    }
}
