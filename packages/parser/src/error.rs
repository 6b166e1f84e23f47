use std::ops::Range;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {}: expected {expected}, found {found}", .span.start)]
    UnexpectedToken {
        span: Range<usize>,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file: expected {expected}")]
    UnexpectedEof { span: Range<usize>, expected: String },

    #[error("Invalid syntax at {}: {message}", .span.start)]
    InvalidSyntax { span: Range<usize>, message: String },

    #[error("Lexer error at {}: unexpected character", .span.start)]
    LexerError { span: Range<usize> },

    #[error("Unsupported syntax at {}: {message}", .span.start)]
    Unsupported { span: Range<usize>, message: String },

    #[error("{name} is not defined")]
    UndefinedBinding { span: Range<usize>, name: String },
}

impl ParseError {
    pub fn unexpected_token(
        span: Range<usize>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(span: Range<usize>, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            span,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn unsupported(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::Unsupported {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::LexerError { span }
            | ParseError::Unsupported { span, .. }
            | ParseError::UndefinedBinding { span, .. } => span.clone(),
        }
    }

    /// Short label shown under the offending source range
    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
            ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::InvalidSyntax { message, .. } => message.clone(),
            ParseError::LexerError { .. } => "unexpected character".to_string(),
            ParseError::Unsupported { message, .. } => message.clone(),
            ParseError::UndefinedBinding { name, .. } => format!("'{}' is not declared", name),
        }
    }
}

#[cfg(feature = "pretty-errors")]
pub mod pretty {
    use super::ParseError;

    /// Pretty-print a parse error with source context using ariadne
    pub fn format_error(error: &ParseError, filename: &str, source: &str) -> String {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let mut span = error.span();
        if span.start >= source.len() {
            span = source.len().saturating_sub(1)..source.len();
        }

        let mut output = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_color(Color::Red)
                    .with_message(error.label()),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output);

        match written.ok().and_then(|_| String::from_utf8(output).ok()) {
            Some(report) => report,
            None => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ParseError::unexpected_token(4..5, "':'", "'}'");
        assert_eq!(
            err.to_string(),
            "Unexpected token at 4: expected ':', found '}'"
        );

        let err = ParseError::UndefinedBinding {
            span: 0..3,
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "foo is not defined");
        assert_eq!(err.span(), 0..3);
    }

    #[cfg(feature = "pretty-errors")]
    #[test]
    fn test_pretty_format_includes_message() {
        let source = "export default { name: }";
        let err = ParseError::unexpected_token(23..24, "expression", "'}'");
        let report = pretty::format_error(&err, "initState.ts", source);

        assert!(report.contains("expected expression"));
        assert!(report.contains("initState.ts"));
    }
}
