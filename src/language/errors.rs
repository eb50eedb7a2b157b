use crate::language::span::Span;
use miette::SourceSpan;
use thiserror::Error;

/// A recognized statement element that cannot be turned into a statement.
///
/// Unrecognized element names are not errors; they are skipped by the
/// builder. This error only fires for `for` and `printLine` elements whose
/// required attributes are absent or unparseable.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MalformedNodeError {
    #[error("`{node}` element is missing required attribute `{attribute}`")]
    MissingAttribute {
        node: String,
        attribute: String,
        span: Span,
    },
    #[error("attribute `{attribute}` has value `{value}`, which is not an integer")]
    InvalidInteger {
        attribute: String,
        value: String,
        span: Span,
    },
}

impl MalformedNodeError {
    pub fn span(&self) -> Span {
        match self {
            MalformedNodeError::MissingAttribute { span, .. } => *span,
            MalformedNodeError::InvalidInteger { span, .. } => *span,
        }
    }

    pub fn to_source_span(&self) -> SourceSpan {
        let span = self.span();
        (span.start, span.len()).into()
    }
}

/// Everything that can stop a compilation request.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CompileError {
    /// The input is not a well-formed XML document at all.
    #[error("source is not a well-formed XML document: {message}")]
    Syntax { message: String, span: Span },
    #[error(transparent)]
    MalformedNode(#[from] MalformedNodeError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Syntax { span, .. } => *span,
            CompileError::MalformedNode(err) => err.span(),
        }
    }

    pub fn to_source_span(&self) -> SourceSpan {
        let span = self.span();
        (span.start, span.len()).into()
    }
}
