use crate::artifact::ArtifactWriteError;
use crate::language::errors::{CompileError, MalformedNodeError};
use crate::runtime::error::OutputSinkError;
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct CompileDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl CompileDiagnostic {
    pub fn from_error(src: NamedSource<String>, err: &CompileError) -> Self {
        let (label, help) = match err {
            CompileError::Syntax { .. } => ("document is not well-formed here".to_string(), None),
            CompileError::MalformedNode(node_err) => match node_err {
                MalformedNodeError::MissingAttribute { node, attribute, .. } => (
                    format!("`{attribute}` is required"),
                    attribute_help(node),
                ),
                MalformedNodeError::InvalidInteger { attribute, .. } => (
                    format!("`{attribute}` must be an integer"),
                    Some("integer attributes may carry surrounding whitespace but nothing else".to_string()),
                ),
            },
        };
        Self {
            src,
            span: err.to_source_span(),
            help,
            message: err.to_string(),
            label,
        }
    }
}

fn attribute_help(node: &str) -> Option<String> {
    match node {
        "for" => Some(
            "`for` elements need varName, initValue, lessThan and incrementBy".to_string(),
        ),
        "printLine" => Some("`printLine` elements need a value attribute".to_string()),
        _ => None,
    }
}

pub fn report_compile_error(path: &Path, source: &str, err: &CompileError) {
    let src = NamedSource::new(path.display().to_string(), source.to_string());
    let diagnostic = CompileDiagnostic::from_error(src, err);
    eprintln!("{:?}", Report::new(diagnostic));
}

pub fn report_artifact_error(error: &ArtifactWriteError) {
    eprintln!("Artifact error: {}", error);
}

pub fn report_run_error(error: &OutputSinkError) {
    eprintln!("Runtime error: {}", error);
}

pub fn report_io_error(path: &Path, error: &std::io::Error) {
    eprintln!("Failed to access {}: {}", path.display(), error);
}
