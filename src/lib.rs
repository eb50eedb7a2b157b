pub mod artifact;
pub mod diagnostics;
pub mod language;
pub mod runtime;

use language::builder::parse_document;
use language::errors::CompileError;
use runtime::codegen::{lower, Executable};
use runtime::output::{OutputSink, StdoutSink};

/// Compiles XML source text into a runnable unit bound to standard output.
///
/// One call handles one compilation request end to end: parse the document,
/// build the statement sequence, lower it. The result can be run, handed to
/// `artifact::emit`, or both.
pub fn compile(source: &str) -> Result<Executable, CompileError> {
    compile_with_sink(source, Box::new(StdoutSink))
}

/// Like [`compile`], but bound to a caller-supplied output sink.
pub fn compile_with_sink(
    source: &str,
    sink: Box<dyn OutputSink>,
) -> Result<Executable, CompileError> {
    let program = parse_document(source)?;
    Ok(lower(&program, sink))
}

#[cfg(test)]
mod tests;
