use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::runtime::error::OutputSinkError;

/// Destination for `printLine` output.
///
/// The sink is bound into the executable when the program is lowered, one
/// line per call with the terminator handled by the sink.
pub trait OutputSink {
    fn write_line(&mut self, text: &str) -> Result<(), OutputSinkError>;
}

/// Writes through to the process standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, text: &str) -> Result<(), OutputSinkError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(text.as_bytes())?;
        handle.write_all(b"\n")?;
        handle.flush()?;
        Ok(())
    }
}

/// Collects lines in memory behind a shared handle, so callers can keep a
/// clone and read what the executable wrote after it ran.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputSink for MemorySink {
    fn write_line(&mut self, text: &str) -> Result<(), OutputSinkError> {
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
