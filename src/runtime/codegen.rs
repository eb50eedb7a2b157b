use std::fmt::Write;

use crate::language::ast::{LoopStmt, Program, Statement};
use crate::runtime::error::OutputSinkError;
use crate::runtime::output::OutputSink;

type Thunk = Box<dyn Fn(&mut dyn OutputSink) -> Result<(), OutputSinkError>>;

/// A lowered program: a closure chain bound to its output sink, plus the C
/// translation unit the artifact emitter feeds to an external compiler.
///
/// Running and emitting both work from this value alone; neither path goes
/// back to the `Program` it was lowered from.
pub struct Executable {
    thunks: Vec<Thunk>,
    sink: Box<dyn OutputSink>,
    translation: String,
}

impl std::fmt::Debug for Executable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executable")
            .field("thunks", &self.thunks.len())
            .field("translation", &self.translation)
            .finish_non_exhaustive()
    }
}

impl Executable {
    /// Executes the program against the sink it was lowered with. Fails only
    /// if the sink fails, and the failure is propagated immediately.
    pub fn run(&mut self) -> Result<(), OutputSinkError> {
        for thunk in &self.thunks {
            thunk(self.sink.as_mut())?;
        }
        Ok(())
    }

    /// The C rendering of the program, consumed by the artifact emitter.
    pub fn translation_unit(&self) -> &str {
        &self.translation
    }
}

/// Lowers a program into an executable unit bound to the given sink.
///
/// Lowering cannot fail: every validation already happened while the program
/// was built.
pub fn lower(program: &Program, sink: Box<dyn OutputSink>) -> Executable {
    let thunks = lower_statements(&program.statements);
    let translation = render_translation(&program.statements);
    Executable {
        thunks,
        sink,
        translation,
    }
}

fn lower_statements(statements: &[Statement]) -> Vec<Thunk> {
    statements.iter().map(lower_statement).collect()
}

fn lower_statement(statement: &Statement) -> Thunk {
    match statement {
        Statement::Print(stmt) => {
            let line = stmt.value.clone();
            // The write happens when the thunk runs, not here.
            Box::new(move |sink| sink.write_line(&line))
        }
        Statement::Loop(stmt) => lower_loop(stmt),
    }
}

fn lower_loop(stmt: &LoopStmt) -> Thunk {
    let init = stmt.init_value;
    let bound = stmt.bound;
    let step = stmt.step;
    let body = lower_statements(&stmt.body);
    Box::new(move |sink| {
        // Fresh counter slot per invocation. Nested loops each carry their
        // own slot, so colliding counter names never share state.
        let mut counter = init;
        loop {
            if counter >= bound {
                break;
            }
            // The counter steps between the exit test and the body: the
            // first iteration's body already sees init + step.
            counter = counter.wrapping_add(step);
            for thunk in &body {
                thunk(sink)?;
            }
        }
        Ok(())
    })
}

/// Renders the statement sequence as a C translation unit with the same
/// observable behavior as the closure chain.
fn render_translation(statements: &[Statement]) -> String {
    let mut out = String::from("#include <stdio.h>\n\nint main(void) {\n");
    let mut slots = 0usize;
    render_statements(statements, 1, &mut slots, &mut out);
    out.push_str("    return 0;\n}\n");
    out
}

fn render_statements(statements: &[Statement], depth: usize, slots: &mut usize, out: &mut String) {
    let pad = "    ".repeat(depth);
    for statement in statements {
        match statement {
            Statement::Print(stmt) => {
                let _ = writeln!(out, "{pad}fputs(\"{}\\n\", stdout);", escape_c(&stmt.value));
            }
            Statement::Loop(stmt) => {
                // Counter names come from arbitrary attribute text, so the
                // rendering uses generated slot names instead.
                let slot = format!("s{}", *slots);
                *slots += 1;
                let _ = writeln!(out, "{pad}{{");
                let _ = writeln!(out, "{pad}    long long {slot} = {};", c_i64(stmt.init_value));
                let _ = writeln!(out, "{pad}    for (;;) {{");
                let _ = writeln!(out, "{pad}        if ({slot} >= {}) break;", c_i64(stmt.bound));
                // Unsigned add so overflow wraps like the closure chain does.
                let _ = writeln!(
                    out,
                    "{pad}        {slot} = (long long)((unsigned long long){slot} + (unsigned long long){});",
                    c_i64(stmt.step)
                );
                render_statements(&stmt.body, depth + 2, slots, out);
                let _ = writeln!(out, "{pad}    }}");
                let _ = writeln!(out, "{pad}}}");
            }
        }
    }
}

fn escape_c(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                // Three octal digits exactly, so a digit after the escape
                // cannot extend it.
                let _ = write!(escaped, "\\{:03o}", ch as u32);
            }
            ch => escaped.push(ch),
        }
    }
    escaped
}

fn c_i64(value: i64) -> String {
    if value == i64::MIN {
        // The magnitude of i64::MIN overflows a C decimal literal.
        "(-9223372036854775807LL - 1)".to_string()
    } else {
        format!("{value}LL")
    }
}
