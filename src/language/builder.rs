use roxmltree::{Document, Node, TextPos};

use crate::language::ast::{LoopStmt, PrintStmt, Program, Statement};
use crate::language::errors::{CompileError, MalformedNodeError};
use crate::language::span::Span;

/// Parses XML source text and builds the program from the root's children.
///
/// The root element's own name is not inspected; only its children carry
/// statements.
pub fn parse_document(source: &str) -> Result<Program, CompileError> {
    let doc = Document::parse(source).map_err(|err| syntax_error(source, &err))?;
    let statements = build(doc.root_element())?;
    Ok(Program { statements })
}

/// Turns the element children of `parent` into statements, in document
/// order. Recurses through `for` bodies. Element names outside the dialect
/// are skipped without emitting anything, so unrecognized children never
/// consume a statement slot.
pub fn build(parent: Node) -> Result<Vec<Statement>, MalformedNodeError> {
    let mut statements = Vec::new();
    for child in parent.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "for" => statements.push(build_loop(child)?),
            "printLine" => statements.push(build_print(child)?),
            _ => {} // Ignore unknown elements
        }
    }
    Ok(statements)
}

fn build_loop(node: Node) -> Result<Statement, MalformedNodeError> {
    let counter_name = required_attribute(node, "varName")?.to_string();
    let init_value = integer_attribute(node, "initValue")?;
    let bound = integer_attribute(node, "lessThan")?;
    let step = integer_attribute(node, "incrementBy")?;
    let body = build(node)?;
    Ok(Statement::Loop(LoopStmt {
        counter_name,
        init_value,
        bound,
        step,
        body,
    }))
}

fn build_print(node: Node) -> Result<Statement, MalformedNodeError> {
    let value = required_attribute(node, "value")?.to_string();
    Ok(Statement::Print(PrintStmt { value }))
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, MalformedNodeError> {
    node.attribute(name)
        .ok_or_else(|| MalformedNodeError::MissingAttribute {
            node: node.tag_name().name().to_string(),
            attribute: name.to_string(),
            span: node.range().into(),
        })
}

fn integer_attribute(node: Node, name: &str) -> Result<i64, MalformedNodeError> {
    let raw = required_attribute(node, name)?;
    // Surrounding whitespace is tolerated, anything else is a malformed node.
    raw.trim()
        .parse::<i64>()
        .map_err(|_| MalformedNodeError::InvalidInteger {
            attribute: name.to_string(),
            value: raw.to_string(),
            span: node.range().into(),
        })
}

fn syntax_error(source: &str, err: &roxmltree::Error) -> CompileError {
    CompileError::Syntax {
        message: err.to_string(),
        span: Span::point(byte_offset(source, err.pos())),
    }
}

/// Maps roxmltree's 1-based row/column error position back onto a byte
/// offset in the source text.
fn byte_offset(source: &str, pos: TextPos) -> usize {
    let row = pos.row.saturating_sub(1) as usize;
    let col = pos.col.saturating_sub(1) as usize;
    let mut offset = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index == row {
            let column_offset = line
                .char_indices()
                .nth(col)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            return offset + column_offset;
        }
        offset += line.len();
    }
    source.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        parse_document(source).expect("source should compile")
    }

    #[test]
    fn builds_statements_in_document_order() {
        let program = parse(
            r#"<program>
                <printLine value="first" />
                <for varName="i" initValue="0" lessThan="2" incrementBy="1" />
                <printLine value="last" />
            </program>"#,
        );
        assert_eq!(program.statements.len(), 3);
        assert!(matches!(program.statements[0], Statement::Print(_)));
        assert!(matches!(program.statements[1], Statement::Loop(_)));
        assert!(matches!(program.statements[2], Statement::Print(_)));
    }

    #[test]
    fn builds_nested_loop_bodies_recursively() {
        let program = parse(
            r#"<program>
                <for varName="i" initValue="0" lessThan="3" incrementBy="1">
                    <for varName="j" initValue="0" lessThan="2" incrementBy="1">
                        <printLine value="x" />
                    </for>
                </for>
            </program>"#,
        );
        let Statement::Loop(outer) = &program.statements[0] else {
            panic!("expected a loop");
        };
        assert_eq!(outer.counter_name, "i");
        assert_eq!(outer.body.len(), 1);
        let Statement::Loop(inner) = &outer.body[0] else {
            panic!("expected a nested loop");
        };
        assert_eq!(inner.counter_name, "j");
        assert_eq!(inner.bound, 2);
        assert!(matches!(inner.body[0], Statement::Print(_)));
    }

    #[test]
    fn skips_unrecognized_elements_without_consuming_a_slot() {
        let program = parse(
            r#"<program>
                <printLine value="a" />
                <comment text="not a statement" />
                <printLine value="b" />
            </program>"#,
        );
        assert_eq!(
            program.statements,
            vec![
                Statement::Print(PrintStmt { value: "a".into() }),
                Statement::Print(PrintStmt { value: "b".into() }),
            ]
        );
    }

    #[test]
    fn skips_unrecognized_elements_inside_loop_bodies() {
        let program = parse(
            r#"<program>
                <for varName="i" initValue="0" lessThan="1" incrementBy="1">
                    <whileLine value="nope" />
                </for>
            </program>"#,
        );
        let Statement::Loop(stmt) = &program.statements[0] else {
            panic!("expected a loop");
        };
        assert!(stmt.body.is_empty());
    }

    #[test]
    fn program_of_only_unrecognized_elements_is_empty() {
        let program = parse("<program><alpha /><beta><printLine value=\"unreachable\" /></beta></program>");
        // `beta` is skipped wholesale; the builder never descends into it.
        assert!(program.statements.is_empty());
    }

    #[test]
    fn empty_print_value_is_accepted() {
        let program = parse(r#"<program><printLine value="" /></program>"#);
        assert_eq!(
            program.statements,
            vec![Statement::Print(PrintStmt { value: String::new() })]
        );
    }

    #[test]
    fn integer_attributes_tolerate_surrounding_whitespace() {
        let program = parse(
            r#"<program><for varName="i" initValue=" 4 " lessThan=" 9" incrementBy="2 " /></program>"#,
        );
        let Statement::Loop(stmt) = &program.statements[0] else {
            panic!("expected a loop");
        };
        assert_eq!((stmt.init_value, stmt.bound, stmt.step), (4, 9, 2));
    }

    #[test]
    fn negative_and_zero_steps_pass_through_unvalidated() {
        let program = parse(
            r#"<program>
                <for varName="i" initValue="5" lessThan="0" incrementBy="-1" />
                <for varName="j" initValue="1" lessThan="1" incrementBy="0" />
            </program>"#,
        );
        let Statement::Loop(first) = &program.statements[0] else {
            panic!("expected a loop");
        };
        assert_eq!(first.step, -1);
        let Statement::Loop(second) = &program.statements[1] else {
            panic!("expected a loop");
        };
        assert_eq!(second.step, 0);
    }

    #[test]
    fn missing_increment_attribute_is_a_malformed_node() {
        let err = parse_document(
            r#"<program><for varName="i" initValue="0" lessThan="3" /></program>"#,
        )
        .expect_err("missing incrementBy should fail");
        assert!(matches!(
            err,
            CompileError::MalformedNode(MalformedNodeError::MissingAttribute {
                ref node,
                ref attribute,
                ..
            }) if node == "for" && attribute == "incrementBy"
        ));
    }

    #[test]
    fn missing_print_value_is_a_malformed_node() {
        let err = parse_document("<program><printLine /></program>")
            .expect_err("missing value should fail");
        assert!(matches!(
            err,
            CompileError::MalformedNode(MalformedNodeError::MissingAttribute {
                ref node,
                ref attribute,
                ..
            }) if node == "printLine" && attribute == "value"
        ));
    }

    #[test]
    fn non_numeric_bound_is_a_malformed_node() {
        let err = parse_document(
            r#"<program><for varName="i" initValue="0" lessThan="ten" incrementBy="1" /></program>"#,
        )
        .expect_err("non-numeric lessThan should fail");
        assert!(matches!(
            err,
            CompileError::MalformedNode(MalformedNodeError::InvalidInteger {
                ref attribute,
                ref value,
                ..
            }) if attribute == "lessThan" && value == "ten"
        ));
    }

    #[test]
    fn malformed_node_spans_cover_the_offending_element() {
        let source = r#"<program><printLine /></program>"#;
        let err = parse_document(source).expect_err("missing value should fail");
        let span = err.span();
        assert!(source[span.start..].starts_with("<printLine"));
        assert!(span.len() > 0);
    }

    #[test]
    fn unparseable_document_is_a_syntax_error() {
        let err = parse_document("<program><for></program>")
            .expect_err("mismatched tags should fail");
        assert!(matches!(err, CompileError::Syntax { .. }));

        let err = parse_document("printLine value=x").expect_err("plain text is not a document");
        assert!(matches!(err, CompileError::Syntax { .. }));
    }

    #[test]
    fn empty_input_is_a_syntax_error() {
        let err = parse_document("").expect_err("empty input is not a document");
        assert!(matches!(err, CompileError::Syntax { .. }));
    }
}
