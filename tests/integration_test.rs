// ABOUTME: Black-box integration tests driving the public crate API end to end

use lox::error::Diagnostics;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::scanner::Scanner;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

#[derive(Clone)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run(source: &str) -> (String, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
    let statements = {
        let mut parser = Parser::new(tokens, &mut diagnostics);
        parser.parse()
    };

    let buffer = SharedBuffer(Rc::new(RefCell::new(Vec::new())));
    let interpreter = Interpreter::new(Box::new(buffer.clone()));
    interpreter.interpret(&statements, &mut diagnostics);

    let bytes = buffer.0.borrow().clone();
    (String::from_utf8(bytes).unwrap(), diagnostics)
}

#[test]
fn test_arithmetic_and_precedence_program_runs_clean() {
    let (out, diagnostics) = run("print 1 + 2 * 3 - 4 / 2;");
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "5\n");
}

#[test]
fn test_variable_declaration_and_reassignment() {
    let (out, diagnostics) = run("var x = 1; x = x + 1; print x;");
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "2\n");
}

#[test]
fn test_nested_blocks_and_shadowing() {
    let src = r#"
        var a = "outer";
        {
            var a = "inner";
            print a;
        }
        print a;
    "#;
    let (out, diagnostics) = run(src);
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "inner\nouter\n");
}

#[test]
fn test_control_flow_if_while_for() {
    let src = r#"
        var total = 0;
        for (var i = 0; i < 5; i = i + 1) {
            if (i == 2) total = total + 10;
            else total = total + i;
        }
        print total;
    "#;
    let (out, diagnostics) = run(src);
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "18\n");
}

#[test]
fn test_logical_operators_short_circuit() {
    let (out, diagnostics) = run(r#"print "a" and "b" or "c";"#);
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "b\n");
}

#[test]
fn test_runtime_error_reports_and_stops() {
    let (_, diagnostics) = run("print 1 + nil;");
    assert!(!diagnostics.had_error);
    assert!(diagnostics.had_runtime_error);
}

#[test]
fn test_parse_error_on_missing_semicolon() {
    let (_, diagnostics) = run("var x = 1");
    assert!(diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
}

#[test]
fn test_parse_error_recovers_and_reports_later_statement_errors_too() {
    let src = "var = 1; var y = ;";
    let (_, diagnostics) = run(src);
    assert!(diagnostics.had_error);
}

#[test]
fn test_comma_and_grouping() {
    let (out, diagnostics) = run("print (1 + 2, 3 + 4);");
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "7\n");
}

#[test]
fn test_unary_negation_and_not() {
    let (out, diagnostics) = run("print -5; print !true; print !nil;");
    assert!(!diagnostics.had_error);
    assert!(!diagnostics.had_runtime_error);
    assert_eq!(out, "-5\nfalse\ntrue\n");
}
