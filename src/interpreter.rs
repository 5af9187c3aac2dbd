// ABOUTME: Tree-walking evaluator — executes statements, evaluates expressions to values

use crate::ast::{Expr, Stmt};
use crate::env::Environment;
use crate::error::{Diagnostics, RuntimeError};
use crate::token::{Token, TokenKind};
use crate::value::Value;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

pub struct Interpreter {
    globals: Rc<Environment>,
    environment: RefCell<Rc<Environment>>,
    out: RefCell<Box<dyn Write>>,
}

impl Interpreter {
    pub fn new(out: Box<dyn Write>) -> Self {
        let globals = Environment::new();
        Interpreter {
            environment: RefCell::new(globals.clone()),
            globals,
            out: RefCell::new(out),
        }
    }

    /// Executes each statement in order. A raised `RuntimeError` unwinds to
    /// here, is reported, and execution of the remaining statements stops —
    /// matching jlox's "interpret catches one RuntimeError per call".
    pub fn interpret(&self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(err) = self.execute(statement) {
                diagnostics.runtime_error(&err);
                return;
            }
        }
    }

    fn execute(&self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                let mut out = self.out.borrow_mut();
                writeln!(out, "{}", stringify(&value)).expect("write to print sink");
                Ok(())
            }
            Stmt::Var(name, initializer) => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow().define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => {
                let child = Environment::with_enclosing(self.environment.borrow().clone());
                self.execute_block(statements, child)
            }
            Stmt::If(condition, then_branch, else_branch) => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While(condition, body) => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function(..) | Stmt::Return(..) | Stmt::Class(..) => {
                unreachable!("parser never constructs reserved statement node shapes")
            }
        }
    }

    /// Runs `statements` against a fresh child scope. The previous
    /// environment is restored on every exit path — normal return or an
    /// `Err` unwinding out — via `EnvironmentGuard`'s `Drop` impl, so the
    /// environment chain depth is always back to its pre-block value
    /// (spec.md §4.4 invariant).
    fn execute_block(&self, statements: &[Stmt], environment: Rc<Environment>) -> Result<(), RuntimeError> {
        let _guard = EnvironmentGuard::enter(self, environment);
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn evaluate(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Variable(name) => self.environment.borrow().get(name),
            Expr::Assign(name, value_expr) => {
                let value = self.evaluate(value_expr)?;
                self.environment.borrow().assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Unary(operator, operand) => self.evaluate_unary(operator, operand),
            Expr::Binary(lhs, operator, rhs) => self.evaluate_binary(lhs, operator, rhs),
            Expr::Logical(lhs, operator, rhs) => self.evaluate_logical(lhs, operator, rhs),
            Expr::Call(..) | Expr::Get(..) | Expr::Set(..) | Expr::This(..) | Expr::Super(..) => {
                unreachable!("parser never constructs reserved expression node shapes")
            }
        }
    }

    fn evaluate_unary(&self, operator: &Token, operand: &Expr) -> Result<Value, RuntimeError> {
        let right = self.evaluate(operand)?;
        match operator.kind {
            TokenKind::Minus => {
                let n = check_number_operand(operator, &right)?;
                Ok(Value::Number(-n))
            }
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only emits Bang/Minus unary operators"),
        }
    }

    fn evaluate_logical(&self, lhs: &Expr, operator: &Token, rhs: &Expr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(lhs)?;
        match operator.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::Or => self.evaluate(rhs),
            TokenKind::And if !left.is_truthy() => Ok(left),
            TokenKind::And => self.evaluate(rhs),
            _ => unreachable!("parser only emits Or/And logical operators"),
        }
    }

    fn evaluate_binary(&self, lhs: &Expr, operator: &Token, rhs: &Expr) -> Result<Value, RuntimeError> {
        // Comma: evaluate left for side effects only, then right.
        if operator.kind == TokenKind::Comma {
            self.evaluate(lhs)?;
            return self.evaluate(rhs);
        }

        let left = self.evaluate(lhs)?;
        let right = self.evaluate(rhs)?;

        match operator.kind {
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenKind::Minus => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Slash => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                // Division by zero yields IEEE-754 inf/nan, not an error.
                Ok(Value::Number(a / b))
            }
            TokenKind::Star => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Number(a * b))
            }
            TokenKind::Greater => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = check_number_operands(operator, &left, &right)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            TokenKind::BangEqual => Ok(Value::Bool(left != right)),
            _ => unreachable!("parser only emits the above binary operators"),
        }
    }
}

/// Restores the interpreter's environment pointer on every exit path,
/// including a `RuntimeError` unwinding through `?` and a panic unwinding
/// through `execute`. Replaces the source's fragile `std::swap` pattern
/// (spec.md §5 REDESIGN FLAGS).
struct EnvironmentGuard<'a> {
    interpreter: &'a Interpreter,
    previous: Rc<Environment>,
}

impl<'a> EnvironmentGuard<'a> {
    fn enter(interpreter: &'a Interpreter, new_environment: Rc<Environment>) -> Self {
        let previous = interpreter.environment.replace(new_environment);
        EnvironmentGuard { interpreter, previous }
    }
}

impl Drop for EnvironmentGuard<'_> {
    fn drop(&mut self) {
        *self.interpreter.environment.borrow_mut() = self.previous.clone();
    }
}

fn check_number_operand(operator: &Token, operand: &Value) -> Result<f64, RuntimeError> {
    match operand {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
    }
}

fn check_number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::new(operator, "Operands must be numbers.")),
    }
}

/// Canonical printable form of a `Value`, used by `print` and diagnostics.
pub fn stringify(value: &Value) -> String {
    value.to_string()
}

/// Write sink backed by a shared buffer, so tests can assert on printed
/// output after handing the `Interpreter` its own boxed trait object.
#[cfg(test)]
#[derive(Clone)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
