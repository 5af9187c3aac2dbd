// ABOUTME: Expression and statement AST node shapes

use crate::token::Token;
use crate::value::Value;

/// Each node owns its children exclusively; the tree is acyclic and
/// immutable after construction.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value),
    Variable(Token),
    Assign(Token, Box<Expr>),
    Unary(Token, Box<Expr>),
    Binary(Box<Expr>, Token, Box<Expr>),
    /// Distinguished from `Binary` because of short-circuit semantics.
    Logical(Box<Expr>, Token, Box<Expr>),
    Grouping(Box<Expr>),

    // Reserved node shapes (spec.md §3, §9) — no grammar production
    // constructs these, no evaluator arm runs them.
    #[allow(dead_code)]
    Call(Box<Expr>, Token, Vec<Expr>),
    #[allow(dead_code)]
    Get(Box<Expr>, Token),
    #[allow(dead_code)]
    Set(Box<Expr>, Token, Box<Expr>),
    #[allow(dead_code)]
    This(Token),
    #[allow(dead_code)]
    Super(Token, Token),
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(Expr),
    Print(Expr),
    Var(Token, Option<Expr>),
    Block(Vec<Stmt>),
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),
    While(Expr, Box<Stmt>),

    // Reserved node shapes (spec.md §3, §9).
    #[allow(dead_code)]
    Function(Token, Vec<Token>, Vec<Stmt>),
    #[allow(dead_code)]
    Return(Token, Option<Expr>),
    #[allow(dead_code)]
    Class(Token, Option<Expr>, Vec<Stmt>),
}
