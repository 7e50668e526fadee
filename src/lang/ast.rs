pub use super::ident::Ident;
use super::Column;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Cls(Column),
    Data(Column, Vec<Expression>),
    Dim(Column, Vec<Variable>),
    End(Column),
    For(Column, Variable, Expression, Expression, Expression),
    Gosub(Column, Rc<str>),
    If(Column, Expression, Vec<Statement>, Vec<Statement>),
    Let(Column, Variable, Expression),
    Next(Column, Vec<Variable>),
    OnGosub(Column, Expression, Vec<Rc<str>>),
    Print(Column, Vec<Expression>, bool),
    Read(Column, Vec<Variable>),
    Rem(Column, Rc<str>),
    Restore(Column, Option<Rc<str>>),
    Return(Column),
    Stop(Column),
    Wend(Column),
    While(Column, Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Variable {
    Unary(Column, Ident),
    Array(Column, Ident, Vec<Expression>),
}

impl Variable {
    pub fn ident(&self) -> &Ident {
        match self {
            Variable::Unary(_, ident) | Variable::Array(_, ident, _) => ident,
        }
    }

    pub fn column(&self) -> Column {
        match self {
            Variable::Unary(col, _) | Variable::Array(col, ..) => col.clone(),
        }
    }
}

/// Numeric literals keep their source digits; hex and binary drop the prefix.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(Column, Rc<str>),
    Hex(Column, Rc<str>),
    Binary(Column, Rc<str>),
    String(Column, Rc<str>),
    Variable(Variable),
    Negation(Column, Box<Expression>),
    Power(Column, Box<Expression>, Box<Expression>),
    Multiply(Column, Box<Expression>, Box<Expression>),
    Divide(Column, Box<Expression>, Box<Expression>),
    DivideInt(Column, Box<Expression>, Box<Expression>),
    Modulo(Column, Box<Expression>, Box<Expression>),
    Add(Column, Box<Expression>, Box<Expression>),
    Subtract(Column, Box<Expression>, Box<Expression>),
    Equal(Column, Box<Expression>, Box<Expression>),
    NotEqual(Column, Box<Expression>, Box<Expression>),
    Less(Column, Box<Expression>, Box<Expression>),
    LessEqual(Column, Box<Expression>, Box<Expression>),
    Greater(Column, Box<Expression>, Box<Expression>),
    GreaterEqual(Column, Box<Expression>, Box<Expression>),
    Not(Column, Box<Expression>),
    And(Column, Box<Expression>, Box<Expression>),
    Or(Column, Box<Expression>, Box<Expression>),
    Xor(Column, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn column(&self) -> Column {
        use Expression::*;
        match self {
            Expression::Variable(var) => var.column(),
            Number(col, _) | Hex(col, _) | Binary(col, _) | String(col, _) => col.clone(),
            Negation(col, _) | Not(col, _) => col.clone(),
            Power(col, ..)
            | Multiply(col, ..)
            | Divide(col, ..)
            | DivideInt(col, ..)
            | Modulo(col, ..)
            | Add(col, ..)
            | Subtract(col, ..)
            | Equal(col, ..)
            | NotEqual(col, ..)
            | Less(col, ..)
            | LessEqual(col, ..)
            | Greater(col, ..)
            | GreaterEqual(col, ..)
            | And(col, ..)
            | Or(col, ..)
            | Xor(col, ..) => col.clone(),
        }
    }
}

pub trait Visitor {
    fn visit_statement(&mut self, _: &Statement) {}
    fn visit_ident(&mut self, _: &Ident) {}
    fn visit_variable(&mut self, _: &Variable) {}
    fn visit_expression(&mut self, _: &Expression) {}
}

pub trait AcceptVisitor {
    fn accept<V: Visitor>(&self, visitor: &mut V);
}

impl AcceptVisitor for Ident {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit_ident(self)
    }
}

impl AcceptVisitor for Variable {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use Variable::*;
        match self {
            Unary(_, ident) => {
                ident.accept(visitor);
            }
            Array(_, ident, vec_expr) => {
                ident.accept(visitor);
                for expr in vec_expr {
                    expr.accept(visitor);
                }
            }
        }
        visitor.visit_variable(self)
    }
}

impl AcceptVisitor for Statement {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use Statement::*;
        match self {
            Cls(_) | End(_) | Gosub(..) | Rem(..) | Restore(..) | Return(_) | Stop(_)
            | Wend(_) => {}
            Data(_, vec_expr) | Print(_, vec_expr, _) => {
                for expr in vec_expr {
                    expr.accept(visitor);
                }
            }
            Dim(_, vec_var) | Next(_, vec_var) | Read(_, vec_var) => {
                for var in vec_var {
                    var.accept(visitor);
                }
            }
            For(_, var, expr1, expr2, expr3) => {
                var.accept(visitor);
                expr1.accept(visitor);
                expr2.accept(visitor);
                expr3.accept(visitor);
            }
            If(_, predicate, vec_stmt1, vec_stmt2) => {
                predicate.accept(visitor);
                for stmt in vec_stmt1 {
                    stmt.accept(visitor);
                }
                for stmt in vec_stmt2 {
                    stmt.accept(visitor);
                }
            }
            Let(_, var, expr) => {
                var.accept(visitor);
                expr.accept(visitor);
            }
            OnGosub(_, expr, _) | While(_, expr) => {
                expr.accept(visitor);
            }
        }
        visitor.visit_statement(self)
    }
}

impl AcceptVisitor for Expression {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        use Expression::*;
        match self {
            Number(..) | Hex(..) | Binary(..) | String(..) => {}
            Expression::Variable(var) => var.accept(visitor),
            Negation(_, expr) | Not(_, expr) => expr.accept(visitor),
            Power(_, expr1, expr2)
            | Multiply(_, expr1, expr2)
            | Divide(_, expr1, expr2)
            | DivideInt(_, expr1, expr2)
            | Modulo(_, expr1, expr2)
            | Add(_, expr1, expr2)
            | Subtract(_, expr1, expr2)
            | Equal(_, expr1, expr2)
            | NotEqual(_, expr1, expr2)
            | Less(_, expr1, expr2)
            | LessEqual(_, expr1, expr2)
            | Greater(_, expr1, expr2)
            | GreaterEqual(_, expr1, expr2)
            | And(_, expr1, expr2)
            | Or(_, expr1, expr2)
            | Xor(_, expr1, expr2) => {
                expr1.accept(visitor);
                expr2.accept(visitor);
            }
        }
        visitor.visit_expression(self)
    }
}
