use super::compile::Context;
use super::data::DataValue;
use super::function::Function;
use super::ir::{BinOp, CmpOp, Direction, Expr, Stmt, Target};
use super::stack::Stack;
use super::val::radix_to_number;
use super::var::canonical;
use crate::error;
use crate::lang::ast::{self, AcceptVisitor};
use crate::lang::{Column, Error, Ident};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Translates the statements of one line. Labels, DATA and variables are
/// recorded in the context as a side effect.
pub fn codegen(context: &mut Context, ast: &[ast::Statement]) -> Result<Vec<Stmt>> {
    Visitor::accept(context, ast)
}

struct Visitor<'a> {
    context: &'a mut Context,
    gen: Generator,
    error: Option<Error>,
}

impl<'a> Visitor<'a> {
    fn accept(context: &mut Context, ast: &[ast::Statement]) -> Result<Vec<Stmt>> {
        let mut this = Visitor {
            context,
            gen: Generator::new(),
            error: None,
        };
        for statement in ast {
            statement.accept(&mut this);
        }
        if let Some(error) = this.error {
            return Err(error);
        }
        let stmts: Vec<Stmt> = this
            .gen
            .stmt
            .pop_n(this.gen.stmt.len())?
            .into_iter()
            .flat_map(|(_col, stmts)| stmts)
            .collect();
        debug_assert_eq!(0, this.gen.var.len());
        debug_assert_eq!(0, this.gen.expr.len());
        Ok(stmts)
    }

    fn error(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl<'a> ast::Visitor for Visitor<'a> {
    fn visit_statement(&mut self, statement: &ast::Statement) {
        if self.error.is_some() {
            return;
        }
        let (col, stmts) = match self.gen.statement(self.context, statement) {
            Ok(item) => item,
            Err(e) => return self.error(e),
        };
        if let Some(error) = self.gen.stmt.push((col.clone(), stmts)).err() {
            self.error(error.in_column(&col))
        }
    }
    fn visit_ident(&mut self, ident: &Ident) {
        if self.error.is_some() {
            return;
        }
        if Function::builtin_and_arity(ident.as_str()).is_none() {
            self.context.vars.resolve(ident.as_str());
        }
    }
    fn visit_variable(&mut self, var: &ast::Variable) {
        if self.error.is_some() {
            return;
        }
        let var_item = match self.gen.variable(var) {
            Ok(var_item) => var_item,
            Err(e) => return self.error(e),
        };
        let col = var_item.col.clone();
        if let Some(error) = self.gen.var.push(var_item).err() {
            self.error(error.in_column(&col))
        }
    }
    fn visit_expression(&mut self, expression: &ast::Expression) {
        if self.error.is_some() {
            return;
        }
        let (col, expr) = match self.gen.expression(expression) {
            Ok(item) => item,
            Err(e) => return self.error(e),
        };
        if let Some(error) = self.gen.expr.push((col.clone(), expr)).err() {
            self.error(error.in_column(&col))
        }
    }
}

#[derive(Clone, Debug)]
struct VarItem {
    col: Column,
    ident: Ident,
    args: Option<Vec<Expr>>,
}

impl VarItem {
    fn new(col: Column, ident: Ident, args: Option<Vec<Expr>>) -> VarItem {
        VarItem { col, ident, args }
    }

    fn name(&self) -> Rc<str> {
        canonical(self.ident.as_str())
    }

    fn test_for_built_in(&self) -> Result<()> {
        match Function::builtin_and_arity(self.ident.as_str()) {
            Some(_) => Err(error!(SyntaxError, ..&self.col; "RESERVED FOR BUILT-IN")),
            None => Ok(()),
        }
    }

    fn into_dim(self) -> Result<Stmt> {
        self.test_for_built_in()?;
        let name = self.name();
        let is_string = self.ident.is_string();
        match self.args {
            Some(args) if !args.is_empty() => Ok(Stmt::Dim(name, args, is_string)),
            _ => Err(error!(SyntaxError, ..&self.col; "NOT AN ARRAY")),
        }
    }

    fn into_scalar(self) -> Result<Rc<str>> {
        self.test_for_built_in()?;
        debug_assert!(self.args.is_none());
        Ok(self.name())
    }

    fn into_target(self) -> Result<Target> {
        self.test_for_built_in()?;
        let name = self.name();
        match self.args {
            None => Ok(Target::Var(name)),
            Some(args) if args.is_empty() => {
                Err(error!(SyntaxError, ..&self.col; "MISSING INDEX EXPRESSION"))
            }
            Some(args) => Ok(Target::Index(name, args)),
        }
    }

    fn into_expression(self) -> Result<Expr> {
        if let Some((builtin, arity)) = Function::builtin_and_arity(self.ident.as_str()) {
            let args = self.args.unwrap_or_default();
            if arity.contains(&args.len()) {
                return Ok(Expr::Call(builtin, args));
            }
            return Err(error!(IllegalFunctionCall, ..&self.col; "WRONG NUMBER OF ARGUMENTS"));
        }
        let name = self.name();
        match self.args {
            None => Ok(Expr::Var(name)),
            Some(args) if args.is_empty() => {
                Err(error!(SyntaxError, ..&self.col; "MISSING INDEX EXPRESSION"))
            }
            Some(args) => Ok(Expr::Index(name, args)),
        }
    }
}

/// Decimal literal text the script accepts: no leading zeros.
fn decimal_text(s: &str) -> Rc<str> {
    let t = s.trim_start_matches('0');
    if t.is_empty() || t.starts_with('.') || t.starts_with(&['e', 'E'][..]) {
        format!("0{}", t).into()
    } else {
        t.into()
    }
}

struct Generator {
    var: Stack<VarItem>,
    expr: Stack<(Column, Expr)>,
    stmt: Stack<(Column, Vec<Stmt>)>,
}

impl Generator {
    fn new() -> Generator {
        Generator {
            var: Stack::new("VARIABLE OVERFLOW"),
            expr: Stack::new("EXPRESSION OVERFLOW"),
            stmt: Stack::new("STATEMENT OVERFLOW"),
        }
    }

    fn variable(&mut self, var: &ast::Variable) -> Result<VarItem> {
        use ast::Variable;
        match var {
            Variable::Unary(col, ident) => Ok(VarItem::new(col.clone(), ident.clone(), None)),
            Variable::Array(col, ident, vec_expr) => {
                let args = self
                    .expr
                    .pop_n(vec_expr.len())?
                    .into_iter()
                    .map(|(_col, expr)| expr)
                    .collect();
                Ok(VarItem::new(col.clone(), ident.clone(), Some(args)))
            }
        }
    }

    fn expression(&mut self, expr: &ast::Expression) -> Result<(Column, Expr)> {
        fn unary_expression(
            this: &mut Generator,
            col: &Column,
            f: fn(Box<Expr>) -> Expr,
        ) -> Result<(Column, Expr)> {
            let (expr_col, expr) = this.expr.pop()?;
            Ok((col.start..expr_col.end, f(Box::new(expr))))
        }
        fn binary_expression(this: &mut Generator, op: BinOp) -> Result<(Column, Expr)> {
            let ((col_lhs, lhs), (col_rhs, rhs)) = this.expr.pop_2()?;
            let expr = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
            Ok((col_lhs.start..col_rhs.end, expr))
        }
        fn compare_expression(this: &mut Generator, op: CmpOp) -> Result<(Column, Expr)> {
            let ((col_lhs, lhs), (col_rhs, rhs)) = this.expr.pop_2()?;
            let expr = Expr::Compare(op, Box::new(lhs), Box::new(rhs));
            Ok((col_lhs.start..col_rhs.end, expr))
        }
        fn radix_literal(col: &Column, digits: &str, radix: u32) -> Result<(Column, Expr)> {
            let prefix = if radix == 16 { "0x" } else { "0b" };
            match radix_to_number(digits, radix) {
                Some(n) => Ok((col.clone(), Expr::Num(format!("{}{}", prefix, digits).into(), n))),
                None => Err(error!(SyntaxError, ..col; "INVALID NUMBER")),
            }
        }
        use ast::Expression;
        match expr {
            Expression::Number(col, s) => match s.parse::<f64>() {
                Ok(n) => Ok((col.clone(), Expr::Num(decimal_text(s), n))),
                Err(_) => Err(error!(SyntaxError, ..col; "INVALID NUMBER")),
            },
            Expression::Hex(col, s) => radix_literal(col, s, 16),
            Expression::Binary(col, s) => radix_literal(col, s, 2),
            Expression::String(col, s) => Ok((col.clone(), Expr::Str(s.clone()))),
            Expression::Variable(_) => {
                let var = self.var.pop()?;
                let col = var.col.clone();
                Ok((col, var.into_expression()?))
            }
            Expression::Negation(col, ..) => unary_expression(self, col, Expr::Neg),
            Expression::Not(col, ..) => unary_expression(self, col, Expr::Not),
            Expression::Power(..) => {
                let ((col_lhs, lhs), (col_rhs, rhs)) = self.expr.pop_2()?;
                let expr = Expr::Pow(Box::new(lhs), Box::new(rhs));
                Ok((col_lhs.start..col_rhs.end, expr))
            }
            Expression::Multiply(..) => binary_expression(self, BinOp::Mul),
            Expression::Divide(..) => binary_expression(self, BinOp::Div),
            Expression::DivideInt(..) => binary_expression(self, BinOp::IntDiv),
            Expression::Modulo(..) => binary_expression(self, BinOp::Mod),
            Expression::Add(..) => binary_expression(self, BinOp::Add),
            Expression::Subtract(..) => binary_expression(self, BinOp::Sub),
            Expression::Equal(..) => compare_expression(self, CmpOp::Eq),
            Expression::NotEqual(..) => compare_expression(self, CmpOp::Ne),
            Expression::Less(..) => compare_expression(self, CmpOp::Lt),
            Expression::LessEqual(..) => compare_expression(self, CmpOp::Le),
            Expression::Greater(..) => compare_expression(self, CmpOp::Gt),
            Expression::GreaterEqual(..) => compare_expression(self, CmpOp::Ge),
            Expression::And(..) => binary_expression(self, BinOp::And),
            Expression::Or(..) => binary_expression(self, BinOp::Or),
            Expression::Xor(..) => binary_expression(self, BinOp::Xor),
        }
    }

    fn statement(
        &mut self,
        ctx: &mut Context,
        statement: &ast::Statement,
    ) -> Result<(Column, Vec<Stmt>)> {
        use ast::Statement;
        match statement {
            Statement::Cls(col) => Ok((col.clone(), vec![Stmt::Cls])),
            Statement::Data(col, v) => self.r#data(ctx, col, v.len()),
            Statement::Dim(col, v) => self.r#dim(col, v.len()),
            Statement::End(col) => Ok((col.clone(), vec![Stmt::End])),
            Statement::For(col, ..) => self.r#for(col),
            Statement::Gosub(col, label) => self.r#gosub(ctx, col, label),
            Statement::If(col, _, th, el) => self.r#if(col, th.len(), el.len()),
            Statement::Let(col, ..) => self.r#let(col),
            Statement::Next(col, v) => self.r#next(col, v.len()),
            Statement::OnGosub(col, _, labels) => self.r#on(ctx, col, labels),
            Statement::Print(col, v, linefeed) => self.r#print(col, v.len(), *linefeed),
            Statement::Read(col, v) => self.r#read(col, v.len()),
            Statement::Rem(col, text) => Ok((col.clone(), vec![Stmt::Rem(text.clone())])),
            Statement::Restore(col, label) => self.r#restore(ctx, col, label.as_ref()),
            Statement::Return(col) => Ok((col.clone(), vec![Stmt::Return])),
            Statement::Stop(col) => Ok((col.clone(), vec![Stmt::Stop])),
            Statement::Wend(col) => Ok((col.clone(), vec![Stmt::Wend])),
            Statement::While(col, ..) => self.r#while(col),
        }
    }

    fn r#data(&mut self, ctx: &mut Context, col: &Column, len: usize) -> Result<(Column, Vec<Stmt>)> {
        let mut values: Vec<DataValue> = vec![];
        for (expr_col, expr) in self.expr.pop_n(len)? {
            let value = match expr {
                Expr::Str(s) => DataValue::String(s),
                Expr::Num(text, n) => DataValue::Number(text, n),
                Expr::Neg(inner) => match *inner {
                    Expr::Num(text, n) => DataValue::Number(format!("-{}", text).into(), -n),
                    _ => return Err(error!(SyntaxError, ..&expr_col; "EXPECTED LITERAL")),
                },
                _ => return Err(error!(SyntaxError, ..&expr_col; "EXPECTED LITERAL")),
            };
            values.push(value);
        }
        ctx.data.data(&mut ctx.link, values);
        Ok((col.clone(), vec![]))
    }

    fn r#dim(&mut self, col: &Column, len: usize) -> Result<(Column, Vec<Stmt>)> {
        let mut col = col.clone();
        let mut stmts: Vec<Stmt> = vec![];
        for var in self.var.pop_n(len)? {
            col.end = var.col.end;
            stmts.push(var.into_dim()?);
        }
        Ok((col, stmts))
    }

    fn r#for(&mut self, col: &Column) -> Result<(Column, Vec<Stmt>)> {
        let (step_col, step) = self.expr.pop()?;
        let (_to_col, end) = self.expr.pop()?;
        let (_from_col, start) = self.expr.pop()?;
        let var = self.var.pop()?.into_scalar()?;
        let dir = match step.constant() {
            Some(s) if s >= 0.0 => Direction::Up,
            Some(_) => Direction::Down,
            None => Direction::Dynamic,
        };
        let stmt = Stmt::For {
            var,
            start,
            end,
            step,
            dir,
        };
        Ok((col.start..step_col.end, vec![stmt]))
    }

    fn r#gosub(
        &mut self,
        ctx: &mut Context,
        col: &Column,
        label: &Rc<str>,
    ) -> Result<(Column, Vec<Stmt>)> {
        ctx.link.gosub_reference(label);
        Ok((col.clone(), vec![Stmt::Gosub(label.clone())]))
    }

    fn r#if(
        &mut self,
        col: &Column,
        then_len: usize,
        else_len: usize,
    ) -> Result<(Column, Vec<Stmt>)> {
        let elses = self.stmt.pop_n(else_len)?;
        let thens = self.stmt.pop_n(then_len)?;
        let (_predicate_col, predicate) = self.expr.pop()?;
        let flatten = |v: Vec<(Column, Vec<Stmt>)>| -> Vec<Stmt> {
            v.into_iter().flat_map(|(_col, stmts)| stmts).collect()
        };
        let otherwise = if else_len == 0 {
            None
        } else {
            Some(flatten(elses))
        };
        let stmt = Stmt::If(predicate, flatten(thens), otherwise);
        Ok((col.clone(), vec![stmt]))
    }

    fn r#let(&mut self, col: &Column) -> Result<(Column, Vec<Stmt>)> {
        let (expr_col, expr) = self.expr.pop()?;
        let target = self.var.pop()?.into_target()?;
        Ok((col.start..expr_col.end, vec![Stmt::Assign(target, expr)]))
    }

    fn r#next(&mut self, col: &Column, len: usize) -> Result<(Column, Vec<Stmt>)> {
        for var in self.var.pop_n(len)? {
            var.test_for_built_in()?;
        }
        Ok((col.clone(), vec![Stmt::Next(len.max(1))]))
    }

    fn r#on(
        &mut self,
        ctx: &mut Context,
        col: &Column,
        labels: &[Rc<str>],
    ) -> Result<(Column, Vec<Stmt>)> {
        let (_expr_col, index) = self.expr.pop()?;
        for label in labels {
            ctx.link.gosub_reference(label);
        }
        Ok((col.clone(), vec![Stmt::OnGosub(index, labels.to_vec())]))
    }

    fn r#print(&mut self, col: &Column, len: usize, linefeed: bool) -> Result<(Column, Vec<Stmt>)> {
        let mut args: Vec<Expr> = self
            .expr
            .pop_n(len)?
            .into_iter()
            .map(|(_col, expr)| expr)
            .collect();
        if linefeed {
            let newline = Expr::Str("\n".into());
            match args.pop() {
                Some(last) => args.push(Expr::Binary(BinOp::Add, Box::new(last), Box::new(newline))),
                None => args.push(newline),
            }
        }
        Ok((col.clone(), vec![Stmt::Print(args)]))
    }

    fn r#read(&mut self, col: &Column, len: usize) -> Result<(Column, Vec<Stmt>)> {
        let mut stmts: Vec<Stmt> = vec![];
        for var in self.var.pop_n(len)? {
            stmts.push(Stmt::Read(var.into_target()?));
        }
        Ok((col.clone(), stmts))
    }

    fn r#restore(
        &mut self,
        ctx: &mut Context,
        col: &Column,
        label: Option<&Rc<str>>,
    ) -> Result<(Column, Vec<Stmt>)> {
        ctx.data.restore(label);
        let label = label.cloned().unwrap_or_else(|| "0".into());
        Ok((col.clone(), vec![Stmt::Restore(label)]))
    }

    fn r#while(&mut self, col: &Column) -> Result<(Column, Vec<Stmt>)> {
        let (sub_col, expr) = self.expr.pop()?;
        Ok((col.start..sub_col.end, vec![Stmt::While(expr)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_text() {
        assert_eq!(&*decimal_text("007"), "7");
        assert_eq!(&*decimal_text("0"), "0");
        assert_eq!(&*decimal_text("000.25"), "0.25");
        assert_eq!(&*decimal_text(".5"), "0.5");
        assert_eq!(&*decimal_text("1e3"), "1e3");
    }
}
