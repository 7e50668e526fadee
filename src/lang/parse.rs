use super::{ast::*, token::*, Column, Error, LineNumber};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

pub fn parse(line_number: LineNumber, tokens: &[Token]) -> Result<Vec<Statement>> {
    match Parser::parse(tokens) {
        Err(e) => Err(e.in_line_number(line_number)),
        Ok(r) => Ok(r),
    }
}

struct Parser<'a> {
    token_stream: std::slice::Iter<'a, Token>,
    peeked: Option<&'a Token>,
    rem2: bool,
    col: Column,
}

impl<'a> Parser<'a> {
    fn parse(tokens: &'a [Token]) -> Result<Vec<Statement>> {
        let mut parse = Parser {
            token_stream: tokens.iter(),
            peeked: None,
            rem2: false,
            col: 0..0,
        };
        match parse.statements(false) {
            Ok(r) => Ok(r),
            Err(e) => Err(e.in_column(&parse.col)),
        }
    }

    fn column(&self) -> Column {
        self.col.clone()
    }

    fn next(&mut self) -> Option<&'a Token> {
        if self.peeked.is_some() {
            return self.peeked.take();
        }
        loop {
            self.col.start = self.col.end;
            let t = self.token_stream.next()?;
            self.col.end += t.to_string().chars().count();
            if self.rem2 {
                continue;
            }
            match t {
                Token::Word(Word::Rem2) => {
                    self.rem2 = true;
                    continue;
                }
                Token::Whitespace(_) => continue,
                _ => return Some(t),
            }
        }
    }

    fn peek(&mut self) -> Option<&'a Token> {
        if self.peeked.is_none() {
            self.peeked = self.next();
        }
        self.peeked
    }

    /// Colon separated statements up to the end of the line, or up to
    /// `ELSE` when inside an `IF`.
    fn statements(&mut self, in_if: bool) -> Result<Vec<Statement>> {
        let mut r: Vec<Statement> = vec![];
        loop {
            match self.peek() {
                None => return Ok(r),
                Some(Token::Colon) => {
                    self.next();
                    continue;
                }
                Some(Token::Word(Word::Else)) if in_if => return Ok(r),
                _ => {}
            }
            r.push(self.statement()?);
            match self.peek() {
                None | Some(Token::Colon) => {}
                Some(Token::Word(Word::Else)) if in_if => {}
                _ => return Err(error!(SyntaxError; "EXPECTED END OF STATEMENT")),
            }
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        match self.peek() {
            Some(Token::Ident(_)) => Statement::for_word(self, &Word::Let),
            Some(Token::Word(word)) => {
                self.next();
                Statement::for_word(self, word)
            }
            _ => Err(error!(SyntaxError; "EXPECTED STATEMENT")),
        }
    }

    fn expression(&mut self) -> Result<Expression> {
        self.binary(0)
    }

    fn binary(&mut self, precedence: usize) -> Result<Expression> {
        let mut lhs = self.primary()?;
        while let Some(Token::Operator(op)) = self.peek() {
            let (op_precedence, right_assoc) = match Expression::op_precedence(op) {
                Some(p) => p,
                None => break,
            };
            if op_precedence < precedence {
                break;
            }
            self.next();
            let column = self.column();
            let next_precedence = if right_assoc {
                op_precedence
            } else {
                op_precedence + 1
            };
            let rhs = self.binary(next_precedence)?;
            lhs = Expression::for_binary_op(column, op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Expression> {
        match self.next() {
            Some(Token::LParen) => {
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Operator(Operator::Minus)) => {
                let column = self.column();
                let expr = self.primary()?;
                Ok(Expression::Negation(column, Box::new(expr)))
            }
            Some(Token::Operator(Operator::Plus)) => self.primary(),
            Some(Token::Operator(Operator::Not)) => {
                let column = self.column();
                // NOT binds looser than comparisons but tighter than AND
                let expr = self.binary(Expression::COMPARISON)?;
                Ok(Expression::Not(column, Box::new(expr)))
            }
            Some(Token::Ident(ident)) => {
                let var = self.variable_for(ident)?;
                Ok(Expression::Variable(var))
            }
            Some(Token::Literal(lit)) => Ok(Expression::for_literal(self.column(), lit)),
            _ => Err(error!(SyntaxError; "EXPECTED EXPRESSION")),
        }
    }

    fn expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        if let Some(Token::RParen) = self.peek() {
            self.next();
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.next() {
                Some(Token::RParen) => return Ok(v),
                Some(Token::Comma) => continue,
                _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
            }
        }
    }

    fn printer_list(&mut self) -> Result<(Vec<Expression>, bool)> {
        let mut v: Vec<Expression> = vec![];
        let mut linefeed = true;
        loop {
            match self.peek() {
                None | Some(Token::Colon) | Some(Token::Word(Word::Else)) => {
                    return Ok((v, linefeed));
                }
                Some(Token::Semicolon) | Some(Token::Comma) => {
                    linefeed = false;
                    self.next();
                }
                _ => {
                    linefeed = true;
                    v.push(self.expression()?);
                }
            };
        }
    }

    fn ident(&mut self) -> Result<(Column, &'a Ident)> {
        match self.next() {
            Some(Token::Ident(ident)) => Ok((self.column(), ident)),
            _ => Err(error!(SyntaxError; "EXPECTED IDENTIFIER")),
        }
    }

    fn variable_for(&mut self, ident: &Ident) -> Result<Variable> {
        let column = self.column();
        if ident.is_reserved() {
            return Err(error!(SyntaxError; "RESERVED WORD"));
        }
        match self.peek() {
            Some(Token::LParen) => {
                let vec_expr = self.expression_list()?;
                Ok(Variable::Array(column, ident.clone(), vec_expr))
            }
            _ => Ok(Variable::Unary(column, ident.clone())),
        }
    }

    fn variable(&mut self) -> Result<Variable> {
        let (_, ident) = self.ident()?;
        self.variable_for(ident)
    }

    fn scalar(&mut self) -> Result<Variable> {
        let (column, ident) = self.ident()?;
        if ident.is_reserved() {
            return Err(error!(SyntaxError; "RESERVED WORD"));
        }
        Ok(Variable::Unary(column, ident.clone()))
    }

    fn label(&mut self) -> Result<Rc<str>> {
        if let Some(Token::Literal(lit)) = self.next() {
            if let Some(label) = lit.label() {
                return Ok(label.into());
            }
        }
        Err(error!(SyntaxError; "EXPECTED LINE LABEL"))
    }

    fn data_item(&mut self) -> Result<Expression> {
        let negate = match self.peek() {
            Some(Token::Operator(Operator::Minus)) => {
                self.next();
                Some(self.column())
            }
            Some(Token::Operator(Operator::Plus)) => {
                self.next();
                None
            }
            _ => None,
        };
        let expr = match self.next() {
            Some(Token::Literal(Literal::String(s))) if negate.is_none() => {
                Expression::String(self.column(), s.as_str().into())
            }
            Some(Token::Literal(lit)) if !matches!(lit, Literal::String(_)) => {
                Expression::for_literal(self.column(), lit)
            }
            _ => return Err(error!(SyntaxError; "EXPECTED LITERAL")),
        };
        match negate {
            Some(column) => Ok(Expression::Negation(column, Box::new(expr))),
            None => Ok(expr),
        }
    }

    fn maybe(&mut self, token: Token) -> bool {
        if self.peek() == Some(&token) {
            self.next();
            true
        } else {
            false
        }
    }

    fn at_end_of_statement(&mut self) -> bool {
        matches!(
            self.peek(),
            None | Some(Token::Colon) | Some(Token::Word(Word::Else))
        )
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if let Some(t) = self.next() {
            if *t == token {
                return Ok(());
            }
        }
        use Token::*;
        Err(error!(SyntaxError;
            match token {
                Unknown(_) | Whitespace(_) => {"UNEXPECTED TOKEN"}
                Literal(_) => {"EXPECTED LITERAL"}
                Word(_) => {"EXPECTED RESERVED WORD"}
                Operator(_) => {"EXPECTED OPERATOR"}
                Ident(_) => {"EXPECTED IDENTIFIER"}
                LParen => {"EXPECTED LEFT PARENTHESIS"}
                RParen => {"EXPECTED RIGHT PARENTHESIS"}
                Comma => {"EXPECTED COMMA"}
                Colon => {"EXPECTED COLON"}
                Semicolon => {"EXPECTED SEMICOLON"}
            }
        ))
    }
}

impl Expression {
    const COMPARISON: usize = 5;

    fn for_binary_op(col: Column, op: &Operator, lhs: Expression, rhs: Expression) -> Expression {
        use Operator::*;
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match op {
            Caret => Expression::Power(col, lhs, rhs),
            Multiply => Expression::Multiply(col, lhs, rhs),
            Divide => Expression::Divide(col, lhs, rhs),
            DivideInt => Expression::DivideInt(col, lhs, rhs),
            Modulo => Expression::Modulo(col, lhs, rhs),
            Plus => Expression::Add(col, lhs, rhs),
            Minus => Expression::Subtract(col, lhs, rhs),
            Equal => Expression::Equal(col, lhs, rhs),
            NotEqual => Expression::NotEqual(col, lhs, rhs),
            Less => Expression::Less(col, lhs, rhs),
            LessEqual => Expression::LessEqual(col, lhs, rhs),
            Greater => Expression::Greater(col, lhs, rhs),
            GreaterEqual => Expression::GreaterEqual(col, lhs, rhs),
            And => Expression::And(col, lhs, rhs),
            Or => Expression::Or(col, lhs, rhs),
            Xor => Expression::Xor(col, lhs, rhs),
            Not => unreachable!(),
        }
    }

    /// Binding power and right associativity of binary operators.
    fn op_precedence(op: &Operator) -> Option<(usize, bool)> {
        use Operator::*;
        Some(match op {
            Xor => (1, false),
            Or => (2, false),
            And => (3, false),
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
                (Expression::COMPARISON, false)
            }
            Plus | Minus => (6, false),
            Modulo => (7, false),
            DivideInt => (8, false),
            Multiply | Divide => (9, false),
            Caret => (10, true),
            Not => return None,
        })
    }

    fn for_literal(col: Column, lit: &Literal) -> Expression {
        fn digits(s: &str) -> Rc<str> {
            let s = s.trim_start_matches('&');
            match s.chars().next() {
                Some('h') | Some('H') | Some('x') | Some('X') => s[1..].into(),
                _ => s.into(),
            }
        }
        match lit {
            Literal::Number(s) => Expression::Number(col, s.as_str().into()),
            Literal::Hex(s) => Expression::Hex(col, digits(s)),
            Literal::Binary(s) => Expression::Binary(col, digits(s)),
            Literal::String(s) => Expression::String(col, s.as_str().into()),
        }
    }
}

impl Statement {
    fn for_word(parse: &mut Parser, word: &Word) -> Result<Statement> {
        let column = parse.column();
        use Word::*;
        match word {
            Cls => Ok(Statement::Cls(column)),
            Data => Self::r#data(parse, column),
            Dim => Self::r#dim(parse, column),
            End => Ok(Statement::End(column)),
            For => Self::r#for(parse, column),
            Gosub => Ok(Statement::Gosub(column, parse.label()?)),
            If => Self::r#if(parse, column),
            Let => Self::r#let(parse, column),
            Next => Self::r#next(parse, column),
            On => Self::r#on(parse, column),
            Print1 | Print2 => Self::r#print(parse, column),
            Read => Self::r#read(parse, column),
            Rem1 => Self::r#rem(parse, column),
            Restore => Self::r#restore(parse, column),
            Return => Ok(Statement::Return(column)),
            Stop => Ok(Statement::Stop(column)),
            Wend => Ok(Statement::Wend(column)),
            While => Ok(Statement::While(column, parse.expression()?)),
            Else | Rem2 | Step | Then | To => Err(error!(SyntaxError; "EXPECTED STATEMENT")),
        }
    }

    fn r#data(parse: &mut Parser, column: Column) -> Result<Statement> {
        let mut v = vec![parse.data_item()?];
        while parse.maybe(Token::Comma) {
            v.push(parse.data_item()?);
        }
        Ok(Statement::Data(column, v))
    }

    fn r#dim(parse: &mut Parser, column: Column) -> Result<Statement> {
        let mut v: Vec<Variable> = vec![];
        loop {
            match parse.variable()? {
                var @ Variable::Array(..) => v.push(var),
                Variable::Unary(..) => {
                    return Err(error!(SyntaxError; "EXPECTED LEFT PARENTHESIS"));
                }
            }
            if !parse.maybe(Token::Comma) {
                return Ok(Statement::Dim(column, v));
            }
        }
    }

    fn r#for(parse: &mut Parser, column: Column) -> Result<Statement> {
        let var = parse.scalar()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        let from = parse.expression()?;
        parse.expect(Token::Word(Word::To))?;
        let to = parse.expression()?;
        let step = if parse.maybe(Token::Word(Word::Step)) {
            parse.expression()?
        } else {
            let end = parse.column().start;
            Expression::Number(end..end, "1".into())
        };
        Ok(Statement::For(column, var, from, to, step))
    }

    fn r#if(parse: &mut Parser, column: Column) -> Result<Statement> {
        let predicate = parse.expression()?;
        parse.expect(Token::Word(Word::Then))?;
        let then_stmts = parse.statements(true)?;
        if then_stmts.is_empty() {
            return Err(error!(SyntaxError; "EXPECTED STATEMENT"));
        }
        let mut else_stmts: Vec<Statement> = vec![];
        if parse.maybe(Token::Word(Word::Else)) {
            else_stmts = parse.statements(true)?;
            if else_stmts.is_empty() {
                return Err(error!(SyntaxError; "EXPECTED STATEMENT"));
            }
        }
        Ok(Statement::If(column, predicate, then_stmts, else_stmts))
    }

    fn r#let(parse: &mut Parser, column: Column) -> Result<Statement> {
        let var = parse.variable()?;
        parse.expect(Token::Operator(Operator::Equal))?;
        let expr = parse.expression()?;
        Ok(Statement::Let(column, var, expr))
    }

    fn r#next(parse: &mut Parser, column: Column) -> Result<Statement> {
        let mut v: Vec<Variable> = vec![];
        if parse.at_end_of_statement() {
            return Ok(Statement::Next(column, v));
        }
        loop {
            v.push(parse.scalar()?);
            if !parse.maybe(Token::Comma) {
                return Ok(Statement::Next(column, v));
            }
        }
    }

    fn r#on(parse: &mut Parser, column: Column) -> Result<Statement> {
        let expr = parse.expression()?;
        parse.expect(Token::Word(Word::Gosub))?;
        let mut labels = vec![parse.label()?];
        while parse.maybe(Token::Comma) {
            labels.push(parse.label()?);
        }
        Ok(Statement::OnGosub(column, expr, labels))
    }

    fn r#print(parse: &mut Parser, column: Column) -> Result<Statement> {
        let (v, linefeed) = parse.printer_list()?;
        Ok(Statement::Print(column, v, linefeed))
    }

    fn r#read(parse: &mut Parser, column: Column) -> Result<Statement> {
        let mut v = vec![parse.variable()?];
        while parse.maybe(Token::Comma) {
            v.push(parse.variable()?);
        }
        Ok(Statement::Read(column, v))
    }

    fn r#rem(parse: &mut Parser, column: Column) -> Result<Statement> {
        let text = match parse.peek() {
            Some(Token::Unknown(s)) => {
                parse.next();
                s.trim_start()
            }
            _ => "",
        };
        Ok(Statement::Rem(column, text.into()))
    }

    fn r#restore(parse: &mut Parser, column: Column) -> Result<Statement> {
        if parse.at_end_of_statement() {
            return Ok(Statement::Restore(column, None));
        }
        Ok(Statement::Restore(column, Some(parse.label()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex::*;
    use super::*;

    fn parse_str(s: &str) -> Statement {
        let (_, tokens) = lex(s);
        match parse(None, &tokens) {
            Ok(mut v) => {
                if v.len() != 1 {
                    panic!();
                }
                v.pop().unwrap()
            }
            Err(e) => panic!("{} : {:?}", e, e),
        }
    }

    fn plain(col: Column, s: &str) -> Variable {
        Variable::Unary(col, Ident::Plain(s.to_string()))
    }

    #[test]
    fn test_let_foo_eq_bar() {
        let answer = Statement::Let(
            0..3,
            plain(4..7, "ter"),
            Expression::Variable(plain(8..11, "bar")),
        );
        assert_eq!(parse_str("let ter=bar:"), answer);
        let answer = Statement::Let(
            0..3,
            plain(0..3, "ter"),
            Expression::Variable(plain(4..7, "bar")),
        );
        assert_eq!(parse_str("ter=bar:"), answer);
    }

    #[test]
    fn test_precedence_and_paren() {
        let answer = Statement::Let(
            0..1,
            plain(0..1, "a"),
            Expression::Subtract(
                4..5,
                Box::new(Expression::Number(3..4, "2".into())),
                Box::new(Expression::Multiply(
                    18..19,
                    Box::new(Expression::Add(
                        7..8,
                        Box::new(Expression::Number(6..7, "3".into())),
                        Box::new(Expression::Variable(Variable::Array(
                            8..11,
                            Ident::Plain("cos".into()),
                            vec![Expression::Number(12..16, "3.14".into())],
                        ))),
                    )),
                    Box::new(Expression::Number(19..20, "4".into())),
                )),
            ),
        );
        assert_eq!(parse_str("a=(2-(3+cos(3.14))*4)"), answer);
    }

    #[test]
    fn test_power_is_right_associative() {
        let answer = Statement::Let(
            0..1,
            plain(0..1, "a"),
            Expression::Power(
                3..4,
                Box::new(Expression::Number(2..3, "2".into())),
                Box::new(Expression::Power(
                    5..6,
                    Box::new(Expression::Number(4..5, "3".into())),
                    Box::new(Expression::Number(6..7, "2".into())),
                )),
            ),
        );
        assert_eq!(parse_str("a=2^3^2"), answer);
    }

    #[test]
    fn test_unary_minus_binds_tightest() {
        let answer = Statement::Let(
            0..1,
            plain(0..1, "a"),
            Expression::Power(
                4..5,
                Box::new(Expression::Negation(
                    2..3,
                    Box::new(Expression::Number(3..4, "2".into())),
                )),
                Box::new(Expression::Number(5..6, "2".into())),
            ),
        );
        assert_eq!(parse_str("a=-2^2"), answer);
    }

    #[test]
    fn test_not_covers_comparison() {
        let answer = Statement::Let(
            0..1,
            plain(0..1, "a"),
            Expression::And(
                12..15,
                Box::new(Expression::Not(
                    2..5,
                    Box::new(Expression::Equal(
                        7..8,
                        Box::new(Expression::Variable(plain(6..7, "b"))),
                        Box::new(Expression::Number(8..9, "1".into())),
                    )),
                )),
                Box::new(Expression::Variable(plain(16..17, "c"))),
            ),
        );
        assert_eq!(parse_str("a=not b=1   and c"), answer);
    }

    #[test]
    fn test_printer_list() {
        let (_, tokens) = lex("? 1 2,3;:print");
        assert_eq!(
            parse(None, &tokens).unwrap(),
            vec!(
                Statement::Print(
                    0..1,
                    vec!(
                        Expression::Number(2..3, "1".into()),
                        Expression::Number(4..5, "2".into()),
                        Expression::Number(6..7, "3".into()),
                    ),
                    false
                ),
                Statement::Print(9..14, vec!(), true),
            )
        );
    }

    #[test]
    fn test_if_then_else() {
        let (_, tokens) = lex("if a then b=1:c=2 else end");
        let stmts = parse(None, &tokens).unwrap();
        match &stmts[0] {
            Statement::If(_, _, th, el) => {
                assert_eq!(th.len(), 2);
                assert_eq!(el, &vec![Statement::End(23..26)]);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_for_default_step() {
        match parse_str("for i=1 to 9") {
            Statement::For(_, var, _, _, Expression::Number(_, step)) => {
                assert_eq!(var, plain(4..5, "i"));
                assert_eq!(&*step, "1");
            }
            s => panic!("{:?}", s),
        }
    }

    #[test]
    fn test_hex_digits() {
        assert_eq!(
            parse_str("a=&hff"),
            Statement::Let(0..1, plain(0..1, "a"), Expression::Hex(2..6, "ff".into()))
        );
    }

    #[test]
    fn test_data_items() {
        assert_eq!(
            parse_str("data 1,-2,\"x\""),
            Statement::Data(
                0..4,
                vec![
                    Expression::Number(5..6, "1".into()),
                    Expression::Negation(
                        7..8,
                        Box::new(Expression::Number(8..9, "2".into()))
                    ),
                    Expression::String(10..13, "x".into()),
                ]
            )
        );
    }

    #[test]
    fn test_errors() {
        let (_, tokens) = lex("print 1 +");
        let e = parse(Some(4), &tokens).unwrap_err();
        assert_eq!(e.to_string(), "SYNTAX ERROR IN 4 (9..9); EXPECTED EXPRESSION");
        let (_, tokens) = lex("mode = 1");
        assert!(parse(None, &tokens).is_err());
        let (_, tokens) = lex("dim a");
        assert!(parse(None, &tokens).is_err());
        let (_, tokens) = lex("else");
        assert!(parse(None, &tokens).is_err());
    }
}
