use super::token::*;
use std::rc::Rc;

/// Splits a physical line into its optional label and the token stream
/// that follows it.
pub fn lex(s: &str) -> (Option<Rc<str>>, Vec<Token>) {
    BasicLexer::lex(s)
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: char) -> bool {
    c.is_ascii_alphabetic()
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;

    fn whitespace(&mut self) -> Option<Token> {
        let mut len = 0;
        loop {
            self.chars().next();
            len += 1;
            if let Some(pk) = self.chars().peek() {
                if is_basic_whitespace(*pk) {
                    continue;
                }
            }
            return Some(Token::Whitespace(len));
        }
    }

    fn number(&mut self) -> Option<Token> {
        let mut s = String::new();
        let mut decimal = false;
        while let Some(&pk) = self.chars().peek() {
            if is_basic_digit(pk) {
                s.push(pk);
            } else if pk == '.' && !decimal {
                decimal = true;
                s.push(pk);
            } else {
                break;
            }
            self.chars().next();
        }
        if let Some(&pk) = self.chars().peek() {
            if pk == 'e' || pk == 'E' {
                let mut look = self.chars().clone();
                look.next();
                let mut exp = String::new();
                exp.push(pk);
                if let Some(&sign) = look.peek() {
                    if sign == '+' || sign == '-' {
                        exp.push(sign);
                        look.next();
                    }
                }
                if look.peek().map_or(false, |c| is_basic_digit(*c)) {
                    while let Some(&d) = look.peek() {
                        if !is_basic_digit(d) {
                            break;
                        }
                        exp.push(d);
                        look.next();
                    }
                    for _ in 0..exp.chars().count() {
                        self.chars().next();
                    }
                    s.push_str(&exp);
                }
            }
        }
        Some(Token::Literal(Literal::Number(s)))
    }

    fn radix(&mut self) -> Option<Token> {
        let mut s = String::new();
        s.push(self.chars().next()?);
        let binary = matches!(self.chars().peek(), Some('x') | Some('X'));
        if binary || matches!(self.chars().peek(), Some('h') | Some('H')) {
            s.push(self.chars().next()?);
        }
        let accept: fn(char) -> bool = if binary {
            |c| c == '0' || c == '1'
        } else {
            |c| c.is_ascii_hexdigit()
        };
        match self.digits(&mut s, accept) {
            Some(_) if binary => Some(Token::Literal(Literal::Binary(s))),
            Some(_) => Some(Token::Literal(Literal::Hex(s))),
            None => Some(Token::Unknown(s)),
        }
    }

    fn digits(&mut self, s: &mut String, accept: fn(char) -> bool) -> Option<usize> {
        let mut len = 0;
        while let Some(&pk) = self.chars().peek() {
            if !accept(pk) {
                break;
            }
            s.push(pk);
            self.chars().next();
            len += 1;
        }
        if len == 0 {
            None
        } else {
            Some(len)
        }
    }

    fn string(&mut self) -> Option<Token> {
        let mut s = String::new();
        self.chars().next();
        loop {
            if let Some(ch) = self.chars().next() {
                if ch != '"' {
                    s.push(ch);
                    continue;
                }
            }
            return Some(Token::Literal(Literal::String(s)));
        }
    }

    fn alphabetic(&mut self) -> Option<Token> {
        let mut s = String::new();
        while let Some(&pk) = self.chars().peek() {
            if !is_basic_alphabetic(pk) && !is_basic_digit(pk) {
                break;
            }
            s.push(pk);
            self.chars().next();
        }
        if let Some('$') = self.chars().peek() {
            self.chars().next();
            s.push('$');
            return Some(Token::Ident(Ident::String(s)));
        }
        if let Some(token) = Token::from_string(&s) {
            return Some(token);
        }
        Some(Token::Ident(Ident::Plain(s)))
    }

    fn minutia(&mut self) -> Option<Token> {
        let ch = self.chars().next()?;
        let s = ch.to_string();
        match Token::from_string(&s) {
            Some(t) => Some(t),
            None => Some(Token::Unknown(s)),
        }
    }
}

struct BasicLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    remark: bool,
}

impl<'a> Tokenizers<'a> for BasicLexer<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }
}

impl<'a> Iterator for BasicLexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let pk = self.chars.peek()?;
        if self.remark {
            return Some(Token::Unknown(self.chars.by_ref().collect::<String>()));
        }
        if is_basic_whitespace(*pk) {
            return self.whitespace();
        }
        if is_basic_digit(*pk) || *pk == '.' {
            return self.number();
        }
        if *pk == '&' {
            return self.radix();
        }
        if is_basic_alphabetic(*pk) {
            let r = self.alphabetic();
            if let Some(Token::Word(Word::Rem1)) = r {
                self.remark = true;
            }
            return r;
        }
        if *pk == '"' {
            return self.string();
        }
        let minutia = self.minutia();
        if let Some(Token::Word(Word::Rem2)) = minutia {
            self.remark = true;
        }
        minutia
    }
}

impl<'a> BasicLexer<'a> {
    fn lex(s: &str) -> (Option<Rc<str>>, Vec<Token>) {
        let s = s.trim_end_matches(&['\n', '\r'][..]);
        let mut label = None;
        let mut rest = s.trim_start_matches(is_basic_whitespace);
        let digits = rest.chars().take_while(|c| is_basic_digit(*c)).count();
        if digits > 0 && !rest[digits..].starts_with('.') {
            label = Some(Rc::from(&rest[..digits]));
            rest = &rest[digits..];
            if let Some(' ') = rest.chars().next() {
                rest = &rest[1..];
            }
        }
        let mut tokens = BasicLexer {
            chars: rest.chars().peekable(),
            remark: false,
        }
        .collect();
        BasicLexer::trim_end(&mut tokens);
        BasicLexer::collapse_lt_gt_equal(&mut tokens);
        (label, tokens)
    }

    fn collapse_lt_gt_equal(tokens: &mut Vec<Token>) {
        let mut locs: Vec<(usize, Token)> = vec![];
        let mut tokens_iter = tokens.windows(2).enumerate();
        while let Some((index, tt)) = tokens_iter.next() {
            let collapsed = match (&tt[0], &tt[1]) {
                (Token::Operator(Operator::Less), Token::Operator(Operator::Equal))
                | (Token::Operator(Operator::Equal), Token::Operator(Operator::Less)) => {
                    Operator::LessEqual
                }
                (Token::Operator(Operator::Greater), Token::Operator(Operator::Equal))
                | (Token::Operator(Operator::Equal), Token::Operator(Operator::Greater)) => {
                    Operator::GreaterEqual
                }
                (Token::Operator(Operator::Less), Token::Operator(Operator::Greater)) => {
                    Operator::NotEqual
                }
                _ => continue,
            };
            locs.push((index, Token::Operator(collapsed)));
            tokens_iter.next();
        }
        while let Some((index, token)) = locs.pop() {
            tokens.splice(index..index + 2, Some(token));
        }
    }

    fn trim_end(tokens: &mut Vec<Token>) {
        if let Some(Token::Whitespace(_)) = tokens.last() {
            tokens.pop();
        }
        if let Some(Token::Unknown(_)) = tokens.last() {
            if let Some(Token::Unknown(s)) = tokens.pop() {
                tokens.push(Token::Unknown(s.trim_end().to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_split() {
        let (label, tokens) = lex("100 cls");
        assert_eq!(label.as_deref(), Some("100"));
        assert_eq!(tokens, vec![Token::Word(Word::Cls)]);
    }

    #[test]
    fn test_unlabelled() {
        let (label, tokens) = lex("print 1.5e3");
        assert_eq!(label, None);
        assert_eq!(
            tokens,
            vec![
                Token::Word(Word::Print1),
                Token::Whitespace(1),
                Token::Literal(Literal::Number("1.5e3".into())),
            ]
        );
    }

    #[test]
    fn test_exponent_needs_digits() {
        let (_, tokens) = lex("1 else");
        assert_eq!(tokens, vec![Token::Word(Word::Else)]);
        let (_, tokens) = lex("a=1e");
        assert_eq!(tokens[2], Token::Literal(Literal::Number("1".into())));
        assert_eq!(tokens[3], Token::Ident(Ident::Plain("e".into())));
    }

    #[test]
    fn test_radix_literals() {
        let (_, tokens) = lex("a=&ff+&x101+&H1");
        assert_eq!(tokens[2], Token::Literal(Literal::Hex("&ff".into())));
        assert_eq!(tokens[4], Token::Literal(Literal::Binary("&x101".into())));
        assert_eq!(tokens[6], Token::Literal(Literal::Hex("&H1".into())));
    }

    #[test]
    fn test_keywords_need_boundary() {
        let (_, tokens) = lex("printer=1");
        assert_eq!(tokens[0], Token::Ident(Ident::Plain("printer".into())));
        let (_, tokens) = lex("a$=chr$(65)");
        assert_eq!(tokens[0], Token::Ident(Ident::String("a$".into())));
        assert_eq!(tokens[2], Token::Ident(Ident::String("chr$".into())));
    }

    #[test]
    fn test_remark_keeps_text() {
        let (_, tokens) = lex("10 cls ' clear it  ");
        assert_eq!(
            tokens,
            vec![
                Token::Word(Word::Cls),
                Token::Whitespace(1),
                Token::Word(Word::Rem2),
                Token::Unknown(" clear it".into()),
            ]
        );
    }

    #[test]
    fn test_collapse() {
        let (_, tokens) = lex("a<=b<>c=>d");
        assert_eq!(tokens[1], Token::Operator(Operator::LessEqual));
        assert_eq!(tokens[3], Token::Operator(Operator::NotEqual));
        assert_eq!(tokens[5], Token::Operator(Operator::GreaterEqual));
    }

    #[test]
    fn test_crlf() {
        let (label, tokens) = lex("20 end\r\n");
        assert_eq!(label.as_deref(), Some("20"));
        assert_eq!(tokens, vec![Token::Word(Word::End)]);
    }
}
