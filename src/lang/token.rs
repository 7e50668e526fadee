pub use super::ident::Ident;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Whitespace(usize),
    Literal(Literal),
    Word(Word),
    Operator(Operator),
    Ident(Ident),
    LParen,
    RParen,
    Comma,
    Colon,
    Semicolon,
}

impl Token {
    /// Keywords, word operators and punctuation. Lookup is case insensitive.
    pub fn from_string(s: &str) -> Option<Token> {
        use Operator::*;
        use Word::*;
        let token = match s.to_ascii_uppercase().as_str() {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "," => Token::Comma,
            ":" => Token::Colon,
            ";" => Token::Semicolon,
            "CLS" => Token::Word(Cls),
            "DATA" => Token::Word(Data),
            "DIM" => Token::Word(Dim),
            "ELSE" => Token::Word(Else),
            "END" => Token::Word(End),
            "FOR" => Token::Word(For),
            "GOSUB" => Token::Word(Gosub),
            "IF" => Token::Word(If),
            "LET" => Token::Word(Let),
            "NEXT" => Token::Word(Next),
            "ON" => Token::Word(On),
            "PRINT" => Token::Word(Print1),
            "?" => Token::Word(Print2),
            "READ" => Token::Word(Read),
            "REM" => Token::Word(Rem1),
            "'" => Token::Word(Rem2),
            "RESTORE" => Token::Word(Restore),
            "RETURN" => Token::Word(Return),
            "STEP" => Token::Word(Step),
            "STOP" => Token::Word(Stop),
            "THEN" => Token::Word(Then),
            "TO" => Token::Word(To),
            "WEND" => Token::Word(Wend),
            "WHILE" => Token::Word(While),
            "^" => Token::Operator(Caret),
            "*" => Token::Operator(Multiply),
            "/" => Token::Operator(Divide),
            "\\" => Token::Operator(DivideInt),
            "MOD" => Token::Operator(Modulo),
            "+" => Token::Operator(Plus),
            "-" => Token::Operator(Minus),
            "=" => Token::Operator(Equal),
            "<>" => Token::Operator(NotEqual),
            "<" => Token::Operator(Less),
            "<=" => Token::Operator(LessEqual),
            ">" => Token::Operator(Greater),
            ">=" => Token::Operator(GreaterEqual),
            "NOT" => Token::Operator(Not),
            "AND" => Token::Operator(And),
            "OR" => Token::Operator(Or),
            "XOR" => Token::Operator(Xor),
            _ => return None,
        };
        Some(token)
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Whitespace(u) => write!(f, "{s:>w$}", s = "", w = u),
            Literal(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            Semicolon => write!(f, ";"),
        }
    }
}

/// Numeric literals keep their source spelling, prefix included.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(String),
    Hex(String),
    Binary(String),
    String(String),
}

impl Literal {
    /// A plain run of digits can name a line.
    pub fn label(&self) -> Option<&str> {
        match self {
            Literal::Number(s) if s.chars().all(|c| c.is_ascii_digit()) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Number(s) => write!(f, "{}", s),
            Hex(s) => write!(f, "{}", s),
            Binary(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Word {
    Cls,
    Data,
    Dim,
    Else,
    End,
    For,
    Gosub,
    If,
    Let,
    Next,
    On,
    Print1,
    Print2,
    Read,
    Rem1,
    Rem2,
    Restore,
    Return,
    Step,
    Stop,
    Then,
    To,
    Wend,
    While,
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            Cls => write!(f, "CLS"),
            Data => write!(f, "DATA"),
            Dim => write!(f, "DIM"),
            Else => write!(f, "ELSE"),
            End => write!(f, "END"),
            For => write!(f, "FOR"),
            Gosub => write!(f, "GOSUB"),
            If => write!(f, "IF"),
            Let => write!(f, "LET"),
            Next => write!(f, "NEXT"),
            On => write!(f, "ON"),
            Print1 => write!(f, "PRINT"),
            Print2 => write!(f, "?"),
            Read => write!(f, "READ"),
            Rem1 => write!(f, "REM"),
            Rem2 => write!(f, "'"),
            Restore => write!(f, "RESTORE"),
            Return => write!(f, "RETURN"),
            Step => write!(f, "STEP"),
            Stop => write!(f, "STOP"),
            Then => write!(f, "THEN"),
            To => write!(f, "TO"),
            Wend => write!(f, "WEND"),
            While => write!(f, "WHILE"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    DivideInt,
    Modulo,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
    Xor,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Caret => write!(f, "^"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            DivideInt => write!(f, "\\"),
            Modulo => write!(f, "MOD"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            Xor => write!(f, "XOR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let t = Token::from_string("rem");
        assert_eq!(t, Some(Token::Word(Word::Rem1)));
        let t = Token::from_string("Mod");
        assert_eq!(t, Some(Token::Operator(Operator::Modulo)));
        let t = Token::from_string("PICKLES");
        assert_eq!(t, None);
    }

    #[test]
    fn test_label() {
        assert_eq!(Literal::Number("100".into()).label(), Some("100"));
        assert_eq!(Literal::Number("1.5".into()).label(), None);
        assert_eq!(Literal::Hex("&FF".into()).label(), None);
    }
}
