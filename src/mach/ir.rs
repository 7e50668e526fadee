use super::function::Builtin;
use std::fmt;
use std::rc::Rc;

/// ## Translated program fragments
///
/// Statements and expressions in the shape of the generated script. Text
/// is produced by `Display`, which adds only the parentheses the script's
/// operator precedence requires.

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Script literal text and its value.
    Num(Rc<str>, f64),
    Str(Rc<str>),
    Var(Rc<str>),
    Index(Rc<str>, Vec<Expr>),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Compare(CmpOp, Box<Expr>, Box<Expr>),
    Call(Builtin, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Var(Rc<str>),
    Index(Rc<str>, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(Target, Expr),
    Cls,
    Dim(Rc<str>, Vec<Expr>, bool),
    End,
    For {
        var: Rc<str>,
        start: Expr,
        end: Expr,
        step: Expr,
        dir: Direction,
    },
    Gosub(Rc<str>),
    If(Expr, Vec<Stmt>, Option<Vec<Stmt>>),
    Next(usize),
    OnGosub(Expr, Vec<Rc<str>>),
    Print(Vec<Expr>),
    Read(Target),
    Rem(Rc<str>),
    Restore(Rc<str>),
    Return,
    Stop,
    Wend,
    While(Expr),
}

/// One source line after translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub index: usize,
    pub stmts: Vec<Stmt>,
    pub comment: Option<Rc<str>>,
}

const OR: u8 = 5;
const XOR: u8 = 6;
const AND: u8 = 7;
const EQUALITY: u8 = 8;
const RELATIONAL: u8 = 9;
const ADDITIVE: u8 = 11;
const MULTIPLICATIVE: u8 = 12;
const UNARY: u8 = 14;
const ATOM: u8 = 20;

impl BinOp {
    fn precedence(self) -> u8 {
        use BinOp::*;
        match self {
            Or | IntDiv => OR,
            Xor => XOR,
            And => AND,
            Add | Sub => ADDITIVE,
            Mul | Div | Mod => MULTIPLICATIVE,
        }
    }

    fn symbol(self) -> &'static str {
        use BinOp::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div | IntDiv => "/",
            Mod => "%",
            And => "&",
            Or => "|",
            Xor => "^",
        }
    }
}

impl CmpOp {
    fn precedence(self) -> u8 {
        match self {
            CmpOp::Eq | CmpOp::Ne => EQUALITY,
            _ => RELATIONAL,
        }
    }

    fn symbol(self) -> &'static str {
        use CmpOp::*;
        match self {
            Eq => "===",
            Ne => "!==",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
        }
    }
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Neg(_) | Expr::Not(_) => UNARY,
            Expr::Binary(op, ..) => op.precedence(),
            _ => ATOM,
        }
    }

    /// Value of a literal, possibly negated.
    pub fn constant(&self) -> Option<f64> {
        match self {
            Expr::Num(_, n) => Some(*n),
            Expr::Neg(expr) => match &**expr {
                Expr::Num(_, n) => Some(-n),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Renders an expression, parenthesized when it binds looser than `1`.
struct At<'a>(&'a Expr, u8);

impl fmt::Display for At<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.precedence() < self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn list<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => q.push_str("\\\\"),
            '"' => q.push_str("\\\""),
            '\n' => q.push_str("\\n"),
            '\r' => q.push_str("\\r"),
            '\t' => q.push_str("\\t"),
            c if c.is_control() => q.push_str(&format!("\\u{:04x}", c as u32)),
            _ => q.push(ch),
        }
    }
    q.push('"');
    q
}

/// Text that `Number()` converts without help.
fn is_plain_number(s: &str) -> bool {
    let s = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let (mantissa, exponent) = match s.find(&['e', 'E'][..]) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => (int.is_empty() || digits(int)) && digits(frac),
        None => digits(mantissa),
    };
    mantissa_ok
        && match exponent {
            None => true,
            Some(e) => digits(e.strip_prefix(&['+', '-'][..]).unwrap_or(e)),
        }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Num(text, _) => write!(f, "{}", text),
            Expr::Str(s) => write!(f, "{}", quote(s)),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Index(name, indices) => {
                write!(f, "{}", name)?;
                for i in indices {
                    write!(f, "[{}]", i)?;
                }
                Ok(())
            }
            Expr::Neg(expr) => match &**expr {
                Expr::Neg(_) => write!(f, "-({})", expr),
                _ => write!(f, "-{}", At(expr, UNARY)),
            },
            Expr::Not(expr) => write!(f, "~({})", expr),
            Expr::Binary(BinOp::IntDiv, lhs, rhs) => write!(
                f,
                "({} / {}) | 0",
                At(lhs, MULTIPLICATIVE),
                At(rhs, MULTIPLICATIVE + 1)
            ),
            Expr::Binary(op, lhs, rhs) => {
                let p = op.precedence();
                write!(f, "{} {} {}", At(lhs, p), op.symbol(), At(rhs, p + 1))
            }
            Expr::Pow(lhs, rhs) => write!(f, "Math.pow({}, {})", lhs, rhs),
            Expr::Compare(op, lhs, rhs) => {
                let p = op.precedence();
                write!(
                    f,
                    "({} {} {} ? -1 : 0)",
                    At(lhs, p),
                    op.symbol(),
                    At(rhs, p + 1)
                )
            }
            Expr::Call(builtin, args) => fmt_call(f, *builtin, args),
        }
    }
}

fn fmt_call(f: &mut fmt::Formatter, builtin: Builtin, args: &[Expr]) -> fmt::Result {
    use Builtin::*;
    let math = |name: &str| format!("Math.{}({})", name, list(args, ", "));
    let arg = |i: usize| args.get(i).map(|a| a.to_string()).unwrap_or_default();
    let s = match builtin {
        Abs => math("abs"),
        Atn => math("atan"),
        Cint => math("round"),
        Cos => math("cos"),
        Exp => math("exp"),
        Fix => math("trunc"),
        Int => math("floor"),
        Log => math("log"),
        Log10 => math("log10"),
        Max => math("max"),
        Min => math("min"),
        Sgn => math("sign"),
        Sin => math("sin"),
        Sqr => math("sqrt"),
        Tan => math("tan"),
        Asc => format!("({}).charCodeAt(0)", arg(0)),
        Bin | Hex => {
            let radix = if builtin == Bin { 2 } else { 16 };
            let pad = match args.get(1) {
                Some(n) => format!(".padStart({} || 0, \"0\")", n),
                None => String::new(),
            };
            format!("({}).toString({}).toUpperCase(){}", arg(0), radix, pad)
        }
        Chr => format!("String.fromCharCode({})", arg(0)),
        Left => format!("({}).slice(0, {})", arg(0), arg(1)),
        Len => format!("({}).length", arg(0)),
        Lower => format!("({}).toLowerCase()", arg(0)),
        Upper => format!("({}).toUpperCase()", arg(0)),
        Mid => match (args.get(1), args.get(2)) {
            (Some(p), Some(n)) => format!("({}).substr({} - 1, {})", arg(0), At(p, ADDITIVE), n),
            (Some(p), None) => format!("({}).substr({} - 1)", arg(0), At(p, ADDITIVE)),
            _ => format!("({}).substr()", arg(0)),
        },
        Pi => "Math.PI".to_string(),
        Right => {
            let n = args
                .get(1)
                .map(|n| At(n, MULTIPLICATIVE + 1).to_string())
                .unwrap_or_default();
            format!("({0}).substring(({0}).length - {1})", arg(0), n)
        }
        Rnd => "Math.random()".to_string(),
        Round => match (args.get(0), args.get(1)) {
            (Some(x), Some(n)) => format!(
                "(Math.round({} * Math.pow(10, {1})) / Math.pow(10, {1}))",
                At(x, MULTIPLICATIVE),
                n
            ),
            _ => math("round"),
        },
        Space => format!("\" \".repeat({})", arg(0)),
        Repeat => format!("({}).repeat({})", arg(1), arg(0)),
        Str => format!("String({})", arg(0)),
        Time => "Date.now()".to_string(),
        Value => match args.get(0) {
            Some(Expr::Str(s)) if is_plain_number(s) => format!("Number({})", quote(s)),
            _ => format!(
                "Number(({}).replace(\"&x\", \"0b\").replace(\"&\", \"0x\"))",
                arg(0)
            ),
        },
    };
    write!(f, "{}", s)
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Target::Var(name) => write!(f, "{}", name),
            Target::Index(name, indices) => {
                write!(f, "{}", name)?;
                for i in indices {
                    write!(f, "[{}]", i)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Assign(target, expr) => write!(f, "{} = {}", target, expr),
            Stmt::Cls => write!(f, "_o.cls()"),
            Stmt::Dim(name, dims, is_string) => {
                let init = if *is_string { ", \"\"" } else { "" };
                write!(f, "{} = _o.dimArray([{}]{})", name, list(dims, ", "), init)
            }
            Stmt::End => write!(f, "return \"end\""),
            Stmt::For {
                var,
                start,
                end,
                step,
                dir,
            } => {
                let end = At(end, RELATIONAL + 1);
                let cmp = match dir {
                    Direction::Up => format!("{} <= {}", var, end),
                    Direction::Down => format!("{} >= {}", var, end),
                    Direction::Dynamic => format!(
                        "{} >= 0 ? {1} <= {2} : {1} >= {2}",
                        At(step, RELATIONAL),
                        var,
                        end
                    ),
                };
                write!(f, "for ({} = {}; {}; {} += {}) {{", var, start, cmp, var, step)
            }
            Stmt::Gosub(label) => write!(f, "_{}()", label),
            Stmt::If(cond, then, otherwise) => {
                write!(f, "if ({}) {{\n{}\n}}", cond, list(then, "; "))?;
                if let Some(otherwise) = otherwise {
                    write!(f, " else {{\n{}\n}}", list(otherwise, "; "))?;
                }
                Ok(())
            }
            Stmt::Next(n) => write!(f, "{}", "}".repeat(*n)),
            Stmt::OnGosub(index, labels) => {
                let subs: Vec<String> = labels.iter().map(|l| format!("_{}", l)).collect();
                write!(f, "[{}][{} - 1]?.()", subs.join(","), At(index, ADDITIVE))
            }
            Stmt::Print(args) => write!(f, "_o.print({})", list(args, ", ")),
            Stmt::Read(target) => write!(f, "{} = _data[_dataPtr++]", target),
            Stmt::Rem(text) => write!(f, "// {}", text),
            Stmt::Restore(label) => write!(f, "_dataPtr = _restoreMap[{}]", label),
            Stmt::Return => write!(f, "return"),
            Stmt::Stop => write!(f, "return \"stop\""),
            Stmt::Wend => write!(f, "}}"),
            Stmt::While(cond) => write!(f, "while ({}) {{", cond),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body = list(&self.stmts, "; ");
        match &self.comment {
            Some(comment) if body.is_empty() => write!(f, "//{}", comment),
            Some(comment) => write!(f, "{}; //{}", body, comment),
            None if body.is_empty() || body.ends_with('{') || body.starts_with("//") => {
                write!(f, "{}", body)
            }
            None => write!(f, "{};", body),
        }
    }
}
