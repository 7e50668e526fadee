use super::val::*;
use crate::error;
use crate::lang::Error;
use std::ops::RangeInclusive;

type Result<T> = std::result::Result<T, Error>;

const MAX_STRING_LEN: f64 = (1 << 28) as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Abs,
    Asc,
    Atn,
    Bin,
    Chr,
    Cint,
    Cos,
    Exp,
    Fix,
    Hex,
    Int,
    Left,
    Len,
    Log,
    Log10,
    Lower,
    Max,
    Mid,
    Min,
    Pi,
    Right,
    Rnd,
    Round,
    Sgn,
    Sin,
    Space,
    Sqr,
    Repeat,
    Str,
    Tan,
    Time,
    Upper,
    Value,
}

pub struct Function {}

impl Function {
    /// Looks up a built-in by its source name, case insensitive.
    pub fn builtin_and_arity(func_name: &str) -> Option<(Builtin, RangeInclusive<usize>)> {
        use Builtin::*;
        let many = usize::max_value();
        Some(match func_name.to_ascii_lowercase().as_str() {
            "abs" => (Abs, 1..=1),
            "asc" => (Asc, 1..=1),
            "atn" => (Atn, 1..=1),
            "bin$" => (Bin, 1..=2),
            "chr$" => (Chr, 1..=1),
            "cint" => (Cint, 1..=1),
            "cos" => (Cos, 1..=1),
            "exp" => (Exp, 1..=1),
            "fix" => (Fix, 1..=1),
            "hex$" => (Hex, 1..=2),
            "int" => (Int, 1..=1),
            "left$" => (Left, 2..=2),
            "len" => (Len, 1..=1),
            "log" => (Log, 1..=1),
            "log10" => (Log10, 1..=1),
            "lower$" => (Lower, 1..=1),
            "max" => (Max, 1..=many),
            "mid$" => (Mid, 2..=3),
            "min" => (Min, 1..=many),
            "pi" => (Pi, 0..=0),
            "right$" => (Right, 2..=2),
            "rnd" => (Rnd, 0..=1),
            "round" => (Round, 1..=2),
            "sgn" => (Sgn, 1..=1),
            "sin" => (Sin, 1..=1),
            "space$" => (Space, 1..=1),
            "sqr" => (Sqr, 1..=1),
            "str$" => (Str, 1..=1),
            "string$" => (Repeat, 2..=2),
            "tan" => (Tan, 1..=1),
            "time" => (Time, 0..=0),
            "upper$" => (Upper, 1..=1),
            "val" => (Value, 1..=1),
            _ => return None,
        })
    }

    /// Evaluates a built-in. The caller has already checked the arity.
    pub fn call(builtin: Builtin, args: Vec<Val>) -> Result<Val> {
        use Builtin::*;
        match builtin {
            Max => return Function::fold(args, |acc, v| v > acc || (v == acc && acc < 0.0)),
            Min => return Function::fold(args, |acc, v| v < acc || (v == acc && v < 0.0)),
            _ => {}
        }
        let argc = args.len();
        let mut args = args.into_iter();
        let mut arg = || args.next().unwrap_or_default();
        match builtin {
            Abs => Function::math(arg(), f64::abs),
            Atn => Function::math(arg(), f64::atan),
            Cint => Function::math(arg(), js_round),
            Cos => Function::math(arg(), f64::cos),
            Exp => Function::math(arg(), f64::exp),
            Fix => Function::math(arg(), f64::trunc),
            Int => Function::math(arg(), f64::floor),
            Log => Function::math(arg(), f64::ln),
            Log10 => Function::math(arg(), f64::log10),
            Sgn => Function::math(arg(), Function::sign),
            Sin => Function::math(arg(), f64::sin),
            Sqr => Function::math(arg(), f64::sqrt),
            Tan => Function::math(arg(), f64::tan),
            Asc => {
                let s = arg().to_str()?;
                Ok(Val::Number(match s.chars().next() {
                    Some(ch) => ch as u32 as f64,
                    None => f64::NAN,
                }))
            }
            Bin | Hex => {
                let radix = if builtin == Bin { 2 } else { 16 };
                let n = arg();
                let pad = if argc > 1 { Some(arg()) } else { None };
                Function::radix(n, pad, radix)
            }
            Chr => {
                let code = to_int32(arg().to_number()?) as u16;
                let ch = std::char::from_u32(code as u32).unwrap_or('\u{fffd}');
                Ok(Val::from(ch.to_string()))
            }
            Left => {
                let s: Vec<char> = arg().to_str()?.chars().collect();
                let end = arg().to_number()?;
                Ok(Val::from(slice(&s, 0.0, end)))
            }
            Len => Ok(Val::Number(arg().to_str()?.chars().count() as f64)),
            Lower => Ok(Val::from(arg().to_str()?.to_lowercase())),
            Upper => Ok(Val::from(arg().to_str()?.to_uppercase())),
            Mid => {
                let s: Vec<char> = arg().to_str()?.chars().collect();
                let start = arg().to_number()? - 1.0;
                let count = if argc > 2 {
                    Some(arg().to_number()?)
                } else {
                    None
                };
                Ok(Val::from(substr(&s, start, count)))
            }
            Pi => Ok(Val::Number(std::f64::consts::PI)),
            Right => {
                let s: Vec<char> = arg().to_str()?.chars().collect();
                let n = arg().to_number()?;
                Ok(Val::from(substring(&s, s.len() as f64 - n)))
            }
            Rnd => Ok(Val::Number(rand::random::<f64>())),
            Round => {
                let x = arg().to_number()?;
                if argc > 1 {
                    let scale = 10f64.powf(arg().to_number()?);
                    Ok(Val::Number(js_round(x * scale) / scale))
                } else {
                    Ok(Val::Number(js_round(x)))
                }
            }
            Space => Ok(Val::from(repeat(" ", arg().to_number()?)?)),
            Repeat => {
                let n = arg().to_number()?;
                let s = arg().to_str()?;
                Ok(Val::from(repeat(&s, n)?))
            }
            Str => Ok(Val::from(arg().to_string())),
            Time => Ok(Val::Number(chrono::Utc::now().timestamp_millis() as f64)),
            Value => {
                let s = arg().to_str()?;
                let s = s.replacen("&x", "0b", 1).replacen('&', "0x", 1);
                Ok(Val::Number(string_to_number(&s)))
            }
            Max | Min => Err(error!(InternalError; "UNREACHABLE")),
        }
    }

    fn math(val: Val, f: fn(f64) -> f64) -> Result<Val> {
        Ok(Val::Number(f(val.to_number()?)))
    }

    fn sign(n: f64) -> f64 {
        if n.is_nan() || n == 0.0 {
            n
        } else {
            n.signum()
        }
    }

    fn fold(args: Vec<Val>, replaces: fn(f64, f64) -> bool) -> Result<Val> {
        let mut acc: Option<f64> = None;
        for v in args {
            let v = v.to_number()?;
            acc = Some(match acc {
                None => v,
                Some(a) if a.is_nan() || v.is_nan() => f64::NAN,
                Some(a) if replaces(a, v) => v,
                Some(a) => a,
            });
        }
        Ok(Val::Number(acc.unwrap_or(f64::NAN)))
    }

    fn radix(val: Val, pad: Option<Val>, radix: u32) -> Result<Val> {
        let mut s = number_to_radix(val.to_number()?, radix).to_uppercase();
        if let Some(pad) = pad {
            let width = to_integer(pad.to_number()?);
            if width > MAX_STRING_LEN {
                return Err(error!(OutOfMemory; "INVALID STRING LENGTH"));
            }
            let len = s.chars().count() as f64;
            if width > len {
                s = format!("{}{}", "0".repeat((width - len) as usize), s);
            }
        }
        Ok(Val::from(s))
    }
}

/// `String.prototype.slice` over characters.
fn slice(s: &[char], start: f64, end: f64) -> String {
    let len = s.len() as f64;
    let clamp = |n: f64| {
        let n = to_integer(n);
        if n < 0.0 {
            (len + n).max(0.0)
        } else {
            n.min(len)
        }
    };
    let (from, to) = (clamp(start), clamp(end));
    if from >= to {
        return String::new();
    }
    s[from as usize..to as usize].iter().collect()
}

/// `String.prototype.substr` over characters.
fn substr(s: &[char], start: f64, count: Option<f64>) -> String {
    let len = s.len() as f64;
    let mut from = to_integer(start);
    if from < 0.0 {
        from = (len + from).max(0.0);
    }
    let from = from.min(len);
    let count = match count {
        Some(c) => to_integer(c).max(0.0).min(len - from),
        None => len - from,
    };
    if count <= 0.0 {
        return String::new();
    }
    s[from as usize..(from + count) as usize].iter().collect()
}

/// `String.prototype.substring` with only a start position.
fn substring(s: &[char], start: f64) -> String {
    let from = to_integer(start).max(0.0).min(s.len() as f64);
    s[from as usize..].iter().collect()
}

fn repeat(s: &str, count: f64) -> Result<String> {
    let n = to_integer(count);
    if n < 0.0 || n.is_infinite() {
        return Err(error!(IllegalFunctionCall; "INVALID COUNT VALUE"));
    }
    if n * s.chars().count() as f64 > MAX_STRING_LEN {
        return Err(error!(OutOfMemory; "INVALID STRING LENGTH"));
    }
    Ok(s.repeat(n as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Val>) -> Val {
        let (builtin, arity) = Function::builtin_and_arity(name).unwrap();
        assert!(arity.contains(&args.len()));
        Function::call(builtin, args).unwrap()
    }

    fn n(n: f64) -> Val {
        Val::Number(n)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(Function::builtin_and_arity("LEFT$").is_some());
        assert!(Function::builtin_and_arity("Log10").is_some());
        assert!(Function::builtin_and_arity("left").is_none());
    }

    #[test]
    fn test_math() {
        assert_eq!(call("int", vec![n(-2.3)]), n(-3.0));
        assert_eq!(call("fix", vec![n(-2.3)]), n(-2.0));
        assert_eq!(call("round", vec![n(2.5)]), n(3.0));
        assert_eq!(call("round", vec![n(1.005), n(2.0)]), n(1.0));
        assert_eq!(call("round", vec![n(2.345), n(1.0)]), n(2.3));
        assert_eq!(call("sgn", vec![n(-4.0)]), n(-1.0));
        assert_eq!(call("max", vec![n(1.0), n(7.0), n(3.0)]), n(7.0));
        assert_eq!(call("min", vec![n(1.0), n(7.0), n(-3.0)]), n(-3.0));
    }

    #[test]
    fn test_strings() {
        let s = || Val::from("hello");
        assert_eq!(call("left$", vec![s(), n(2.0)]), Val::from("he"));
        assert_eq!(call("right$", vec![s(), n(3.0)]), Val::from("llo"));
        assert_eq!(call("right$", vec![s(), n(9.0)]), Val::from("hello"));
        assert_eq!(call("mid$", vec![s(), n(2.0), n(3.0)]), Val::from("ell"));
        assert_eq!(call("mid$", vec![s(), n(4.0)]), Val::from("lo"));
        assert_eq!(call("len", vec![s()]), n(5.0));
        assert_eq!(call("upper$", vec![s()]), Val::from("HELLO"));
        assert_eq!(call("asc", vec![Val::from("A")]), n(65.0));
        assert_eq!(call("chr$", vec![n(65.0)]), Val::from("A"));
        assert_eq!(call("space$", vec![n(3.0)]), Val::from("   "));
        assert_eq!(call("string$", vec![n(2.0), Val::from("ab")]), Val::from("abab"));
        assert_eq!(call("str$", vec![n(0.5)]), Val::from("0.5"));
    }

    #[test]
    fn test_radix() {
        assert_eq!(call("hex$", vec![n(255.0)]), Val::from("FF"));
        assert_eq!(call("hex$", vec![n(255.0), n(4.0)]), Val::from("00FF"));
        assert_eq!(call("bin$", vec![n(5.0), n(8.0)]), Val::from("00000101"));
        assert_eq!(call("bin$", vec![n(5.0), n(0.0)]), Val::from("101"));
    }

    #[test]
    fn test_val() {
        assert_eq!(call("val", vec![Val::from("12.5")]), n(12.5));
        assert_eq!(call("val", vec![Val::from("&ff")]), n(255.0));
        assert_eq!(call("val", vec![Val::from("&x101")]), n(5.0));
        let nan = call("val", vec![Val::from("abc")]);
        assert!(nan.to_number().unwrap().is_nan());
    }

    #[test]
    fn test_errors() {
        let e = Function::call(Builtin::Space, vec![n(-1.0)]).unwrap_err();
        assert_eq!(e.to_string(), "ILLEGAL FUNCTION CALL; INVALID COUNT VALUE");
        let e = Function::call(Builtin::Len, vec![n(1.0)]).unwrap_err();
        assert_eq!(e.to_string(), "TYPE MISMATCH");
    }
}
