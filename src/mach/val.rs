use crate::error;
use crate::lang::Error;
use std::cell::RefCell;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime values
///
/// Numbers are IEEE doubles and strings are immutable. Arrays are shared by
/// reference, so assigning one array variable to another aliases it.

#[derive(Debug, Clone)]
pub enum Val {
    Number(f64),
    String(Rc<str>),
    Array(Rc<RefCell<Vec<Val>>>),
}

impl Default for Val {
    fn default() -> Self {
        Val::Number(0.0)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Number(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::String(s.into())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::String(s.into())
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Number(if b { -1.0 } else { 0.0 })
    }
}

impl Val {
    pub fn new_array(vec: Vec<Val>) -> Val {
        Val::Array(Rc::new(RefCell::new(vec)))
    }

    pub fn to_number(&self) -> Result<f64> {
        match self {
            Val::Number(n) => Ok(*n),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn to_str(&self) -> Result<Rc<str>> {
        match self {
            Val::String(s) => Ok(s.clone()),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Number(n) => *n != 0.0 && !n.is_nan(),
            Val::String(s) => !s.is_empty(),
            Val::Array(_) => true,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Number(n) => write!(f, "{}", number_to_string(*n)),
            Val::String(s) => write!(f, "{}", s),
            Val::Array(a) => {
                for (i, v) in a.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Val) -> bool {
        match (self, other) {
            (Val::Number(l), Val::Number(r)) => l == r,
            (Val::String(l), Val::String(r)) => l == r,
            (Val::Array(l), Val::Array(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

/// Number to text the way an ECMAScript engine prints it: shortest
/// round-trip digits, plain notation from 1e-6 up to 1e21.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n == 0.0 {
        return "0".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n < 0.0 {
        return format!("-{}", number_to_string(-n));
    }
    let sci = format!("{:e}", n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;
    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let e = (n - 1).abs();
        if k == 1 {
            format!("{}e{}{}", digits, sign, e)
        } else {
            format!("{}.{}e{}{}", &digits[..1], &digits[1..], sign, e)
        }
    }
}

/// Text to number as `Number(s)` does it. Anything unparsable is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0b") | Some("0B") => Some(2),
        Some("0o") | Some("0O") => Some(8),
        _ => None,
    };
    if let Some(radix) = radix {
        return radix_to_number(&s[2..], radix).unwrap_or(f64::NAN);
    }
    let (sign, unsigned) = match s.chars().next() {
        Some('-') => (-1.0, &s[1..]),
        Some('+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }
    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }
    match unsigned.parse::<f64>() {
        Ok(n) => sign * n,
        Err(_) => f64::NAN,
    }
}

fn is_decimal_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(&['e', 'E'][..]) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    let mut parts = mantissa.splitn(2, '.');
    let int = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int) || !all_digits(frac) || (int.is_empty() && frac.is_empty()) {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(&['+', '-'][..]).unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
    }
}

/// Digits in the given radix, no sign or prefix. Empty input is rejected.
pub fn radix_to_number(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut n = 0.0;
    for c in digits.chars() {
        n = n * radix as f64 + c.to_digit(radix)? as f64;
    }
    Some(n)
}

/// Number to text in radix 2 or 16 like `Number.prototype.toString(radix)`.
pub fn number_to_radix(n: f64, radix: u32) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if n < 0.0 {
        return format!("-{}", number_to_radix(-n, radix));
    }
    let r = radix as f64;
    let mut int = n.trunc();
    let mut frac = n - int;
    let mut digits: Vec<char> = vec![];
    loop {
        let d = (int % r) as u32;
        digits.push(std::char::from_digit(d, radix).unwrap_or('0'));
        int = (int / r).trunc();
        if int < 1.0 {
            break;
        }
    }
    digits.reverse();
    let mut s: String = digits.into_iter().collect();
    if frac > 0.0 {
        s.push('.');
        for _ in 0..52 {
            frac *= r;
            let d = frac.trunc();
            s.push(std::char::from_digit(d as u32, radix).unwrap_or('0'));
            frac -= d;
            if frac <= 0.0 {
                break;
            }
        }
    }
    s
}

/// ECMAScript ToInt32, used by the bitwise operators.
pub fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let m = n.trunc().rem_euclid(4_294_967_296.0);
    if m >= 2_147_483_648.0 {
        (m - 4_294_967_296.0) as i32
    } else {
        m as i32
    }
}

/// ECMAScript ToIntegerOrInfinity.
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// `Math.round`: halves go toward positive infinity.
pub fn js_round(n: f64) -> f64 {
    let r = n.round();
    if n < 0.0 && r - n == -0.5 {
        let r = r + 1.0;
        if r == 0.0 {
            -0.0
        } else {
            r
        }
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-2.5), "-2.5");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(123456789012345680000.0), "123456789012345680000");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(0.0000001), "1e-7");
        assert_eq!(number_to_string(1.5e-10), "1.5e-10");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(2e-7), "2e-7");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(" 12 "), 12.0);
        assert_eq!(string_to_number("-1.5e2"), -150.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("5."), 5.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0xff"), 255.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("12abc").is_nan());
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("-0x1").is_nan());
        assert!(string_to_number("1e").is_nan());
    }

    #[test]
    fn test_radix() {
        assert_eq!(number_to_radix(255.0, 16), "ff");
        assert_eq!(number_to_radix(5.0, 2), "101");
        assert_eq!(number_to_radix(0.0, 2), "0");
        assert_eq!(number_to_radix(-10.0, 16), "-a");
        assert_eq!(number_to_radix(2.5, 2), "10.1");
    }

    #[test]
    fn test_int32() {
        assert_eq!(to_int32(4294967295.0), -1);
        assert_eq!(to_int32(2147483648.0), -2147483648);
        assert_eq!(to_int32(-1.9), -1);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_round() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(-2.5), -2.0);
        assert_eq!(js_round(-2.6), -3.0);
        assert_eq!(js_round(0.49999999999999994), 0.0);
    }

    #[test]
    fn test_array_display() {
        let a = Val::new_array(vec![Val::Number(1.0), Val::from("x")]);
        assert_eq!(a.to_string(), "1,x");
    }
}
