use super::*;

#[test]
fn test_lf() {
    let l = Line::new(None, "cls\n");
    assert_eq!(l.to_string(), "CLS");
    assert_eq!(l.label(), None);
}

#[test]
fn test_crlf() {
    let l = Line::new(None, "100 end\r\n");
    assert_eq!(l.label().map(|s| &**s), Some("100"));
    assert_eq!(l.to_string(), "100 END");
}

#[test]
fn test_blank() {
    assert!(Line::new(None, "").is_empty());
    assert!(Line::new(None, "   ").is_empty());
    assert!(!Line::new(None, "10").is_empty());
    assert_eq!(Line::new(None, "10").to_string(), "10");
}

#[test]
fn test_comment() {
    let l = Line::new(None, "10 a=1 ' set a");
    assert_eq!(l.comment().as_deref(), Some(" set a"));
    let l = Line::new(None, "'");
    assert_eq!(l.comment().as_deref(), Some(""));
    let l = Line::new(None, "print \"'\"");
    assert_eq!(l.comment(), None);
}

#[test]
fn test_comment_is_not_a_statement() {
    assert_eq!(parse_str("cls ' clear"), vec![Statement::Cls(0..3)]);
    assert_eq!(parse_str("' only a comment"), vec![]);
}

#[test]
fn test_error_has_line_number() {
    let e = Line::new(Some(7), "for = 1").ast().unwrap_err();
    assert_eq!(e.line_number(), Some(7));
}
