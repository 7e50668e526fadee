use super::*;

fn plain(col: Column, s: &str) -> Variable {
    Variable::Unary(col, Ident::Plain(s.to_string()))
}

#[test]
fn test_literals() {
    assert_eq!(
        parse_str("a=12"),
        vec![Statement::Let(
            0..1,
            plain(0..1, "a"),
            Expression::Number(2..4, "12".into())
        )]
    );
    assert_eq!(
        parse_str("a=&x101"),
        vec![Statement::Let(
            0..1,
            plain(0..1, "a"),
            Expression::Binary(2..7, "101".into())
        )]
    );
    assert_eq!(
        parse_str("a$=\"hi\""),
        vec![Statement::Let(
            0..2,
            Variable::Unary(0..2, Ident::String("a$".into())),
            Expression::String(3..7, "hi".into())
        )]
    );
}

#[test]
fn test_array_assign() {
    assert_eq!(
        parse_str("a(1,j)=0"),
        vec![Statement::Let(
            0..1,
            Variable::Array(
                0..1,
                Ident::Plain("a".into()),
                vec![
                    Expression::Number(2..3, "1".into()),
                    Expression::Variable(plain(4..5, "j")),
                ]
            ),
            Expression::Number(7..8, "0".into())
        )]
    );
}

#[test]
fn test_colon_chain() {
    let v = parse_str("cls::end:");
    assert_eq!(v, vec![Statement::Cls(0..3), Statement::End(5..8)]);
}

#[test]
fn test_gosub_and_on_gosub() {
    assert_eq!(
        parse_str("gosub 100"),
        vec![Statement::Gosub(0..5, "100".into())]
    );
    match &parse_str("on x gosub 10,20,30")[0] {
        Statement::OnGosub(_, Expression::Variable(_), labels) => {
            let labels: Vec<&str> = labels.iter().map(|s| &**s).collect();
            assert_eq!(labels, ["10", "20", "30"]);
        }
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_restore() {
    assert_eq!(parse_str("restore"), vec![Statement::Restore(0..7, None)]);
    assert_eq!(
        parse_str("restore 50"),
        vec![Statement::Restore(0..7, Some("50".into()))]
    );
}

#[test]
fn test_next_list() {
    match &parse_str("next")[0] {
        Statement::Next(_, v) => assert!(v.is_empty()),
        s => panic!("{:?}", s),
    }
    match &parse_str("next j,i")[0] {
        Statement::Next(_, v) => assert_eq!(v.len(), 2),
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_rem() {
    assert_eq!(
        parse_str("rem   hello world "),
        vec![Statement::Rem(0..3, "hello world".into())]
    );
    assert_eq!(parse_str("REM"), vec![Statement::Rem(0..3, "".into())]);
}

#[test]
fn test_case_insensitive_keywords() {
    assert_eq!(parse_str("WeNd"), vec![Statement::Wend(0..4)]);
    assert_eq!(parse_str("Return"), vec![Statement::Return(0..6)]);
}

#[test]
fn test_print_trailing_comma_keeps_line() {
    match &parse_str("print a,")[0] {
        Statement::Print(_, v, linefeed) => {
            assert_eq!(v.len(), 1);
            assert!(!linefeed);
        }
        s => panic!("{:?}", s),
    }
}

#[test]
fn test_syntax_errors() {
    assert_eq!(
        parse_err("a="),
        "SYNTAX ERROR IN 1 (2..2); EXPECTED EXPRESSION"
    );
    assert_eq!(
        parse_err("if a then"),
        "SYNTAX ERROR IN 1 (9..9); EXPECTED STATEMENT"
    );
    assert_eq!(
        parse_err("gosub x"),
        "SYNTAX ERROR IN 1 (6..7); EXPECTED LINE LABEL"
    );
    assert_eq!(
        parse_err("cls end"),
        "SYNTAX ERROR IN 1 (4..7); EXPECTED END OF STATEMENT"
    );
    assert_eq!(parse_err("input a"), "SYNTAX ERROR IN 1 (0..5); RESERVED WORD");
}
