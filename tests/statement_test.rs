mod common;
use common::*;

#[test]
fn test_print_separators() {
    assert_eq!(exec(r#"PRINT "a";"b","c""#), "abc\n");
    assert_eq!(exec(r#"PRINT "a";"#), "a");
    assert_eq!(exec("PRINT"), "\n");
    assert_eq!(exec(r#"?"short""#), "short\n");
}

#[test]
fn test_let() {
    assert_eq!(exec("LET a = 2: b = a * 3: PRINT b"), "6\n");
    assert_eq!(exec(r#"a$ = "x": a$ = a$ + "y": PRINT a$"#), "xy\n");
}

#[test]
fn test_if_then_else() {
    let source = program(&[
        "a = 5",
        r#"IF a > 3 THEN PRINT "big" ELSE PRINT "small""#,
        r#"IF a > 9 THEN PRINT "huge" ELSE PRINT "not huge""#,
        r#"IF a = 5 THEN IF a < 9 THEN PRINT "nested""#,
    ]);
    assert_eq!(exec(&source), "big\nnot huge\nnested\n");
}

#[test]
fn test_if_with_loop_in_branch() {
    assert_eq!(
        exec("IF 1 THEN FOR i = 1 TO 3: PRINT i;: NEXT: PRINT"),
        "123\n"
    );
}

#[test]
fn test_rem_and_comments() {
    let source = program(&[
        "REM nothing to see",
        "' nor here",
        "PRINT 1 ' trailing",
    ]);
    assert_eq!(exec(&source), "1\n");
}

#[test]
fn test_end_stops_early() {
    assert_eq!(exec("PRINT 1\nEND\nPRINT 2"), "1\nend");
}

#[test]
fn test_cls_clears_output() {
    assert_eq!(exec("PRINT 1\nCLS\nPRINT 2"), "2\n");
}

#[test]
fn test_while_wend_nested() {
    let source = program(&[
        "i = 0",
        "WHILE i < 2",
        "j = 0",
        "WHILE j < 2",
        "PRINT i; j; \" \";",
        "j = j + 1",
        "WEND",
        "i = i + 1",
        "WEND",
    ]);
    assert_eq!(exec(&source), "00 01 10 11 ");
}

#[test]
fn test_gosub_from_two_sites() {
    let source = program(&[
        "n = 1: GOSUB 100",
        "n = 2: GOSUB 100",
        "END",
        "100 PRINT n * 10",
        "RETURN",
    ]);
    assert_eq!(exec(&source), "10\n20\nend");
}

#[test]
fn test_nested_gosub() {
    let source = program(&[
        "GOSUB 200",
        "END",
        "100 PRINT \"inner\"",
        "RETURN",
        "200 PRINT \"outer\"",
        "GOSUB 100",
        "RETURN",
    ]);
    assert_eq!(exec(&source), "outer\ninner\nend");
}

#[test]
fn test_on_gosub_out_of_range() {
    let source = program(&[
        "ON 0 GOSUB 100",
        "ON 2 GOSUB 100",
        "ON 1.5 GOSUB 100",
        "PRINT \"done\"",
        "END",
        "100 PRINT \"no\"",
        "RETURN",
    ]);
    assert_eq!(exec(&source), "done\nend");
}

#[test]
fn test_subroutine_inside_loop_text() {
    let source = program(&[
        "FOR i = 1 TO 2",
        "GOSUB 100",
        "NEXT",
        "END",
        "100 PRINT i",
        "RETURN",
    ]);
    assert_eq!(exec(&source), "1\n2\nend");
}
