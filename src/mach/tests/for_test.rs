use super::*;

#[test]
fn test_for_counts_up() {
    assert_eq!(exec("FOR i=1 TO 3: PRINT i: NEXT"), "1\n2\n3\n");
}

#[test]
fn test_for_negative_step() {
    assert_eq!(
        exec("FOR i = 3 TO 1 STEP -1: PRINT i;: NEXT: PRINT"),
        "321\n"
    );
}

#[test]
fn test_for_variable_step() {
    let source = r#"
s = -2
FOR i = 6 TO 1 STEP s
PRINT i;
NEXT i
PRINT
"#;
    assert_eq!(exec(source.trim()), "642\n");
}

#[test]
fn test_for_skipped() {
    assert_eq!(exec("FOR i = 5 TO 1: PRINT i: NEXT: PRINT i"), "5\n");
}

#[test]
fn test_nested_for_single_next() {
    let source = r#"
FOR i = 1 TO 2
FOR j = 1 TO 2
PRINT i; j; " ";
NEXT j, i
PRINT
"#;
    assert_eq!(exec(source.trim()), "11 12 21 22 \n");
}

#[test]
fn test_while() {
    let source = r#"
i = 0
WHILE i < 3
i = i + 1
WEND
PRINT i
"#;
    assert_eq!(exec(source.trim()), "3\n");
}

#[test]
fn test_block_errors() {
    assert_eq!(exec("NEXT"), "ERROR: NEXT WITHOUT FOR IN 1");
    assert_eq!(exec("FOR i=1 TO 2\nPRINT i"), "ERROR: FOR WITHOUT NEXT IN 1");
    assert_eq!(exec("PRINT 1\nWEND"), "ERROR: WEND WITHOUT WHILE IN 2");
    assert_eq!(exec("WHILE 0"), "ERROR: WHILE WITHOUT WEND IN 1");
}

#[test]
fn test_break() {
    assert_eq!(
        exec_with_break_on_cls("PRINT 1\nWHILE 1: CLS: WEND"),
        "ERROR: BREAK IN 2"
    );
}
