mod common;
use common::*;

#[test]
fn test_read_in_order() {
    assert_eq!(exec("DATA 1,2,3\nREAD a,b,c\nPRINT a+b+c"), "6\n");
}

#[test]
fn test_read_strings() {
    let source = program(&[r#"READ n$, m$"#, r#"PRINT n$; "-"; m$"#, r#"DATA "ab", "c d""#]);
    assert_eq!(exec(&source), "ab-c d\n");
}

#[test]
fn test_mixed_data() {
    let source = program(&[
        r#"DATA "x", -2.5, &H10"#,
        "READ s$, n, h",
        "PRINT s$; n; h",
    ]);
    assert_eq!(exec(&source), "x-2.516\n");
}

#[test]
fn test_data_is_global() {
    let source = program(&[
        "FOR i = 1 TO 3: READ v: PRINT v;: NEXT",
        "PRINT",
        "DATA 10, 20",
        "DATA 30",
    ]);
    assert_eq!(exec(&source), "102030\n");
}

#[test]
fn test_restore_to_label() {
    let source = program(&[
        "DATA 1,2",
        "100 DATA 3",
        "200 DATA 4",
        "READ a",
        "RESTORE 200",
        "READ b",
        "RESTORE 100",
        "READ c",
        "RESTORE",
        "READ d",
        "PRINT a;b;c;d",
    ]);
    assert_eq!(exec(&source), "1431\n");
}

#[test]
fn test_restore_label_without_data() {
    let source = program(&[
        "DATA 1",
        "50 REM more below",
        "DATA 2",
        "READ a, b",
        "RESTORE 50",
        "READ c",
        "PRINT a;b;c",
    ]);
    assert_eq!(exec(&source), "122\n");
}

#[test]
fn test_data_errors() {
    assert_eq!(exec("READ a"), "ERROR: OUT OF DATA IN 1");
    assert_eq!(exec("DATA 1\nREAD a, b"), "ERROR: OUT OF DATA IN 2");
    assert_eq!(
        exec("DATA 1\nRESTORE 900"),
        "ERROR: UNDEFINED LINE IN 2; NO SUCH RESTORE LABEL"
    );
}

#[test]
fn test_restore_without_data() {
    assert_eq!(exec("RESTORE\nPRINT 1"), "1\n");
    assert_eq!(exec("RESTORE\nREAD a"), "ERROR: OUT OF DATA IN 2");
}
