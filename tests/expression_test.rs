mod common;
use common::*;

#[test]
fn test_arithmetic() {
    assert_eq!(exec("PRINT 1 + 2 * 3; (1 + 2) * 3; 10 - 4 - 3"), "793\n");
    assert_eq!(exec("PRINT 7 / 2; 7 \\ 2; 7 MOD 3; 2 ^ 10"), "3.531024\n");
    assert_eq!(exec("PRINT -2 ^ 2; 2 ^ 3 ^ 2"), "4512\n");
}

#[test]
fn test_comparisons_are_minus_one() {
    assert_eq!(exec("PRINT (1>0); (1<0); 2 = 2; 2 <> 2"), "-10-10\n");
    assert_eq!(exec(r#"PRINT "abc" < "abd"; "b" >= "a""#), "-1-1\n");
}

#[test]
fn test_logic() {
    assert_eq!(exec("PRINT NOT 0; 6 AND 3; 4 OR 1; 5 XOR 1"), "-1254\n");
    assert_eq!(exec("PRINT NOT (1 = 1)"), "0\n");
}

#[test]
fn test_radix_literals() {
    assert_eq!(exec("PRINT &HFF; &X101; &1F"), "255531\n");
}

#[test]
fn test_number_output() {
    assert_eq!(exec("PRINT 0.1 + 0.2"), "0.30000000000000004\n");
    assert_eq!(exec("PRINT 1E21; 1 / 3"), "1e+210.3333333333333333\n");
    assert_eq!(exec("PRINT .5; 007"), "0.57\n");
}

#[test]
fn test_string_concat() {
    assert_eq!(exec(r#"a$ = "n=" + STR$(3): PRINT a$"#), "n=3\n");
}

#[test]
fn test_case_folding() {
    assert_eq!(exec("Count = 1: COUNT = COUNT + 1: PRINT count"), "2\n");
    assert_eq!(exec("case = 3: PRINT CASE"), "3\n");
    assert_eq!(exec("function = 1: PRINT function"), "1\n");
}

#[test]
fn test_expression_errors() {
    assert_eq!(exec("PRINT 1 / 0"), "ERROR: DIVISION BY ZERO IN 1");
    assert_eq!(exec("PRINT 5 MOD 0"), "ERROR: DIVISION BY ZERO IN 1");
    assert_eq!(exec(r#"a$ = "x" * 2"#), "ERROR: TYPE MISMATCH IN 1");
    assert!(exec("PRINT 1 +").starts_with("ERROR: SYNTAX ERROR IN 1"));
}
