use super::*;

#[test]
fn test_gosub_return() {
    let source = r#"
GOSUB 100
PRINT "back"
END
100 PRINT "sub"
RETURN
"#;
    assert_eq!(exec(source.trim()), "sub\nback\nend");
}

#[test]
fn test_on_gosub() {
    let source = r#"
FOR i = 1 TO 3
ON i GOSUB 100, 200
NEXT
END
100 PRINT "a"
RETURN
200 PRINT "b"
RETURN
"#;
    assert_eq!(exec(source.trim()), "a\nb\nend");
}

#[test]
fn test_end_inside_subroutine_returns() {
    let source = r#"
GOSUB 100
PRINT "back"
END
100 PRINT "in"
END
RETURN
"#;
    assert_eq!(exec(source.trim()), "in\nback\nend");
}

#[test]
fn test_stop() {
    assert_eq!(exec("PRINT 1\nSTOP\nPRINT 2"), "1\nstop");
}

#[test]
fn test_recursion_limit() {
    let source = r#"
GOSUB 100
END
100 GOSUB 100
RETURN
"#;
    assert_eq!(
        exec(source.trim()),
        "ERROR: OUT OF MEMORY IN 3; CALL STACK OVERFLOW"
    );
}

#[test]
fn test_missing_subroutine() {
    assert_eq!(
        exec("GOSUB 500"),
        "ERROR: UNDEFINED LINE IN 1; NO SUCH SUBROUTINE"
    );
}
