#![allow(dead_code)]
use basic::mach;

/// Output of the program followed by its END or STOP sentinel.
pub fn exec(source: &str) -> String {
    mach::run(source)
}

/// Translated script text.
pub fn js(source: &str) -> String {
    mach::compile(source)
}

/// Joins lines so programs read naturally in raw strings.
pub fn program(lines: &[&str]) -> String {
    lines.join("\n")
}
