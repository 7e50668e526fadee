//! # BASIC to JavaScript
//!
//! Line-numbered BASIC, translated into JavaScript and run.
//!
//! The [`lang`] module lexes and parses each line into a syntax tree.
//! The [`mach`] module walks those trees to produce a [`mach::Program`],
//! which renders as script text and runs in a [`mach::Sandbox`].
//!
//! ```
//! let out = basic::mach::run("FOR i=1 TO 3: PRINT i: NEXT");
//! assert_eq!(out, "1\n2\n3\n");
//! ```
//!
//! Subroutines are plain numbered lines. A line that is the target of a
//! `GOSUB` starts one and the next `RETURN` ends it.
//! ```text
//! GOSUB 100
//! END
//! 100 PRINT "hello"
//! RETURN
//! ```

pub mod lang;
pub mod mach;
