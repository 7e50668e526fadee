use crate::mach::{compile, run, translate, Runtime, Sandbox};
use std::sync::atomic::Ordering;

mod for_test;
mod gosub_test;

fn js(source: &str) -> String {
    compile(source)
}

fn exec(source: &str) -> String {
    run(source)
}

/// Runs with CLS raising the interrupt, the way a terminal's Ctrl-C would.
fn exec_with_break_on_cls(source: &str) -> String {
    let program = match translate(source) {
        Ok(program) => program,
        Err(error) => return format!("ERROR: {}", error),
    };
    let mut sandbox = Sandbox::new();
    let flag = sandbox.interrupt_flag();
    let mut runtime = Runtime::new();
    runtime.set_on_cls(move || flag.store(true, Ordering::Relaxed));
    sandbox.with_runtime(runtime).execute(&program)
}
