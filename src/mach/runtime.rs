use super::val::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

const MAX_ARRAY_ELEMENTS: f64 = (1 << 24) as f64;

/// ## Runtime support
///
/// The services a translated program calls through `_o`: array
/// allocation, printing and clearing the screen. Printed text collects
/// in an output buffer.

#[derive(Default)]
pub struct Runtime {
    output: String,
    on_cls: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("output", &self.output)
            .field("on_cls", &self.on_cls.is_some())
            .finish()
    }
}

impl Runtime {
    pub fn new() -> Runtime {
        Runtime::default()
    }

    /// Nested arrays with `bound + 1` elements per dimension, every leaf
    /// set to `init`. Built from the innermost dimension outward.
    pub fn dim_array(&self, dims: &[Val], init: Val) -> Result<Val> {
        if dims.is_empty() {
            return Err(error!(IllegalFunctionCall; "NO DIMENSIONS"));
        }
        let mut sizes: Vec<usize> = vec![];
        let mut total = 1.0;
        for dim in dims {
            let bound = dim.to_number()?;
            if bound < 0.0 || bound.fract() != 0.0 || bound.is_nan() {
                return Err(error!(SubscriptOutOfRange));
            }
            total *= bound + 1.0;
            if total > MAX_ARRAY_ELEMENTS {
                return Err(error!(OutOfMemory; "ARRAY TOO LARGE"));
            }
            sizes.push(bound as usize + 1);
        }
        let mut layer: Vec<Val> = vec![init; total as usize];
        while let Some(size) = sizes.pop() {
            let mut grouped: Vec<Val> = Vec::with_capacity(layer.len() / size);
            let mut leaves = layer.into_iter();
            loop {
                let chunk: Vec<Val> = leaves.by_ref().take(size).collect();
                if chunk.is_empty() {
                    break;
                }
                grouped.push(Val::new_array(chunk));
            }
            layer = grouped;
        }
        match layer.pop() {
            Some(array) => Ok(array),
            None => Err(error!(InternalError; "EMPTY ARRAY")),
        }
    }

    pub fn print(&mut self, args: &[Val]) {
        for arg in args {
            self.output.push_str(&arg.to_string());
        }
    }

    pub fn cls(&mut self) {
        self.output.clear();
        if let Some(on_cls) = self.on_cls.as_mut() {
            on_cls();
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn set_output(&mut self, s: &str) {
        self.output = s.to_string();
    }

    pub fn set_on_cls<F: FnMut() + 'static>(&mut self, on_cls: F) {
        self.on_cls = Some(Box::new(on_cls));
    }
}
