use super::data::DataValue;
use super::function::Function;
use super::ir::{BinOp, CmpOp, Direction, Expr, Line, Stmt, Target};
use super::operation::Operation;
use super::program::{Item, Program};
use super::runtime::Runtime;
use super::stack::Stack;
use super::val::Val;
use crate::error;
use crate::lang::Error;
use log::{debug, info};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type Result<T> = std::result::Result<T, Error>;

const MAX_CALL_DEPTH: usize = 256;

/// ## Execution sandbox
///
/// Runs a translated program the way the generated script would run with
/// the runtime passed in as `_o`. Output collects in the runtime; END and
/// STOP leave their sentinel after it.

pub struct Sandbox {
    runtime: Runtime,
    interrupt: Arc<AtomicBool>,
    calls: Stack<Rc<str>>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Sandbox {
            runtime: Runtime::default(),
            interrupt: Arc::new(AtomicBool::new(false)),
            calls: Stack::with_limit("CALL STACK OVERFLOW", MAX_CALL_DEPTH),
        }
    }
}

impl std::fmt::Debug for Sandbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sandbox")
            .field("runtime", &self.runtime)
            .field("interrupt", &self.interrupt)
            .finish()
    }
}

impl Sandbox {
    pub fn new() -> Sandbox {
        Sandbox::default()
    }

    pub fn with_runtime(mut self, runtime: Runtime) -> Sandbox {
        self.runtime = runtime;
        self
    }

    /// Setting the flag stops a running program with BREAK.
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Sandbox {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    /// Output followed by the END or STOP sentinel, or the error text.
    pub fn execute(&mut self, program: &Program) -> String {
        match self.run(program) {
            Ok(sentinel) => format!("{}{}", self.runtime.output(), sentinel),
            Err(error) => format!("ERROR: {}", error),
        }
    }

    /// Runs from a fresh output buffer. Returns the sentinel.
    pub fn run(&mut self, program: &Program) -> Result<&'static str> {
        self.runtime.set_output("");
        self.interrupt.store(false, Ordering::Relaxed);
        self.calls.clear();

        let mut main_lines: Vec<&Line> = vec![];
        let mut subs: HashMap<Rc<str>, Vec<Node<'_>>> = HashMap::new();
        for item in program.items() {
            match item {
                Item::Line(line) => main_lines.push(line),
                Item::Subroutine(label, lines) => {
                    subs.insert(label.clone(), prepare(lines.iter())?);
                }
            }
        }
        let main = prepare(main_lines.into_iter())?;
        debug!("prepared {} subroutines", subs.len());

        let mut machine = Machine {
            subs: &subs,
            vars: program
                .declarations()
                .iter()
                .map(|(name, is_string)| {
                    let init = if *is_string {
                        Val::from("")
                    } else {
                        Val::default()
                    };
                    (name.clone(), init)
                })
                .collect(),
            data: program
                .data()
                .iter()
                .map(|value| match value {
                    DataValue::Number(_, n) => Val::Number(*n),
                    DataValue::String(s) => Val::String(s.clone()),
                })
                .collect(),
            data_ptr: 0,
            restore: program.restore_map().iter().cloned().collect(),
            runtime: &mut self.runtime,
            interrupt: &self.interrupt,
            calls: &mut self.calls,
        };
        let sentinel = match machine.block(&main)? {
            Flow::Return(Some(sentinel)) => sentinel,
            Flow::Return(None) | Flow::Continue => "",
        };
        info!(
            "program finished with {} bytes of output",
            self.runtime.output().len()
        );
        Ok(sentinel)
    }
}

#[derive(Debug)]
struct ForLoop<'a> {
    var: &'a Rc<str>,
    start: &'a Expr,
    end: &'a Expr,
    step: &'a Expr,
    dir: Direction,
}

/// Statements with their blocks resolved. Line numbers are 1-based.
#[derive(Debug)]
enum Node<'a> {
    Stmt(usize, &'a Stmt),
    If(usize, &'a Expr, Vec<Node<'a>>, Option<Vec<Node<'a>>>),
    For(usize, ForLoop<'a>, Vec<Node<'a>>),
    While(usize, &'a Expr, Vec<Node<'a>>),
}

enum Open<'a> {
    Root,
    For(usize, ForLoop<'a>),
    While(usize, &'a Expr),
}

struct Frame<'a> {
    open: Open<'a>,
    body: Vec<Node<'a>>,
}

fn prepare<'a>(lines: impl Iterator<Item = &'a Line>) -> Result<Vec<Node<'a>>> {
    let items: Vec<(usize, &Stmt)> = lines
        .flat_map(|line| line.stmts.iter().map(move |stmt| (line.index + 1, stmt)))
        .collect();
    block(items)
}

/// NEXT and WEND close whatever block is innermost, as a closing brace
/// would.
fn block<'a>(items: Vec<(usize, &'a Stmt)>) -> Result<Vec<Node<'a>>> {
    let mut frames: Vec<Frame> = vec![Frame {
        open: Open::Root,
        body: vec![],
    }];
    for (line, stmt) in items {
        match stmt {
            Stmt::For {
                var,
                start,
                end,
                step,
                dir,
            } => {
                let for_loop = ForLoop {
                    var,
                    start,
                    end,
                    step,
                    dir: *dir,
                };
                frames.push(Frame {
                    open: Open::For(line, for_loop),
                    body: vec![],
                });
            }
            Stmt::While(cond) => frames.push(Frame {
                open: Open::While(line, cond),
                body: vec![],
            }),
            Stmt::Next(n) => {
                for _ in 0..*n {
                    close(&mut frames, error!(NextWithoutFor, Some(line)))?;
                }
            }
            Stmt::Wend => close(&mut frames, error!(WendWithoutWhile, Some(line)))?,
            Stmt::If(cond, then, otherwise) => {
                let then = block(then.iter().map(|s| (line, s)).collect())?;
                let otherwise = match otherwise {
                    Some(stmts) => Some(block(stmts.iter().map(|s| (line, s)).collect())?),
                    None => None,
                };
                append(&mut frames, Node::If(line, cond, then, otherwise));
            }
            _ => append(&mut frames, Node::Stmt(line, stmt)),
        }
    }
    match frames.pop() {
        Some(Frame {
            open: Open::Root,
            body,
        }) => Ok(body),
        Some(Frame {
            open: Open::For(line, _),
            ..
        }) => Err(error!(ForWithoutNext, Some(line))),
        Some(Frame {
            open: Open::While(line, _),
            ..
        }) => Err(error!(WhileWithoutWend, Some(line))),
        None => Err(error!(InternalError; "NO BLOCK")),
    }
}

fn close<'a>(frames: &mut Vec<Frame<'a>>, unopened: Error) -> Result<()> {
    if frames.len() < 2 {
        return Err(unopened);
    }
    let node = match frames.pop() {
        Some(Frame {
            open: Open::For(line, for_loop),
            body,
        }) => Node::For(line, for_loop, body),
        Some(Frame {
            open: Open::While(line, cond),
            body,
        }) => Node::While(line, cond, body),
        _ => return Err(error!(InternalError; "NO BLOCK")),
    };
    append(frames, node);
    Ok(())
}

fn append<'a>(frames: &mut [Frame<'a>], node: Node<'a>) {
    if let Some(frame) = frames.last_mut() {
        frame.body.push(node);
    }
}

enum Flow {
    Continue,
    Return(Option<&'static str>),
}

struct Machine<'a> {
    subs: &'a HashMap<Rc<str>, Vec<Node<'a>>>,
    vars: HashMap<Rc<str>, Val>,
    data: Vec<Val>,
    data_ptr: usize,
    restore: HashMap<Rc<str>, usize>,
    runtime: &'a mut Runtime,
    interrupt: &'a AtomicBool,
    calls: &'a mut Stack<Rc<str>>,
}

impl<'a> Machine<'a> {
    fn block(&mut self, nodes: &'a [Node<'a>]) -> Result<Flow> {
        for node in nodes {
            if let Flow::Return(sentinel) = self.node(node)? {
                return Ok(Flow::Return(sentinel));
            }
        }
        Ok(Flow::Continue)
    }

    fn node(&mut self, node: &'a Node<'a>) -> Result<Flow> {
        match node {
            Node::Stmt(line, stmt) => self.stmt(stmt).map_err(|e| e.in_line_number(Some(*line))),
            Node::If(line, cond, then, otherwise) => {
                let truthy = self
                    .eval(cond)
                    .map_err(|e| e.in_line_number(Some(*line)))?
                    .is_truthy();
                if truthy {
                    self.block(then)
                } else if let Some(otherwise) = otherwise {
                    self.block(otherwise)
                } else {
                    Ok(Flow::Continue)
                }
            }
            Node::For(line, for_loop, body) => self
                .r#for(for_loop, body)
                .map_err(|e| e.in_line_number(Some(*line))),
            Node::While(line, cond, body) => loop {
                self.poll_interrupt()
                    .map_err(|e| e.in_line_number(Some(*line)))?;
                let truthy = self
                    .eval(cond)
                    .map_err(|e| e.in_line_number(Some(*line)))?
                    .is_truthy();
                if !truthy {
                    return Ok(Flow::Continue);
                }
                if let Flow::Return(sentinel) = self.block(body)? {
                    return Ok(Flow::Return(sentinel));
                }
            },
        }
    }

    fn r#for(&mut self, for_loop: &'a ForLoop<'a>, body: &'a [Node<'a>]) -> Result<Flow> {
        let start = self.eval(for_loop.start)?;
        self.vars.insert(for_loop.var.clone(), start);
        loop {
            self.poll_interrupt()?;
            let var = self.fetch(for_loop.var)?;
            let end = self.eval(for_loop.end)?;
            let up = match for_loop.dir {
                Direction::Up => true,
                Direction::Down => false,
                Direction::Dynamic => {
                    let step = self.eval(for_loop.step)?;
                    Operation::less_equal_bool(&Val::Number(0.0), &step)?
                }
            };
            let running = if up {
                Operation::less_equal_bool(&var, &end)?
            } else {
                Operation::less_equal_bool(&end, &var)?
            };
            if !running {
                return Ok(Flow::Continue);
            }
            if let Flow::Return(sentinel) = self.block(body)? {
                return Ok(Flow::Return(sentinel));
            }
            let step = self.eval(for_loop.step)?;
            let var = self.fetch(for_loop.var)?;
            self.vars
                .insert(for_loop.var.clone(), Operation::add(var, step)?);
        }
    }

    fn poll_interrupt(&self) -> Result<()> {
        if self.interrupt.load(Ordering::Relaxed) {
            return Err(error!(Break));
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &'a Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Assign(target, expr) => {
                let val = self.eval(expr)?;
                self.store(target, val)?;
            }
            Stmt::Cls => self.runtime.cls(),
            Stmt::Dim(name, dims, is_string) => {
                let dims = self.eval_list(dims)?;
                let init = if *is_string {
                    Val::from("")
                } else {
                    Val::default()
                };
                let array = self.runtime.dim_array(&dims, init)?;
                self.vars.insert(name.clone(), array);
            }
            Stmt::End => return Ok(Flow::Return(Some("end"))),
            Stmt::Stop => return Ok(Flow::Return(Some("stop"))),
            Stmt::Return => return Ok(Flow::Return(None)),
            Stmt::Gosub(label) => self.call(label)?,
            Stmt::OnGosub(index, labels) => {
                for label in labels {
                    if !self.subs.contains_key(label) {
                        return Err(error!(UndefinedLine; "NO SUCH SUBROUTINE"));
                    }
                }
                let n = self.eval(index)?.to_number()? - 1.0;
                if n >= 0.0 && n.fract() == 0.0 {
                    if let Some(label) = labels.get(n as usize) {
                        self.call(label)?;
                    }
                }
            }
            Stmt::Print(args) => {
                let args = self.eval_list(args)?;
                self.runtime.print(&args);
            }
            Stmt::Read(target) => {
                let val = match self.data.get(self.data_ptr) {
                    Some(val) => val.clone(),
                    None => return Err(error!(OutOfData)),
                };
                self.data_ptr += 1;
                self.store(target, val)?;
            }
            Stmt::Rem(_) => {}
            Stmt::Restore(label) => match self.restore.get(label) {
                Some(index) => self.data_ptr = *index,
                None => return Err(error!(UndefinedLine; "NO SUCH RESTORE LABEL")),
            },
            Stmt::For { .. } | Stmt::If(..) | Stmt::Next(_) | Stmt::While(_) | Stmt::Wend => {
                return Err(error!(InternalError; "UNRESOLVED BLOCK"))
            }
        }
        Ok(Flow::Continue)
    }

    /// A subroutine's RETURN, END or STOP all come back here.
    fn call(&mut self, label: &Rc<str>) -> Result<()> {
        self.poll_interrupt()?;
        let subs = self.subs;
        let body = match subs.get(label) {
            Some(body) => body,
            None => return Err(error!(UndefinedLine; "NO SUCH SUBROUTINE")),
        };
        self.calls.push(label.clone())?;
        self.block(body)?;
        self.calls.pop()?;
        Ok(())
    }

    fn fetch(&self, name: &Rc<str>) -> Result<Val> {
        match self.vars.get(name) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(InternalError; "UNDECLARED VARIABLE")),
        }
    }

    fn store(&mut self, target: &Target, val: Val) -> Result<()> {
        match target {
            Target::Var(name) => {
                self.vars.insert(name.clone(), val);
                Ok(())
            }
            Target::Index(name, indices) => {
                let indices = self.eval_list(indices)?;
                let mut array = self.fetch(name)?;
                let (last, path) = match indices.split_last() {
                    Some(split) => split,
                    None => return Err(error!(SubscriptOutOfRange)),
                };
                for index in path {
                    array = element(&array, index)?;
                }
                match array {
                    Val::Array(vec) => {
                        let mut vec = vec.borrow_mut();
                        let i = subscript(last, vec.len())?;
                        vec[i] = val;
                        Ok(())
                    }
                    _ => Err(error!(TypeMismatch)),
                }
            }
        }
    }

    fn eval_list(&self, exprs: &[Expr]) -> Result<Vec<Val>> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }

    fn eval(&self, expr: &Expr) -> Result<Val> {
        match expr {
            Expr::Num(_, n) => Ok(Val::Number(*n)),
            Expr::Str(s) => Ok(Val::String(s.clone())),
            Expr::Var(name) => self.fetch(name),
            Expr::Index(name, indices) => {
                let mut val = self.fetch(name)?;
                for index in indices {
                    let index = self.eval(index)?;
                    val = element(&val, &index)?;
                }
                Ok(val)
            }
            Expr::Neg(expr) => Operation::negate(self.eval(expr)?),
            Expr::Not(expr) => Operation::not(self.eval(expr)?),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                match op {
                    BinOp::Add => Operation::add(lhs, rhs),
                    BinOp::Sub => Operation::subtract(lhs, rhs),
                    BinOp::Mul => Operation::multiply(lhs, rhs),
                    BinOp::Div => Operation::divide(lhs, rhs),
                    BinOp::IntDiv => Operation::divide_int(lhs, rhs),
                    BinOp::Mod => Operation::modulo(lhs, rhs),
                    BinOp::And => Operation::and(lhs, rhs),
                    BinOp::Or => Operation::or(lhs, rhs),
                    BinOp::Xor => Operation::xor(lhs, rhs),
                }
            }
            Expr::Pow(lhs, rhs) => Operation::power(self.eval(lhs)?, self.eval(rhs)?),
            Expr::Compare(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                match op {
                    CmpOp::Eq => Operation::equal(lhs, rhs),
                    CmpOp::Ne => Operation::not_equal(lhs, rhs),
                    CmpOp::Lt => Operation::less(lhs, rhs),
                    CmpOp::Le => Operation::less_equal(lhs, rhs),
                    CmpOp::Gt => Operation::greater(lhs, rhs),
                    CmpOp::Ge => Operation::greater_equal(lhs, rhs),
                }
            }
            Expr::Call(builtin, args) => Function::call(*builtin, self.eval_list(args)?),
        }
    }
}

fn element(array: &Val, index: &Val) -> Result<Val> {
    match array {
        Val::Array(vec) => {
            let vec = vec.borrow();
            let i = subscript(index, vec.len())?;
            Ok(vec[i].clone())
        }
        _ => Err(error!(TypeMismatch)),
    }
}

fn subscript(index: &Val, len: usize) -> Result<usize> {
    let n = index.to_number()?;
    if n < 0.0 || n.fract() != 0.0 || n >= len as f64 {
        return Err(error!(SubscriptOutOfRange));
    }
    Ok(n as usize)
}
