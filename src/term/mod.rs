use ansi_term::Style;
use anyhow::{bail, Context};
use basic::lang::Error;
use basic::mach::{compile, translate, Sandbox};
use linefeed::{Completer, Completion, DefaultTerminal, Interface, Prompter, ReadResult, Terminal};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Interactive entry. Lines are collected into a listing until one of
/// the commands `RUN`, `LIST`, `NEW`, `JS`, `LOAD` or `SAVE` is typed.
pub fn main(interrupted: Arc<AtomicBool>) {
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let interface = Arc::new(Interface::new("BASIC")?);
    let mut sandbox = Sandbox::new().with_interrupt(interrupted);
    let screen = interface.clone();
    sandbox.runtime_mut().set_on_cls(move || {
        let _ = screen.write_fmt(format_args!("\x1b[2J\x1b[1;1H"));
    });
    let mut listing: Vec<String> = vec![];
    let mut print_ready = true;

    loop {
        if print_ready {
            print_ready = false;
            interface.write_fmt(format_args!("READY.\n"))?;
        }
        interface.set_completer(Arc::new(LineCompleter::new(listing.clone())));
        let input = match interface.read_line()? {
            ReadResult::Input(input) => input,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let (command, argument) = split_command(&input);
        match command.as_str() {
            "RUN" => {
                run(&interface, &mut sandbox, &listing)?;
                print_ready = true;
            }
            "LIST" => {
                for line in &listing {
                    interface.write_fmt(format_args!("{}\n", line))?;
                }
                print_ready = true;
            }
            "NEW" => {
                listing.clear();
                print_ready = true;
            }
            "JS" => {
                interface.write_fmt(format_args!("{}\n", compile(&listing.join("\n"))))?;
                print_ready = true;
            }
            "LOAD" => {
                match load(argument) {
                    Ok(lines) => listing = lines,
                    Err(error) => show_error(&interface, &format!("{:#}", error))?,
                }
                print_ready = true;
            }
            "SAVE" => {
                if let Err(error) = save(&listing, argument) {
                    show_error(&interface, &format!("{:#}", error))?;
                }
                print_ready = true;
            }
            _ => {
                if !input.trim().is_empty() {
                    listing.push(input.clone());
                    interface.add_history_unique(input);
                }
            }
        }
    }
    Ok(())
}

/// Command word in upper case and its unquoted argument.
fn split_command(input: &str) -> (String, &str) {
    let input = input.trim();
    let (word, rest) = match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    };
    (word.to_ascii_uppercase(), rest.trim_matches('"'))
}

fn run(
    interface: &Interface<DefaultTerminal>,
    sandbox: &mut Sandbox,
    listing: &[String],
) -> std::io::Result<()> {
    let program = match translate(&listing.join("\n")) {
        Ok(program) => program,
        Err(error) => return report(interface, listing, &error),
    };
    debug!("running {} lines", listing.len());
    match sandbox.run(&program) {
        Ok(sentinel) => {
            let output = format!("{}{}", sandbox.runtime().output(), sentinel);
            if output.is_empty() || output.ends_with('\n') {
                interface.write_fmt(format_args!("{}", output))
            } else {
                interface.write_fmt(format_args!("{}\n", output))
            }
        }
        Err(error) => {
            interface.write_fmt(format_args!("{}", sandbox.runtime().output()))?;
            report(interface, listing, &error)
        }
    }
}

/// The error, then the offending line with its columns underlined.
fn report(
    interface: &Interface<DefaultTerminal>,
    listing: &[String],
    error: &Error,
) -> std::io::Result<()> {
    show_error(interface, &format!("ERROR: {}", error))?;
    let line = error
        .line_number()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| listing.get(index));
    if let Some(line) = line {
        interface.write_fmt(format_args!("{}\n", decorate_line(line, &error.column())))?;
    }
    Ok(())
}

fn show_error(interface: &Interface<DefaultTerminal>, message: &str) -> std::io::Result<()> {
    interface.write_fmt(format_args!("{}\n", Style::new().bold().paint(message)))
}

fn decorate_line(line: &str, column: &std::ops::Range<usize>) -> String {
    let style = Style::new().underline();
    let prefix = format!("{}", style.prefix());
    let suffix = format!("{}", style.suffix());
    let mut out = String::new();
    let mut under_on = false;
    let mut index = 0;
    for ch in line.chars() {
        let do_under = column.contains(&index);
        if under_on && !do_under {
            out.push_str(&suffix);
        } else if !under_on && do_under {
            out.push_str(&prefix);
        }
        under_on = do_under;
        out.push(ch);
        index += 1;
    }
    if column.start == index && column.end > index {
        under_on = true;
        out.push_str(&prefix);
        out.push(' ');
    }
    if under_on {
        out.push_str(&suffix);
    }
    out
}

/// Typing a line's label then TAB brings the line back for editing.
struct LineCompleter {
    listing: Vec<String>,
}

impl LineCompleter {
    fn new(listing: Vec<String>) -> LineCompleter {
        LineCompleter { listing }
    }
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let label = prompter.buffer().trim();
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let line = self.listing.iter().find(|line| {
            let line = line.trim_start();
            line.starts_with(label)
                && !line[label.len()..].starts_with(|c: char| c.is_ascii_digit())
        })?;
        let mut comp = Completion::simple(line.trim_start().to_string());
        comp.suffix = linefeed::complete::Suffix::None;
        Some(vec![comp])
    }
}

fn load(filename: &str) -> anyhow::Result<Vec<String>> {
    let file = File::open(filename).with_context(|| format!("cannot open {}", filename))?;
    let mut listing = vec![];
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("cannot read line {} of {}", index + 1, filename))?;
        listing.push(line);
    }
    debug!("loaded {} lines from {}", listing.len(), filename);
    Ok(listing)
}

fn save(listing: &[String], filename: &str) -> anyhow::Result<()> {
    if listing.is_empty() {
        bail!("nothing to save");
    }
    let mut file = File::create(filename).with_context(|| format!("cannot create {}", filename))?;
    for line in listing {
        writeln!(file, "{}", line).with_context(|| format!("cannot write {}", filename))?;
    }
    Ok(())
}
