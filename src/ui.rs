// UI layer: the interactive loop. Reads one name per line, answers it and
// keeps going until the user quits or input ends.

use crate::api::NameLookup;
use crate::error::Result;
use crate::retry::Backoff;
use crate::validate::check_name;
use dialoguer::console::{measure_text_width, Key, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, warn};

pub const GREETING: &str =
    "Hello! Tell me your first name and I'll share its meaning & likely origin.";
pub const FAREWELL: &str = "Bye!";
pub const PROMPT: &str = "First name";

/// Case-insensitive words that end the session.
pub const QUIT_KEYWORDS: [&str; 3] = ["exit", "quit", "q"];

/// A source of input lines. `Ok(None)` means end-of-input or an interrupt;
/// both end the session like a quit keyword.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Interactive terminal input, read key by key.
///
/// Keys come from `read_key_raw`, so Ctrl-C arrives as a key instead of a
/// SIGINT and can end the session like end-of-input.
pub struct TerminalSource {
    term: Term,
}

impl TerminalSource {
    pub fn new() -> Self {
        TerminalSource {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for TerminalSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut echo = self.term.clone();
        write!(echo, "{prompt}: ")?;
        echo.flush()?;

        let term = self.term.clone();
        edit_line(|| term.read_key_raw(), &mut echo)
    }
}

/// Collect one line from `next_key`, echoing edits to `echo`.
///
/// Enter submits the line. Ctrl-C, Ctrl-D on an empty line and a closed
/// terminal return `None`. Other control keys are ignored.
pub fn edit_line<K, W>(mut next_key: K, echo: &mut W) -> io::Result<Option<String>>
where
    K: FnMut() -> io::Result<Key>,
    W: Write + ?Sized,
{
    let mut line = String::new();
    loop {
        let key = match next_key() {
            Ok(key) => key,
            Err(e) if is_end_of_session(&e) => Key::CtrlC,
            Err(e) => return Err(e),
        };

        match key {
            Key::Enter => {
                writeln!(echo)?;
                return Ok(Some(line));
            }
            Key::CtrlC => {
                writeln!(echo)?;
                return Ok(None);
            }
            Key::Char('\x04') if line.is_empty() => {
                writeln!(echo)?;
                return Ok(None);
            }
            Key::Backspace => {
                if let Some(ch) = line.pop() {
                    let width = measure_text_width(&ch.to_string()).max(1);
                    write!(echo, "{}", "\x08 \x08".repeat(width))?;
                }
            }
            Key::Char(ch) if !ch.is_control() => {
                line.push(ch);
                write!(echo, "{ch}")?;
            }
            _ => continue,
        }
        echo.flush()?;
    }
}

fn is_end_of_session(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
    )
}

/// Line-by-line input from a pipe or file, with the prompt echoed to `out`.
pub struct PipeSource<R, W> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> PipeSource<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        PipeSource { reader, out }
    }
}

impl<R: BufRead, W: Write> LineSource for PipeSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}: ")?;
        self.out.flush()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Err(e) if is_end_of_session(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Whether `line` (already trimmed) is a quit keyword.
pub fn is_quit(line: &str) -> bool {
    QUIT_KEYWORDS.iter().any(|k| line.eq_ignore_ascii_case(k))
}

/// Produce the text shown for one non-empty, non-quit line: a validation
/// message, the answer, or a recoverable error message.
pub fn respond<L>(lookup: &L, backoff: &Backoff, raw: &str) -> String
where
    L: NameLookup + ?Sized,
{
    let name = match check_name(raw) {
        Ok(name) => name,
        Err(rejection) => {
            debug!(?rejection, "name rejected");
            return rejection.message().to_string();
        }
    };

    let spinner = spinner(name);
    let result = backoff.run(|| lookup.describe(name));
    spinner.finish_and_clear();

    match result {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "lookup failed after retries");
            format!("Sorry, I couldn't look that name up right now: {}", e.brief())
        }
    }
}

fn spinner(name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Looking up {name}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Run the loop until a quit keyword, end-of-input or interrupt.
pub fn run<L, S, W>(lookup: &L, source: &mut S, out: &mut W, backoff: &Backoff) -> Result<()>
where
    L: NameLookup + ?Sized,
    S: LineSource + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "{GREETING}")?;
    writeln!(out, "Type 'exit' to quit. \n")?;

    loop {
        let raw = match source.read_line(PROMPT)? {
            Some(line) => line,
            None => {
                writeln!(out, "{FAREWELL}")?;
                break;
            }
        };

        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit(line) {
            writeln!(out, "{FAREWELL}")?;
            break;
        }

        let answer = respond(lookup, backoff, line);
        writeln!(out, "\n{answer}\n")?;
        out.flush()?;
    }
    Ok(())
}

/// Entry point used by the binary: reads key by key when both stdin and
/// stdout are a terminal, otherwise line by line from the pipe.
pub fn main_loop<L: NameLookup + ?Sized>(lookup: &L) -> Result<()> {
    let backoff = Backoff::default();
    let stdin = io::stdin();
    let mut out = io::stdout();

    if stdin.is_terminal() && Term::stdout().is_term() {
        run(lookup, &mut TerminalSource::new(), &mut out, &backoff)
    } else {
        let mut source = PipeSource::new(stdin.lock(), io::stdout());
        run(lookup, &mut source, &mut out, &backoff)
    }
}
