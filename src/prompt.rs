//! Interactive questions asked on the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::SweepConfig;
use crate::dedup::{Confirm, DuplicateBatch};
use crate::error::{Result, SweeperError};
use crate::scanner::format_size;

/// Line-oriented answer source.
pub trait Input: Send {
    /// Next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

fn trim_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

impl Input for io::Stdin {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(line)))
    }
}

impl Input for io::Cursor<Vec<u8>> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(line)))
    }
}

fn ask(input: &mut dyn Input, out: &mut dyn Write, question: &str) -> Result<Option<String>> {
    write!(out, "{}", question).map_err(SweeperError::Prompt)?;
    out.flush().map_err(SweeperError::Prompt)?;
    input.next_line().map_err(SweeperError::Prompt)
}

/// `y` or `yes` in any case.
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// What the user asked for before the sweep starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operations {
    pub root: PathBuf,
    pub purge_cache: bool,
    /// When false nothing should run at all.
    pub dedup: bool,
    /// Size floor in bytes.
    pub min_size: u64,
}

/// Ask which operations to run, falling back to `defaults` for empty answers.
///
/// The size question is only asked when duplicates are to be removed.
pub fn select_operations(
    input: &mut dyn Input,
    out: &mut dyn Write,
    defaults: &SweepConfig,
) -> Result<Operations> {
    let root = ask(
        input,
        out,
        "Enter the directory to scan (leave empty for the current directory): ",
    )?
    .ok_or_else(|| SweeperError::Prompt(io::Error::from(io::ErrorKind::UnexpectedEof)))?;
    let root = match root.trim() {
        "" => PathBuf::from("."),
        dir => PathBuf::from(dir),
    };

    let names = defaults.cache_dir_names.join(", ");
    let purge_question = format!("Would you like to delete {} folders? [y/N] ", names);
    let purge_cache = ask(input, out, &purge_question)?
        .map(|a| is_yes(&a))
        .unwrap_or(defaults.purge_cache_dirs);

    let dedup = ask(input, out, "Would you like to delete duplicate files? [y/N] ")?
        .map(|a| is_yes(&a))
        .unwrap_or(false);

    let mut min_size = defaults.min_size;
    if dedup {
        let question = format!(
            "Enter the minimum file size for duplicate deletion in KB (default {}): ",
            defaults.min_size / 1024
        );
        if let Some(answer) = ask(input, out, &question)? {
            let answer = answer.trim();
            if !answer.is_empty() {
                match answer.parse::<u64>() {
                    Ok(kb) => min_size = kb.saturating_mul(1024),
                    Err(_) => {
                        writeln!(out, "Not a whole number of KB, keeping the default.")
                            .map_err(SweeperError::Prompt)?;
                    }
                }
            }
        }
    }

    Ok(Operations {
        root,
        purge_cache,
        dedup,
        min_size,
    })
}

/// Asks on `output` and reads the answer from `input` for every batch.
pub struct PromptConfirmer<I, W> {
    input: I,
    output: W,
}

impl<I: Input, W: Write + Send> PromptConfirmer<I, W> {
    pub fn new(input: I, output: W) -> Self {
        Self { input, output }
    }
}

impl<I: Input, W: Write + Send> Confirm for PromptConfirmer<I, W> {
    fn confirm(&mut self, batch: &DuplicateBatch) -> Result<bool> {
        let question = format!(
            "Delete these files to save {} of space on your computer? [y/N] ",
            format_size(batch.total_size())
        );
        let answer = ask(&mut self.input, &mut self.output, &question)?;
        Ok(answer.map(|a| is_yes(&a)).unwrap_or(false))
    }
}

/// Fixed answer for every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoConfirm {
    Yes,
    No,
}

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _batch: &DuplicateBatch) -> Result<bool> {
        Ok(*self == AutoConfirm::Yes)
    }
}
