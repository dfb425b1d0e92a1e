//! Script and REPL front ends over a `CommandExecutor`.

use crate::backend::Backend;
use crate::executor::{CommandExecutor, ExecutorError};
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("line {line} ('{command}'): {message}")]
    Script {
        line: usize,
        command: String,
        message: String,
    },
}

/// Where reports and errors go. Reports on `out`, failures on `err`.
pub struct Console<'a> {
    out: Box<dyn FnMut(&str) + 'a>,
    err: Box<dyn FnMut(&str) + 'a>,
}

impl<'a> Console<'a> {
    pub fn new(out: impl FnMut(&str) + 'a, err: impl FnMut(&str) + 'a) -> Self {
        Self {
            out: Box::new(out),
            err: Box::new(err),
        }
    }

    pub fn stdio() -> Self {
        Self::new(|msg| println!("{}", msg), |msg| eprintln!("{}", msg))
    }

    fn report(&mut self, msg: &str) {
        (self.out)(msg)
    }

    fn fail(&mut self, msg: &str) {
        (self.err)(msg)
    }
}

pub struct ScriptOptions {
    pub stop_on_error: bool,
}

pub struct ReplOptions<'a> {
    pub banner_lines: &'a [&'a str],
    pub prompt: &'a str,
    pub exit_commands: &'a [&'a str],
    pub handle_ctrl_c: bool,
}

/// Error text with the recovery hint appended, when there is one.
pub fn describe(error: &ExecutorError) -> String {
    match error.hint() {
        Some(hint) => format!("{} (hint: {})", error, hint),
        None => error.to_string(),
    }
}

/// Numbered commands of a script. Blank lines and `#` comments are skipped.
fn script_commands(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

pub async fn run_file<B: Backend + ?Sized>(
    backend: &mut B,
    executor: &mut CommandExecutor,
    console: &mut Console<'_>,
    path: &str,
    options: ScriptOptions,
) -> Result<(), CliError> {
    let content = tokio::fs::read_to_string(path).await?;
    run_script(backend, executor, console, &content, options).await
}

/// Run each command in order. With `stop_on_error`, the first failure ends the script.
pub async fn run_script<B: Backend + ?Sized>(
    backend: &mut B,
    executor: &mut CommandExecutor,
    console: &mut Console<'_>,
    content: &str,
    options: ScriptOptions,
) -> Result<(), CliError> {
    for (line, command) in script_commands(content) {
        match executor.execute_line(backend, command).await {
            Ok(result) => console.report(&result.output),
            Err(e) => {
                let failure = CliError::Script {
                    line,
                    command: command.to_string(),
                    message: describe(&e),
                };
                console.fail(&failure.to_string());
                if options.stop_on_error {
                    return Err(failure);
                }
            }
        }
    }
    Ok(())
}

enum Prompted {
    Command(String),
    Blank,
    Quit,
}

async fn prompt_once(
    reader: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
    options: &ReplOptions<'_>,
) -> io::Result<Prompted> {
    let line = if options.handle_ctrl_c {
        tokio::select! {
            line = reader.next_line() => line?,
            _ = tokio::signal::ctrl_c() => return Ok(Prompted::Quit),
        }
    } else {
        reader.next_line().await?
    };
    Ok(classify(line, options.exit_commands))
}

fn classify(line: Option<String>, exit_commands: &[&str]) -> Prompted {
    let Some(line) = line else {
        return Prompted::Quit;
    };
    let command = line.trim();
    if command.is_empty() {
        Prompted::Blank
    } else if exit_commands.contains(&command) {
        Prompted::Quit
    } else {
        Prompted::Command(command.to_string())
    }
}

pub async fn run_repl<B: Backend + ?Sized>(
    backend: &mut B,
    executor: &mut CommandExecutor,
    console: &mut Console<'_>,
    options: ReplOptions<'_>,
) -> Result<(), CliError> {
    for line in options.banner_lines {
        console.report(line);
    }

    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        print!("{}", options.prompt);
        stdout.flush()?;

        match prompt_once(&mut reader, &options).await? {
            Prompted::Command(command) => match executor.execute_line(backend, &command).await {
                Ok(result) => console.report(&result.output),
                Err(e) => console.fail(&format!("Error: {}", describe(&e))),
            },
            Prompted::Blank => continue,
            Prompted::Quit => break,
        }
    }
    Ok(())
}
