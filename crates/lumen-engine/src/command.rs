use crate::controller::renderer::{ParseRowIdError, RowId};
use std::str::FromStr;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GoTo(String),
    /// Scan the active document.
    Check,
    /// Close and reopen the report panel.
    Open,
    /// Print the report currently on display.
    Show,
    /// Click a report row.
    Select(RowId),
    Help,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Row(#[from] ParseRowIdError),
}

pub const HELP_TEXT: &str = "\
Commands:
  goto <url>          open a page
  check               check the page for contrast issues
  open                reopen the report panel without scanning
  show                print the current report
  select <n>.<m>      highlight element m of issue n
  help                show this help
  exit | quit         leave";

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "goto" | "go" | "navigate" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("goto"));
                }
                Ok(Command::GoTo(normalize_url(rest)))
            }
            "check" | "scan" => Ok(Command::Check),
            "open" => Ok(Command::Open),
            "show" => Ok(Command::Show),
            "select" | "sel" => {
                if rest.is_empty() {
                    return Err(ParseError::MissingArgument("select"));
                }
                Ok(Command::Select(rest.parse()?))
            }
            "help" | "?" => Ok(Command::Help),
            _ => Err(ParseError::Unknown(trimmed.to_string())),
        }
    }
}

/// Bare hosts get `https://`; anything with a scheme is left alone.
fn normalize_url(raw: &str) -> String {
    let raw = raw.trim_matches('"');
    if raw.contains("://") || raw.starts_with("data:") || raw.starts_with("about:") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}
