//! Commands typed at the interactive session prompt.

use std::path::PathBuf;

use shared::domain::{EditMode, Style};

pub const HELP: &str = "\
commands:
  generate <medical text>   create a new mnemonic scene (replaces the current one)
  edit <instruction>        change the current scene
  style <name>              Cartoon, Realistic, Minimalist or Sketchy
  mode <mode>               context-aware or context-free edits
  show                      print the current mnemonic key
  save [path]               write the current image (and key) to disk
  help                      show this text
  quit                      leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Generate { topic: String },
    Edit { instruction: String },
    /// Unrecognized names resolve to the fallback style; `recognized` lets
    /// the prompt say so.
    SetStyle { style: Style, recognized: bool },
    SetMode(EditMode),
    Show,
    Save { path: Option<PathBuf> },
    Help,
    Quit,
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::Generate { .. } => "generate",
            SessionCommand::Edit { .. } => "edit",
            SessionCommand::SetStyle { .. } => "style",
            SessionCommand::SetMode(_) => "mode",
            SessionCommand::Show => "show",
            SessionCommand::Save { .. } => "save",
            SessionCommand::Help => "help",
            SessionCommand::Quit => "quit",
        }
    }
}

/// Parses one prompt line. `Ok(None)` is a blank line.
///
/// Empty generate/edit arguments are passed through so the orchestrator
/// reports them like any other failed operation.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "generate" | "gen" | "g" => SessionCommand::Generate {
            topic: rest.to_string(),
        },
        "edit" | "e" => SessionCommand::Edit {
            instruction: rest.to_string(),
        },
        "style" => SessionCommand::SetStyle {
            style: Style::from_tag(rest),
            recognized: Style::parse_known(rest).is_some(),
        },
        "mode" => {
            let mode = EditMode::parse(rest).ok_or_else(|| {
                format!("unknown edit mode '{rest}' (context-aware or context-free)")
            })?;
            SessionCommand::SetMode(mode)
        }
        "show" | "key" => SessionCommand::Show,
        "save" => SessionCommand::Save {
            path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        },
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}
