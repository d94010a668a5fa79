//! Parsing of interactive commands.

use thiserror::Error;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Previous,
    Advance,
    NextUntagged,
    PreviousUntagged,
    Skip,
    /// 0-based record index.
    Jump(usize),
    AddTag(String),
    Help,
    Quit,
    Tag(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("expected a record number after 'g'")]
    MissingNumber,

    #[error("'{0}' is not a record number (records start at 1)")]
    BadNumber(String),

    #[error("a tag cannot be blank")]
    BlankTag,

    #[error("'{0}' is a command and cannot be used as a tag")]
    ReservedTag(String),
}

/// Words reserved for commands; they cannot be used as tags.
pub const RESERVED: [&str; 10] = ["<", ">", "[", "]", "«", "»", "s", "?", "q", "quit"];

/// Whether `tag` would be read as a command at the prompt, which makes it
/// impossible to assign.
pub fn is_reserved_tag(tag: &str) -> bool {
    let tag = tag.trim();
    RESERVED.contains(&tag) || tag == "g" || tag.starts_with("g ") || tag.starts_with('+')
}

/// Parse one input line.
pub fn parse_action(line: &str) -> Result<Action, PromptError> {
    let input = line.trim();
    let action = match input {
        "<" => Action::Previous,
        ">" => Action::Advance,
        "]" | "»" => Action::NextUntagged,
        "[" | "«" => Action::PreviousUntagged,
        "" | "s" => Action::Skip,
        "?" => Action::Help,
        "q" | "quit" => Action::Quit,
        "g" => return Err(PromptError::MissingNumber),
        _ => {
            if let Some(number) = input.strip_prefix("g ") {
                let number = number.trim();
                return match number.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(Action::Jump(n - 1)),
                    _ => Err(PromptError::BadNumber(number.to_string())),
                };
            }
            if let Some(tag) = input.strip_prefix('+') {
                let tag = tag.trim();
                if tag.is_empty() {
                    return Err(PromptError::BlankTag);
                }
                if is_reserved_tag(tag) {
                    return Err(PromptError::ReservedTag(tag.to_string()));
                }
                return Ok(Action::AddTag(tag.to_string()));
            }
            Action::Tag(input.to_string())
        }
    };
    Ok(action)
}
