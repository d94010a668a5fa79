//! The prompt loop.
//!
//! Generic over its input and output so it can be driven by a script in
//! tests. Navigation errors never end the loop; they are shown and the user
//! is prompted again.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use csvt_core::{NavigationError, Navigator, SessionState};
use csvt_persistence::SessionDocument;

use crate::logging::redact_value;
use crate::prompt::{Action, parse_action};
use crate::render::{HELP, screen, tag_choices};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    EndOfInput,
}

/// Prompt for actions until `q` or end of input.
///
/// `on_change` runs after every action that changed the session; its errors
/// are shown as warnings and the loop continues.
pub fn run_loop<R, W, F>(
    document: &mut SessionDocument,
    input: R,
    out: &mut W,
    mut on_change: F,
) -> Result<LoopExit>
where
    R: BufRead,
    W: Write,
    F: FnMut(&mut SessionDocument) -> Result<()>,
{
    let mut lines = input.lines();
    loop {
        writeln!(out)?;
        writeln!(out, "{}", screen(&document.state))?;
        write!(out, "Action: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(LoopExit::EndOfInput);
        };
        let line = line.context("read action")?;

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        match &action {
            Action::Quit => return Ok(LoopExit::Quit),
            Action::Help => {
                writeln!(out, "{HELP}")?;
                writeln!(out, "{}", tag_choices(&document.state))?;
                continue;
            }
            _ => {}
        }

        match apply(&mut document.state, &action) {
            Ok(true) => {}
            Ok(false) => {
                if let Action::AddTag(tag) = &action {
                    writeln!(out, "tag '{tag}' is already registered")?;
                }
                continue;
            }
            Err(err) => {
                report(out, &document.state, &err)?;
                continue;
            }
        }
        if let Err(err) = on_change(document) {
            warn!(error = %err, "autosave failed");
            writeln!(out, "warning: {err:#}")?;
        }
    }
}

/// Apply one action. Returns whether the session changed.
fn apply(session: &mut SessionState, action: &Action) -> Result<bool, NavigationError> {
    let mut nav = Navigator::new(session);
    match action {
        Action::Previous => {
            nav.previous();
        }
        Action::Advance => {
            nav.advance();
        }
        Action::NextUntagged => {
            nav.next();
        }
        Action::PreviousUntagged => {
            nav.previous_unannotated();
        }
        Action::Skip => {
            nav.skip();
        }
        Action::Jump(index) => {
            nav.jump_to(*index)?;
        }
        Action::AddTag(tag) => return Ok(nav.add_tag(tag)),
        Action::Tag(tag) => {
            debug!(tag = redact_value(tag), "tag entered");
            nav.tag_current(tag)?;
        }
        Action::Help | Action::Quit => return Ok(false),
    }
    Ok(true)
}

fn report<W: Write>(out: &mut W, session: &SessionState, err: &NavigationError) -> Result<()> {
    match err {
        NavigationError::Index(err) if err.len == 0 => {
            writeln!(out, "error: there are no records")?;
        }
        NavigationError::Index(err) => {
            writeln!(
                out,
                "error: no record {}; records are numbered 1 to {}",
                err.index + 1,
                err.len
            )?;
        }
        NavigationError::UnknownTag(err) => {
            writeln!(out, "error: {err}")?;
            writeln!(out, "{}", tag_choices(session))?;
            writeln!(out, "use +{} to register it", err.tag)?;
        }
        NavigationError::NoCurrentRecord => {
            writeln!(
                out,
                "error: every record is tagged; use < or g N to pick one"
            )?;
        }
    }
    Ok(())
}
