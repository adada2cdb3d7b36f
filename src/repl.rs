//! Line-oriented lookup prompt

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::warn;

use crate::store::Store;

/// What one line of input asks for
#[derive(Debug, Clone, PartialEq)]
pub enum PromptCommand {
    Exit,
    Lookup(u32),
    OutOfRange,
    Invalid,
}

pub fn parse_input(line: &str, max_id: u32) -> PromptCommand {
    let input = line.trim().to_lowercase();

    if input == "exit" {
        return PromptCommand::Exit;
    }
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return PromptCommand::Invalid;
    }

    match input.parse::<u32>() {
        Ok(id) if (1..=max_id).contains(&id) => PromptCommand::Lookup(id),
        _ => PromptCommand::OutOfRange,
    }
}

/// Print the stored view of one id
pub fn print_lookup(db_path: &Path, id: u32, out: &mut impl Write) -> Result<()> {
    let result = Store::open(db_path).and_then(|store| store.lookup(i64::from(id)));

    match result {
        Ok(Some(view)) => writeln!(out, "{}", view)?,
        Ok(None) => writeln!(out, "No Pokémon found with ID {}", id)?,
        Err(e) => {
            warn!(id, error = %e, "lookup failed");
            writeln!(out, "Database error: {}", e)?;
        }
    }

    Ok(())
}

/// Prompt until `exit` or end of input
pub fn run_prompt(
    input: impl BufRead,
    out: &mut impl Write,
    db_path: &Path,
    max_id: u32,
) -> Result<()> {
    let mut lines = input.lines();

    loop {
        write!(out, "\nEnter a Pokémon ID (1-{}) or 'exit' to quit: ", max_id)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };

        match parse_input(&line?, max_id) {
            PromptCommand::Exit => {
                writeln!(out, "Program terminated.")?;
                break;
            }
            PromptCommand::Lookup(id) => print_lookup(db_path, id, out)?,
            PromptCommand::OutOfRange => {
                writeln!(out, "Only Pokémon IDs from 1 to {} are allowed.", max_id)?
            }
            PromptCommand::Invalid => writeln!(
                out,
                "Invalid input. Please enter a number from 1 to {} or 'exit'.",
                max_id
            )?,
        }
    }

    Ok(())
}
