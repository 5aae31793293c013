//! Processing a stream of settings lines and messages.
//!
//! Every line starting with `*` reconfigures the machine; every other line
//! is a message, converted with the current state and written in groups of
//! five symbols. Blank message lines come out as blank lines.

use std::io::{BufRead, Write};

use tracing::trace;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::settings::Settings;

/// Number of symbols per output group.
const GROUP_SIZE: usize = 5;

/// Removes whitespace from `text` and regroups it in blocks of five,
/// separated by single spaces. The last group may be shorter.
///
/// # Examples
///
/// ```
/// use enigma::session::group_five;
///
/// assert_eq!(group_five("QVPQSOKOIL PUB"), "QVPQS OKOIL PUB");
/// assert_eq!(group_five("   "), "");
/// ```
pub fn group_five(text: &str) -> String {
    let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    symbols
        .chunks(GROUP_SIZE)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs every settings line and message of `input` through `machine`,
/// writing one output line per message line.
///
/// Blank lines before the first settings line are skipped.
///
/// # Errors
/// Returns [`EnigmaError::Config`] (prefixed with the input line number) if
/// a message appears before any settings line, the input holds no settings
/// line, or a settings line or message is invalid; bounds errors from
/// settings pass through unchanged; I/O failures become
/// [`EnigmaError::Io`]. Processing stops at the first error.
pub fn process<R: BufRead, W: Write>(machine: &mut Machine, input: R, mut output: W) -> Result<()> {
    let mut configured = false;
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        if line.trim_start().starts_with('*') {
            Settings::parse(&line, machine.num_rotors())
                .and_then(|settings| settings.apply(machine))
                .map_err(|e| e.at_line(lineno))?;
            configured = true;
        } else if configured {
            let converted = machine
                .convert_message(&line)
                .map_err(|e| e.at_line(lineno))?;
            trace!(lineno, "message line converted");
            writeln!(output, "{}", group_five(&converted))?;
        } else if !line.trim().is_empty() {
            return Err(EnigmaError::config("missing settings line").at_line(lineno));
        }
    }
    if !configured {
        return Err(EnigmaError::config("missing settings line"));
    }
    output.flush()?;
    Ok(())
}
