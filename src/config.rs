//! Machine description files.
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ        alphabet
//!  5 3                              slots, pawls
//!  I MQ    (AELTPHQXRU) (BKNW) ...  name, type, cycles
//!  Beta N  (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R     (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!          (RX) (SZ) (TV)
//! ```
//!
//! Tokens are separated by any whitespace, so a rotor's cycles may continue
//! on following lines. The type token is `M` followed by the notch symbols,
//! `N` for a fixed rotor, or `R` for a reflector.

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::catalog::RotorCatalog;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// A parsed machine description, ready to [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Symbols every rotor and message uses.
    pub alphabet: Arc<Alphabet>,
    /// Number of rotor slots, reflector included.
    pub num_rotors: usize,
    /// Number of pawls, and thus of moving rotors in the stack.
    pub num_pawls: usize,
    /// Every rotor the file defines, in file order.
    pub catalog: RotorCatalog,
}

impl MachineConfig {
    /// Creates the machine described by this configuration.
    ///
    /// # Errors
    /// Propagates [`Machine::new`]'s configuration errors.
    pub fn build(self) -> Result<Machine> {
        Machine::new(self.alphabet, self.num_rotors, self.num_pawls, self.catalog)
    }
}

/// A whitespace-separated token and the 1-based line it starts on.
struct Token<'a> {
    text: &'a str,
    line: usize,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.lines()
        .enumerate()
        .flat_map(|(i, line)| {
            line.split_whitespace()
                .map(move |text| Token { text, line: i + 1 })
        })
        .collect()
}

fn is_cycle(token: &str) -> bool {
    token.starts_with('(')
}

fn parse_count(token: Option<&Token<'_>>, what: &str) -> Result<usize> {
    let token = token
        .ok_or_else(|| EnigmaError::config(format!("configuration file truncated: missing {what}")))?;
    token
        .text
        .parse()
        .map_err(|_| {
            EnigmaError::config(format!("{what} must be a number, got {:?}", token.text))
                .at_line(token.line)
        })
}

/// Builds one rotor from its name, type token and cycle text.
fn parse_rotor(
    name: &str,
    kind: &str,
    cycles: &str,
    alphabet: &Arc<Alphabet>,
) -> Result<Rotor> {
    let perm = Arc::new(Permutation::new(cycles, alphabet.clone())?);
    let mut chars = kind.chars();
    match (chars.next(), chars.as_str()) {
        (Some('M'), notches) => Rotor::moving(name, perm, notches),
        (Some('N'), "") => Ok(Rotor::fixed(name, perm)),
        (Some('R'), "") => Ok(Rotor::reflector(name, perm)),
        (Some('N' | 'R'), _) => Err(EnigmaError::config(format!(
            "rotor {name}: only moving rotors have notches, got {kind:?}"
        ))),
        _ => Err(EnigmaError::config(format!(
            "rotor {name}: unknown rotor type {kind:?}"
        ))),
    }
}

/// Parses a machine description.
///
/// # Errors
/// Returns [`EnigmaError::Config`] (prefixed with the line number where one
/// applies) if the header is truncated or not numeric, a rotor line lacks
/// its type, the type is unknown, a notch symbol or cycle is invalid, or a
/// rotor name repeats.
///
/// # Examples
///
/// ```
/// use enigma::config::parse_config;
///
/// let config = parse_config("ABC 2 1\n R R (AB)\n I MC (ABC)\n").unwrap();
/// assert_eq!(config.catalog.len(), 2);
/// ```
///
/// ```
/// use enigma::config::parse_config;
///
/// let err = parse_config("ABC 2").unwrap_err();
/// assert_eq!(err.to_string(), "configuration file truncated: missing pawl count");
/// ```
pub fn parse_config(text: &str) -> Result<MachineConfig> {
    let tokens = tokenize(text);
    let mut tokens = tokens.iter().peekable();

    let alpha_token = tokens
        .next()
        .ok_or_else(|| EnigmaError::config("configuration file truncated: missing alphabet"))?;
    let alphabet = Arc::new(Alphabet::new(alpha_token.text).map_err(|e| e.at_line(alpha_token.line))?);
    let num_rotors = parse_count(tokens.next(), "rotor slot count")?;
    let num_pawls = parse_count(tokens.next(), "pawl count")?;

    let mut catalog = RotorCatalog::new();
    while let Some(name) = tokens.next() {
        if is_cycle(name.text) {
            return Err(
                EnigmaError::config(format!("expected a rotor name, got {:?}", name.text))
                    .at_line(name.line),
            );
        }
        let kind = tokens.next().filter(|t| !is_cycle(t.text)).ok_or_else(|| {
            EnigmaError::config(format!("rotor {} has no type", name.text)).at_line(name.line)
        })?;

        let mut cycles = Vec::new();
        while let Some(cycle) = tokens.next_if(|t| is_cycle(t.text)) {
            cycles.push(cycle.text);
        }

        let rotor = parse_rotor(name.text, kind.text, &cycles.join(" "), &alphabet)
            .map_err(|e| e.at_line(name.line))?;
        catalog.add(rotor).map_err(|e| e.at_line(name.line))?;
    }

    debug!(
        alphabet = %alphabet,
        num_rotors,
        num_pawls,
        rotors = catalog.len(),
        "configuration parsed"
    );
    Ok(MachineConfig {
        alphabet,
        num_rotors,
        num_pawls,
        catalog,
    })
}
