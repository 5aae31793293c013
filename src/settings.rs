//! Settings lines: `* B Beta III IV I AXLE [RINGS] (HQ) (EX) (IP)`.
//!
//! A settings line names one rotor per slot (reflector first), gives the
//! window letters of the signal rotors, optionally their ring settings, and
//! ends with the plugboard cycles.

use tracing::debug;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// One parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Window letters of the signal rotors, leftmost first.
    pub positions: String,
    /// Ring settings in the same layout as `positions`, if given.
    pub rings: Option<String>,
    /// Plugboard cycles; empty for no plugboard.
    pub plugboard: String,
}

impl Settings {
    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the line does not start with `*`,
    /// names fewer than `num_rotors` rotors, lacks the positions, or has
    /// anything but cycles after the positions and optional rings.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::settings::Settings;
    ///
    /// let s = Settings::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(s.rotors, ["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(s.positions, "AXLE");
    /// assert_eq!(s.rings, None);
    /// assert_eq!(s.plugboard, "(HQ) (EX)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next() != Some("*") {
            return Err(EnigmaError::config(
                "settings line must start with '*' followed by a space",
            ));
        }

        let rotors: Vec<String> = tokens
            .by_ref()
            .take(num_rotors)
            .map(str::to_owned)
            .collect();
        if rotors.len() < num_rotors || rotors.iter().any(|r| r.starts_with('(')) {
            return Err(EnigmaError::config(format!(
                "settings line must name {num_rotors} rotors"
            )));
        }

        let positions = tokens
            .next_if(|t| !t.starts_with('('))
            .ok_or_else(|| EnigmaError::config("settings line has no rotor positions"))?
            .to_owned();
        let rings = tokens.next_if(|t| !t.starts_with('(')).map(str::to_owned);

        let mut cycles = Vec::new();
        for token in tokens {
            if !token.starts_with('(') {
                return Err(EnigmaError::config(format!(
                    "unexpected {token:?} in settings line"
                )));
            }
            cycles.push(token);
        }

        Ok(Settings {
            rotors,
            positions,
            rings,
            plugboard: cycles.join(" "),
        })
    }

    /// Configures `machine`: rotors, positions, rings and plugboard.
    ///
    /// The plugboard is parsed before the machine is touched.
    ///
    /// # Errors
    /// Propagates configuration and bounds errors from the plugboard and
    /// from [`Machine`]'s setters.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet().clone())?;
        machine.insert_rotors(&self.rotors)?;
        machine.set_rotors(&self.positions)?;
        if let Some(rings) = &self.rings {
            machine.set_rings(rings)?;
        }
        machine.set_plugboard(plugboard)?;
        debug!(
            rotors = ?self.rotors,
            positions = %self.positions,
            rings = self.rings.as_deref().unwrap_or("-"),
            plugboard = %self.plugboard,
            "settings applied"
        );
        Ok(())
    }
}
