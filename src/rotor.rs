//! Rotors: a permutation plus a rotational offset.
//!
//! The three physical kinds differ only in whether they step and whether
//! they carry notches, so they share one struct and dispatch on
//! [`RotorKind`].
//!
//! A rotor's effective offset is `setting - ring`. The setting is the
//! symbol shown in the window; the ring setting rotates the wiring relative
//! to the alphabet ring and defaults to 0.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// What a rotor does besides permuting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Fixed in slot 0, folds the signal back. Its permutation must be a
    /// derangement; the machine checks this when it is built.
    Reflector,
    /// Never steps.
    Fixed,
    /// Steps under a pawl; each notch index lets the left neighbour step.
    Moving { notches: Vec<usize> },
}

/// One rotor of a catalog.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Arc<Permutation>,
    kind: RotorKind,
    setting: usize,
    ring: usize,
}

impl Rotor {
    fn build(name: impl Into<String>, permutation: Arc<Permutation>, kind: RotorKind) -> Self {
        Rotor {
            name: name.into(),
            permutation,
            kind,
            setting: 0,
            ring: 0,
        }
    }

    /// Creates a reflector named `name`.
    pub fn reflector(name: impl Into<String>, permutation: Arc<Permutation>) -> Self {
        Self::build(name, permutation, RotorKind::Reflector)
    }

    /// Creates a non-moving rotor named `name`.
    pub fn fixed(name: impl Into<String>, permutation: Arc<Permutation>) -> Self {
        Self::build(name, permutation, RotorKind::Fixed)
    }

    /// Creates a moving rotor whose notches sit at the symbols of `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if a notch symbol is not in the
    /// permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Arc::new(Permutation::new("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)", alpha).unwrap());
    /// let mut iii = Rotor::moving("III", perm, "V").unwrap();
    /// iii.set_symbol('U').unwrap();
    /// assert!(!iii.at_notch());
    /// iii.advance();
    /// assert!(iii.at_notch());
    /// ```
    pub fn moving(
        name: impl Into<String>,
        permutation: Arc<Permutation>,
        notches: &str,
    ) -> Result<Self> {
        let name = name.into();
        let alphabet = permutation.alphabet().clone();
        let mut indices = Vec::with_capacity(notches.len());
        for ch in notches.chars() {
            let i = alphabet.index_of(ch).map_err(|_| {
                EnigmaError::config(format!("notch {ch:?} of rotor {name} is not in the alphabet"))
            })?;
            if !indices.contains(&i) {
                indices.push(i);
            }
        }
        Ok(Self::build(
            name,
            permutation,
            RotorKind::Moving { notches: indices },
        ))
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's kind, with its notches if it moves.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the alphabet of the rotor's permutation.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the permutation implemented at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the number of contact positions.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns `true` iff the rotor has a ratchet and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns `true` iff the rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Returns the ring setting.
    pub fn ring(&self) -> usize {
        self.ring
    }

    fn check_position(&self, posn: usize, what: &str) -> Result<()> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::config(format!(
                "reflector {} cannot take a non-zero {what}",
                self.name
            )));
        }
        Ok(())
    }

    /// Sets the setting to `posn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `posn >= size()`, and
    /// [`EnigmaError::Config`] for a non-zero position on a reflector.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        self.check_position(posn, "setting")?;
        self.setting = posn;
        Ok(())
    }

    /// Sets the setting to the index of `cposn`.
    pub fn set_symbol(&mut self, cposn: char) -> Result<()> {
        let posn = self.alphabet().index_of(cposn)?;
        self.set(posn)
    }

    /// Sets the ring setting to `posn`.
    ///
    /// # Errors
    /// Same conditions as [`set`](Self::set).
    pub fn set_ring(&mut self, posn: usize) -> Result<()> {
        self.check_position(posn, "ring setting")?;
        self.ring = posn;
        Ok(())
    }

    /// Returns `true` iff the rotor is positioned to let its left
    /// neighbour advance.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advances one position if the rotor moves; otherwise does nothing.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    fn offset(&self) -> i64 {
        self.setting as i64 - self.ring as i64
    }

    /// Converts contact position `p` entering from the right into the
    /// position leaving on the left.
    pub fn convert_forward(&self, p: usize) -> usize {
        let perm = &self.permutation;
        let contact = perm.permute(perm.wrap(p as i64 + self.offset()));
        perm.wrap(contact as i64 - self.offset())
    }

    /// Converts contact position `e` entering from the left into the
    /// position leaving on the right.
    pub fn convert_backward(&self, e: usize) -> usize {
        let perm = &self.permutation;
        let contact = perm.invert(perm.wrap(e as i64 + self.offset()));
        perm.wrap(contact as i64 - self.offset())
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}
