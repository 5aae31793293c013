//! Machine: the rotor stack, the plugboard and the stepping rule.
//!
//! Slot 0 holds the reflector, slots `1..num_rotors` hold the signal rotors
//! and the rightmost slot holds the fast rotor. Each converted symbol first
//! steps the rotors, then travels
//!
//! ```text
//! plugboard → slots N-1 .. 1 (forward) → slot 0 .. N-1 (backward) → plugboard
//! ```
//!
//! The reflector is the first element of the backward pass, so its
//! (involutive) wiring is applied exactly once.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::alphabet::Alphabet;
use crate::catalog::{RotorCatalog, RotorId};
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// A complete rotor cipher machine.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: RotorCatalog,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `num_pawls` pawls whose
    /// rotors come from `catalog`. No rotors are inserted yet and the
    /// plugboard is the identity.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] unless `1 < num_rotors` and
    /// `num_pawls < num_rotors`, if a catalog rotor uses a different
    /// alphabet, if a reflector's permutation is not a derangement, or if
    /// the catalog holds fewer rotors than there are slots.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        catalog: RotorCatalog,
    ) -> Result<Self> {
        if num_rotors < 2 {
            return Err(EnigmaError::config(format!(
                "a machine needs at least 2 rotor slots, got {num_rotors}"
            )));
        }
        if num_pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "{num_pawls} pawls do not fit in {num_rotors} rotor slots"
            )));
        }
        for (_, rotor) in catalog.iter() {
            if **rotor.alphabet() != *alphabet {
                return Err(EnigmaError::config(format!(
                    "rotor {} uses a different alphabet",
                    rotor.name()
                )));
            }
            if rotor.reflecting() && !rotor.permutation().derangement() {
                return Err(EnigmaError::config(format!(
                    "reflector {} must map every symbol to a different one",
                    rotor.name()
                )));
            }
        }
        if num_rotors > catalog.len() {
            return Err(EnigmaError::config(format!(
                "{num_rotors} rotor slots but only {} rotors defined",
                catalog.len()
            )));
        }
        debug!(
            num_rotors,
            num_pawls,
            catalog = catalog.len(),
            "machine built"
        );
        Ok(Machine {
            plugboard: Permutation::identity(alphabet.clone()),
            alphabet,
            num_rotors,
            num_pawls,
            catalog,
            slots: Vec::new(),
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, and thus of rotating rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the alphabet shared by every rotor and the plugboard.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns every rotor this machine can use.
    pub fn catalog(&self) -> &RotorCatalog {
        &self.catalog
    }

    /// Returns the current plugboard; the identity until one is set.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns `true` once [`insert_rotors`](Self::insert_rotors) succeeded.
    pub fn has_rotors(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Returns the names of the inserted rotors, reflector first.
    pub fn rotor_names(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|&id| self.catalog.get(id).name())
            .collect()
    }

    /// Returns the window letters of slots `1..num_rotors`, left to right.
    ///
    /// Empty when no rotors are inserted.
    pub fn positions(&self) -> String {
        let symbols: Vec<char> = self.alphabet.symbols().collect();
        self.slots
            .iter()
            .skip(1)
            .map(|&id| symbols[self.catalog.get(id).setting()])
            .collect()
    }

    /// Fills the slots with the rotors named by `names`; `names[0]` is the
    /// reflector. Every inserted rotor starts at setting 0 and ring 0.
    ///
    /// The new stack is validated as a whole before it replaces the current
    /// one: on error the machine is left exactly as it was.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the number of names differs from
    /// the number of slots, a name is unknown or repeated, slot 0 is not a
    /// reflector or a later slot is, the number of rotating rotors differs
    /// from the number of pawls, or the rotating rotors are not the
    /// rightmost ones.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::config(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let mut slots = Vec::with_capacity(self.num_rotors);
        for name in names {
            let name = name.as_ref();
            let id = self
                .catalog
                .find(name)
                .ok_or_else(|| EnigmaError::config(format!("unknown rotor {name}")))?;
            if slots.contains(&id) {
                return Err(EnigmaError::config(format!("rotor {name} used twice")));
            }
            slots.push(id);
        }

        let moving = slots
            .iter()
            .filter(|&&id| self.catalog.get(id).rotates())
            .count();
        if moving != self.num_pawls {
            return Err(EnigmaError::config(format!(
                "bad setting for this number of pawls: {} pawls, {moving} moving rotors",
                self.num_pawls
            )));
        }

        let first_moving = self.num_rotors - self.num_pawls;
        for (slot, &id) in slots.iter().enumerate() {
            let rotor = self.catalog.get(id);
            if rotor.reflecting() != (slot == 0) {
                return Err(EnigmaError::config(if slot == 0 {
                    format!("first rotor {} is not a reflector", rotor.name())
                } else {
                    format!("reflector {} outside slot 0", rotor.name())
                }));
            }
            if rotor.rotates() != (slot >= first_moving) {
                return Err(EnigmaError::config(format!(
                    "moving rotors must fill the rightmost {} slots; {} is in slot {slot}",
                    self.num_pawls,
                    rotor.name()
                )));
            }
        }

        for &id in &slots {
            let rotor = self.catalog.get_mut(id);
            rotor.set(0)?;
            rotor.set_ring(0)?;
        }
        self.slots = slots;
        debug!(rotors = ?self.rotor_names(), "rotors inserted");
        Ok(())
    }

    /// Empties the rotor slots; the catalog is kept.
    pub fn reset_rotors(&mut self) {
        self.slots.clear();
    }

    fn require_rotors(&self) -> Result<()> {
        if self.has_rotors() {
            Ok(())
        } else {
            Err(EnigmaError::config("no rotors inserted"))
        }
    }

    /// Parses one symbol per signal rotor, leftmost first.
    fn slot_positions(&self, what: &'static str, text: &str) -> Result<Vec<usize>> {
        self.require_rotors()?;
        let expected = self.num_rotors - 1;
        let actual = text.chars().count();
        if actual != expected {
            return Err(EnigmaError::WrongLength {
                what,
                expected,
                actual,
            });
        }
        text.chars().map(|c| self.alphabet.index_of(c)).collect()
    }

    /// Sets the signal rotors to the symbols of `setting`, leftmost first.
    ///
    /// # Errors
    /// Returns [`EnigmaError::WrongLength`] unless `setting` has
    /// `num_rotors - 1` symbols, and [`EnigmaError::Config`] for a symbol
    /// outside the alphabet or when no rotors are inserted. Nothing changes
    /// on error.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = self.slot_positions("rotor setting", setting)?;
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            self.catalog.get_mut(id).set(posn)?;
        }
        trace!(positions = %self.positions(), "rotors set");
        Ok(())
    }

    /// Sets the ring settings of the signal rotors, leftmost first.
    ///
    /// # Errors
    /// Same conditions as [`set_rotors`](Self::set_rotors).
    pub fn set_rings(&mut self, rings: &str) -> Result<()> {
        let positions = self.slot_positions("ring setting", rings)?;
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            self.catalog.get_mut(id).set_ring(posn)?;
        }
        Ok(())
    }

    /// Replaces the plugboard.
    ///
    /// The plugboard is applied forward on the way in and on the way out,
    /// which only undoes itself for wiring made of swapped pairs; other
    /// wirings are accepted with a warning.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `plugboard` uses another alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::config("plugboard uses a different alphabet"));
        }
        if !plugboard.is_involution() {
            warn!(plugboard = %plugboard, "plugboard is not made of swapped pairs");
        }
        self.plugboard = plugboard;
        Ok(())
    }

    /// Steps the rotors once.
    ///
    /// The fast rotor always steps. Any other moving rotor steps if its
    /// right neighbour is at a notch, or if it is itself at a notch (the
    /// double step). Notches are sampled before anything moves.
    fn advance_rotors(&mut self) {
        let n = self.slots.len();
        let rotors: Vec<_> = self.slots.iter().map(|&id| self.catalog.get(id)).collect();
        let mut will_advance = vec![false; n];
        will_advance[n - 1] = true;
        for i in 1..n - 1 {
            if rotors[i].rotates() {
                will_advance[i] = rotors[i + 1].at_notch() || rotors[i].at_notch();
            }
        }
        for (&id, _) in self.slots.iter().zip(will_advance).filter(|(_, adv)| *adv) {
            self.catalog.get_mut(id).advance();
        }
    }

    /// Runs an already stepped machine's signal path on `c`.
    fn signal_path(&self, c: usize) -> usize {
        let mut signal = self.plugboard.permute(c);
        for &id in self.slots[1..].iter().rev() {
            signal = self.catalog.get(id).convert_forward(signal);
        }
        for &id in &self.slots {
            signal = self.catalog.get(id).convert_backward(signal);
        }
        self.plugboard.permute(signal)
    }

    /// Steps the machine, then converts the symbol with index `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `c` is not a valid index
    /// and [`EnigmaError::Config`] if no rotors are inserted.
    pub fn convert(&mut self, c: usize) -> Result<usize> {
        self.require_rotors()?;
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        self.advance_rotors();
        Ok(self.signal_path(c))
    }

    /// Converts every non-whitespace symbol of `msg` in order, carrying the
    /// rotor state from one symbol to the next. Whitespace is copied as is
    /// and does not step the rotors.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `msg` holds a symbol outside the
    /// alphabet (checked before any rotor moves) or no rotors are inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, Rotor, RotorCatalog};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = |c: &str| Arc::new(Permutation::new(c, alpha.clone()).unwrap());
    /// let mut catalog = RotorCatalog::new();
    /// catalog.add(Rotor::reflector("C", perm("(AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)"))).unwrap();
    /// catalog.add(Rotor::moving("I", perm("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"), "Q").unwrap()).unwrap();
    /// catalog.add(Rotor::moving("II", perm("(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)"), "E").unwrap()).unwrap();
    ///
    /// let mut machine = Machine::new(alpha.clone(), 3, 2, catalog).unwrap();
    /// machine.insert_rotors(&["C", "I", "II"]).unwrap();
    /// machine.set_rotors("AA").unwrap();
    /// let cipher = machine.convert_message("ATTACK AT DAWN").unwrap();
    ///
    /// machine.set_rotors("AA").unwrap();
    /// assert_eq!(machine.convert_message(&cipher).unwrap(), "ATTACK AT DAWN");
    /// ```
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        self.require_rotors()?;
        let indices = msg
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| self.alphabet.index_of(c))
            .collect::<Result<Vec<_>>>()?;

        let mut converted = indices.into_iter();
        let mut out = String::with_capacity(msg.len());
        for ch in msg.chars() {
            if ch.is_whitespace() {
                out.push(ch);
                continue;
            }
            if let Some(c) = converted.next() {
                let e = self.convert(c)?;
                out.push(self.alphabet.symbol_at(e)?);
            }
        }
        trace!(len = out.len(), positions = %self.positions(), "message converted");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotor::Rotor;

    const B: &str = "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)";
    const BETA: &str = "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)";
    const I: &str = "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)";
    const II: &str = "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)";
    const III: &str = "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)";
    const IV: &str = "(AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)";

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    fn catalog(alpha: &Arc<Alphabet>) -> RotorCatalog {
        let perm = |c: &str| Arc::new(Permutation::new(c, alpha.clone()).unwrap());
        let mut catalog = RotorCatalog::new();
        catalog.add(Rotor::reflector("B", perm(B))).unwrap();
        catalog.add(Rotor::fixed("Beta", perm(BETA))).unwrap();
        catalog.add(Rotor::moving("I", perm(I), "Q").unwrap()).unwrap();
        catalog.add(Rotor::moving("II", perm(II), "E").unwrap()).unwrap();
        catalog.add(Rotor::moving("III", perm(III), "V").unwrap()).unwrap();
        catalog.add(Rotor::moving("IV", perm(IV), "J").unwrap()).unwrap();
        catalog
    }

    fn machine() -> Machine {
        let alpha = upper();
        let catalog = catalog(&alpha);
        Machine::new(alpha, 5, 3, catalog).unwrap()
    }

    #[test]
    fn test_new_validates_counts() {
        let alpha = upper();
        assert!(Machine::new(alpha.clone(), 1, 0, catalog(&alpha))
            .unwrap_err()
            .is_config());
        assert!(Machine::new(alpha.clone(), 5, 5, catalog(&alpha))
            .unwrap_err()
            .is_config());
        let m = Machine::new(alpha.clone(), 5, 3, catalog(&alpha)).unwrap();
        assert_eq!(m.num_rotors(), 5);
        assert_eq!(m.num_pawls(), 3);
        assert!(!m.has_rotors());
        assert_eq!(m.positions(), "");
    }

    #[test]
    fn test_new_rejects_more_slots_than_rotors() {
        let alpha = upper();
        let err = Machine::new(alpha.clone(), 7, 3, catalog(&alpha)).unwrap_err();
        assert_eq!(err.to_string(), "7 rotor slots but only 6 rotors defined");
        let err = Machine::new(alpha.clone(), 99_999_999_999_999, 1, catalog(&alpha)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_new_rejects_non_derangement_reflector() {
        let alpha = upper();
        let mut catalog = RotorCatalog::new();
        let perm = Arc::new(Permutation::new("(AE) (BN)", alpha.clone()).unwrap());
        catalog.add(Rotor::reflector("Broken", perm)).unwrap();
        let err = Machine::new(alpha, 2, 1, catalog).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_new_rejects_foreign_alphabet() {
        let alpha = upper();
        let mut catalog = catalog(&alpha);
        let abc = Arc::new(Alphabet::new("ABC").unwrap());
        let perm = Arc::new(Permutation::identity(abc));
        catalog.add(Rotor::fixed("Small", perm)).unwrap();
        assert!(Machine::new(alpha, 5, 3, catalog).unwrap_err().is_config());
    }

    #[test]
    fn test_insert_rotors() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        assert!(m.has_rotors());
        assert_eq!(m.rotor_names(), ["B", "Beta", "I", "II", "III"]);
        assert_eq!(m.positions(), "AAAA");
    }

    #[test]
    fn test_insert_rejections_keep_previous_stack() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        let bad: [&[&str]; 7] = [
            &["B", "Beta", "I", "II"],
            &["B", "Beta", "I", "II", "Nope"],
            &["B", "Beta", "I", "I", "III"],
            &["Beta", "B", "I", "II", "III"],
            &["B", "I", "II", "III", "IV"],
            &["B", "I", "Beta", "II", "III"],
            &["B", "Beta", "I", "II", "B"],
        ];
        for names in bad {
            let err = m.insert_rotors(names).unwrap_err();
            assert!(err.is_config(), "{names:?} should be rejected");
            assert_eq!(m.rotor_names(), ["B", "Beta", "I", "II", "III"]);
        }
    }

    #[test]
    fn test_pawl_mismatch_message() {
        let mut m = machine();
        let err = m.insert_rotors(&["B", "I", "II", "III", "IV"]).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("bad setting for this number of pawls"));
        assert!(!m.has_rotors());
    }

    #[test]
    fn test_reset_rotors() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.reset_rotors();
        assert!(!m.has_rotors());
        assert!(m.convert(0).unwrap_err().is_config());
        assert!(m.set_rotors("AAAA").unwrap_err().is_config());
        assert_eq!(m.catalog().len(), 6);
    }

    #[test]
    fn test_set_rotors_errors_leave_positions() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AXLE").unwrap();
        assert_eq!(m.positions(), "AXLE");
        assert!(matches!(
            m.set_rotors("AAA").unwrap_err(),
            EnigmaError::WrongLength {
                expected: 4,
                actual: 3,
                ..
            }
        ));
        assert!(m.set_rotors("AAAAA").unwrap_err().is_bounds());
        assert!(m.set_rotors("AA?A").unwrap_err().is_config());
        assert_eq!(m.positions(), "AXLE");
    }

    #[test]
    fn test_hello_world_with_plugboard() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        let plug = Permutation::new("(AQ) (EP)", m.alphabet().clone()).unwrap();
        m.set_plugboard(plug).unwrap();
        assert_eq!(m.convert_message("HELLO WORLD").unwrap(), "IHBDQ QMTQZ");
        m.set_rotors("AAAA").unwrap();
        assert_eq!(m.convert_message("IHBDQ QMTQZ").unwrap(), "HELLO WORLD");
    }

    #[test]
    fn test_hello_world_without_plugboard() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        assert_eq!(m.convert_message("HELLO WORLD").unwrap(), "ILBDA AMTAZ");
    }

    #[test]
    fn test_convert_never_maps_to_self() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
        m.set_rotors("AXLE").unwrap();
        for k in 0..500 {
            let c = k % 26;
            assert_ne!(m.convert(c).unwrap(), c);
        }
    }

    #[test]
    fn test_double_step() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AADU").unwrap();
        let mut seen = Vec::new();
        for _ in 0..3 {
            m.convert(0).unwrap();
            seen.push(m.positions());
        }
        assert_eq!(seen, ["AADV", "AAEW", "ABFX"]);
    }

    #[test]
    fn test_leftmost_moving_rotor_steps_off_own_notch() {
        // Rotor I sits at its own notch; nothing to its right is at a notch.
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AQAA").unwrap();
        m.convert(0).unwrap();
        assert_eq!(m.positions(), "ARAB");
    }

    #[test]
    fn test_convert_rejects_out_of_range_index() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        assert!(m.convert(26).unwrap_err().is_bounds());
        assert_eq!(m.positions(), "AAAA");
    }

    #[test]
    fn test_invalid_message_does_not_step() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        assert!(m.convert_message("HELLO world").unwrap_err().is_config());
        assert_eq!(m.positions(), "AAAA");
    }

    #[test]
    fn test_whitespace_preserved_without_stepping() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        let out = m.convert_message("  HE\tLLO  ").unwrap();
        assert_eq!(out, "  IL\tBDA  ");
        assert_eq!(m.positions(), "AAAF");
    }

    #[test]
    fn test_ring_settings_round_trip() {
        let mut m = machine();
        m.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
        m.set_rotors("AXLE").unwrap();
        m.set_rings("BBBB").unwrap();
        let cipher = m.convert_message("FROM HIS SHOULDER").unwrap();

        m.set_rotors("AXLE").unwrap();
        m.set_rings("AAAA").unwrap();
        let without_rings = m.convert_message("FROM HIS SHOULDER").unwrap();
        assert_ne!(cipher, without_rings);

        m.set_rotors("AXLE").unwrap();
        m.set_rings("BBBB").unwrap();
        assert_eq!(m.convert_message(&cipher).unwrap(), "FROM HIS SHOULDER");
    }

    #[test]
    fn test_plugboard_alphabet_checked() {
        let mut m = machine();
        let abc = Arc::new(Alphabet::new("ABC").unwrap());
        let err = m.set_plugboard(Permutation::identity(abc)).unwrap_err();
        assert!(err.is_config());
    }
}
