//! Alphabet: ordered symbol set with a dense index mapping.
//!
//! The K-th symbol has index K. Every permutation, rotor and machine built
//! for one configuration shares a single alphabet through an `Arc`.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EnigmaError, Result};

/// Symbols used by the default alphabet.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters claimed by the cycle and settings grammars.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// An ordered, duplicate-free set of encodable symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Default for Alphabet {
    /// The 26 upper-case Latin letters.
    fn default() -> Self {
        Self::from_distinct(UPPERCASE.chars().collect())
    }
}

impl Alphabet {
    /// Creates an alphabet from the symbols of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `chars` is empty, repeats a
    /// symbol, or contains whitespace, `(`, `)` or `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let abc = Alphabet::new("ABC").unwrap();
    /// assert_eq!(abc.size(), 3);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        if chars.is_empty() {
            return Err(EnigmaError::config("alphabet must not be empty"));
        }
        let mut seen: Vec<char> = Vec::with_capacity(chars.len());
        for ch in chars.chars() {
            if ch.is_whitespace() || RESERVED.contains(&ch) {
                return Err(EnigmaError::config(format!(
                    "reserved character {ch:?} in alphabet"
                )));
            }
            if seen.contains(&ch) {
                return Err(EnigmaError::config(format!(
                    "duplicate character {ch:?} in alphabet"
                )));
            }
            seen.push(ch);
        }
        Ok(Self::from_distinct(seen))
    }

    fn from_distinct(symbols: Vec<char>) -> Self {
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, index }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if `ch` belongs to this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// Returns the index of `ch`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `ch` is not in the alphabet.
    pub fn index_of(&self, ch: char) -> Result<usize> {
        self.index
            .get(&ch)
            .copied()
            .ok_or_else(|| EnigmaError::config(format!("character {ch:?} not in alphabet")))
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `index >= size()`.
    pub fn symbol_at(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Iterates over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
