//! Permutation: a bijection over an alphabet's index space.
//!
//! Built once from cycle notation, e.g. `"(AELTPHQXRU) (BKNW) (S)"`. Each
//! group `c0 c1 ... cm` maps `c0 -> c1 -> ... -> cm -> c0`; symbols absent
//! from every group map to themselves. Both the forward and the inverse
//! tables are materialised at construction, so lookups are O(1) and the
//! value is immutable afterwards.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A permutation of `[0, alphabet.size())` defined by disjoint cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

fn bad_format(detail: impl fmt::Display) -> EnigmaError {
    EnigmaError::config(format!("bad permutation format: {detail}"))
}

/// Splits cycle notation into the bodies of its parenthesised groups.
///
/// Whitespace between groups is optional; whitespace inside a group is not
/// allowed.
fn split_cycles(text: &str) -> Result<Vec<&str>> {
    let mut cycles = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('(')
            .ok_or_else(|| bad_format(format!("expected '(' at {rest:?}")))?;
        let close = body
            .find(')')
            .ok_or_else(|| bad_format(format!("unclosed cycle at {rest:?}")))?;
        let cycle = &body[..close];
        if cycle.is_empty() {
            return Err(bad_format("empty cycle"));
        }
        if cycle.contains(|c: char| c == '(' || c.is_whitespace()) {
            return Err(bad_format(format!("malformed cycle ({cycle}")));
        }
        cycles.push(cycle);
        rest = body[close + 1..].trim_start();
    }
    Ok(cycles)
}

impl Permutation {
    /// Builds the permutation described by `cycles` over `alphabet`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] ("bad permutation format") if the text
    /// is not a sequence of parenthesised groups, a group is empty, a symbol
    /// is not in the alphabet, or a symbol appears more than once.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alpha).unwrap();
    /// assert_eq!(perm.permute_symbol('A').unwrap(), 'E');
    /// assert_eq!(perm.invert_symbol('E').unwrap(), 'A');
    /// assert_eq!(perm.permute(18), 18);
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut used = vec![false; size];

        for cycle in split_cycles(cycles)? {
            let mut members = Vec::with_capacity(cycle.len());
            for ch in cycle.chars() {
                let i = alphabet
                    .index_of(ch)
                    .map_err(|_| bad_format(format!("{ch:?} is not in the alphabet")))?;
                if used[i] {
                    return Err(bad_format(format!("{ch:?} appears in more than one place")));
                }
                used[i] = true;
                members.push(i);
            }
            for (k, &from) in members.iter().enumerate() {
                forward[from] = members[(k + 1) % members.len()];
            }
        }

        let mut inverse = vec![0; size];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }

        Ok(Permutation {
            alphabet,
            forward,
            inverse,
        })
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Permutation {
            inverse: forward.clone(),
            forward,
            alphabet,
        }
    }

    /// Returns the size of the alphabet this permutation acts on.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns the alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Reduces a signed position into `[0, size())`.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Applies the permutation to `p` taken modulo `size()`.
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to `c` taken modulo `size()`.
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Applies the permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `p` is not in the alphabet.
    pub fn permute_symbol(&self, p: char) -> Result<char> {
        let i = self.alphabet.index_of(p)?;
        self.alphabet.symbol_at(self.permute(i))
    }

    /// Applies the inverse permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `c` is not in the alphabet.
    pub fn invert_symbol(&self, c: char) -> Result<char> {
        let i = self.alphabet.index_of(c)?;
        self.alphabet.symbol_at(self.invert(i))
    }

    /// Returns `true` iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &p)| i != p)
    }

    /// Returns `true` iff the permutation is its own inverse.
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }
}

impl fmt::Display for Permutation {
    /// Writes the non-trivial cycles in canonical order, each starting at
    /// its lowest index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<char> = self.alphabet.symbols().collect();
        let mut visited = vec![false; self.size()];
        let mut first = true;
        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "(")?;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                write!(f, "{}", symbols[i])?;
                i = self.forward[i];
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
