//! Enigma-style rotor cipher machine.
//!
//! A machine is a stack of rotors over a configurable alphabet: a
//! reflector in slot 0, optional fixed rotors, and moving rotors on the
//! right that step like an odometer (with the historical double step). A
//! plugboard swaps symbol pairs on the way in and out. With the same
//! settings, converting a ciphertext yields the plaintext again.
//!
//! # Architecture
//!
//! ```text
//! Alphabet      (symbols ↔ dense indices)
//!     ↓
//! Permutation   (bijection from cycle notation, forward and inverse)
//!     ↓
//! Rotor         (permutation + setting + ring; Reflector | Fixed | Moving)
//!     ↓ owned by RotorCatalog, referenced by RotorId
//! Machine       (slots, pawls, plugboard, stepping, signal path)
//!     ↑
//! config / settings / session   (text formats and stream processing)
//! ```
//!
//! # Examples
//!
//! Build the M4 naval machine from a description and encrypt a message:
//!
//! ```
//! use enigma::config::parse_config;
//! use enigma::Permutation;
//!
//! let description = "\
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//!  5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  II ME     (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//!  III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ";
//!
//! let mut machine = parse_config(description).unwrap().build().unwrap();
//! machine.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
//! machine.set_rotors("AAAA").unwrap();
//! let plugboard = Permutation::new("(AQ) (EP)", machine.alphabet().clone()).unwrap();
//! machine.set_plugboard(plugboard).unwrap();
//!
//! assert_eq!(machine.convert_message("HELLO WORLD").unwrap(), "IHBDQ QMTQZ");
//! ```
//!
//! Or drive a whole stream of settings lines and messages:
//!
//! ```
//! use enigma::config::parse_config;
//! use enigma::session;
//!
//! # let description = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
//! #  I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! #  II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//! #  III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//! #  Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! #  B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)";
//! let mut machine = parse_config(description).unwrap().build().unwrap();
//! let input = "* B Beta I II III AAAA (AQ) (EP)\nIHBDQ QMTQZ\n";
//! let mut output = Vec::new();
//! session::process(&mut machine, input.as_bytes(), &mut output).unwrap();
//! assert_eq!(output, b"HELLO WORLD\n");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod catalog;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;
pub mod settings;

pub use alphabet::Alphabet;
pub use catalog::{RotorCatalog, RotorId};
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
