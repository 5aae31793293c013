//! Rotor catalog: arena of every rotor a configuration defines.
//!
//! A [`Machine`](crate::Machine) owns its catalog and refers to the rotors
//! in its slots by [`RotorId`], so rotor settings have exactly one owner and
//! no `Rc<RefCell<>>` is needed.

use crate::error::{EnigmaError, Result};
use crate::rotor::Rotor;

/// Stable index of a rotor within its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub(crate) usize);

/// Arena of named rotors.
#[derive(Debug, Clone, Default)]
pub struct RotorCatalog {
    rotors: Vec<Rotor>,
}

impl RotorCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        RotorCatalog { rotors: Vec::new() }
    }

    /// Adds `rotor` and returns its id.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if a rotor with the same name exists.
    pub fn add(&mut self, rotor: Rotor) -> Result<RotorId> {
        if self.find(rotor.name()).is_some() {
            return Err(EnigmaError::config(format!(
                "duplicate rotor name {}",
                rotor.name()
            )));
        }
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Looks up a rotor by name.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|r| r.name() == name)
            .map(RotorId)
    }

    /// Returns the rotor named `name`, if any.
    pub fn rotor(&self, name: &str) -> Option<&Rotor> {
        self.rotors.iter().find(|r| r.name() == name)
    }

    /// Returns the rotor with the given id.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this catalog.
    pub(crate) fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Returns the rotor with the given id, mutably.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this catalog.
    pub(crate) fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Returns the number of rotors.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns `true` if no rotor has been added.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates over all rotors with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RotorId, &Rotor)> {
        self.rotors.iter().enumerate().map(|(i, r)| (RotorId(i), r))
    }

    /// Iterates over rotor names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rotors.iter().map(Rotor::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::permutation::Permutation;
    use std::sync::Arc;

    fn identity() -> Arc<Permutation> {
        Arc::new(Permutation::identity(Arc::new(Alphabet::default())))
    }

    #[test]
    fn test_add_and_find() {
        let mut catalog = RotorCatalog::new();
        assert!(catalog.is_empty());
        let b = catalog.add(Rotor::reflector("B", identity())).unwrap();
        let beta = catalog.add(Rotor::fixed("Beta", identity())).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("B"), Some(b));
        assert_eq!(catalog.find("Beta"), Some(beta));
        assert_eq!(catalog.find("Gamma"), None);
        assert_eq!(catalog.get(beta).name(), "Beta");
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["B", "Beta"]);
    }

    #[test]
    fn test_rotor_by_name() {
        let mut catalog = RotorCatalog::new();
        catalog.add(Rotor::reflector("B", identity())).unwrap();
        assert!(catalog.rotor("B").unwrap().reflecting());
        assert!(catalog.rotor("Gamma").is_none());
        assert!(RotorCatalog::new().rotor("B").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut catalog = RotorCatalog::new();
        catalog.add(Rotor::fixed("Beta", identity())).unwrap();
        let err = catalog.add(Rotor::fixed("Beta", identity())).unwrap_err();
        assert!(err.is_config());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_get_mut_updates_setting() {
        let mut catalog = RotorCatalog::new();
        let id = catalog
            .add(Rotor::moving("I", identity(), "Q").unwrap())
            .unwrap();
        catalog.get_mut(id).advance();
        assert_eq!(catalog.get(id).setting(), 1);
        let (first_id, first) = catalog.iter().next().unwrap();
        assert_eq!(first_id, id);
        assert_eq!(first.setting(), 1);
    }
}
