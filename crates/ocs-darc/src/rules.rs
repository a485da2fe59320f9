//! Action → identity-set rules attached to a darc.
//!
//! The original's rules are boolean expressions over identities
//! (`a & b`, `a | b`); this workspace keeps the simpler disjunctive form a
//! `Vec<Identity>` already gives `Owners`/`Users`, which covers every
//! action this core actually evaluates (`spawn:darc`, `invoke:evolve`, and
//! caller-defined actions satisfied by any one listed identity).

use crate::error::DarcError;
use ocs_types::Identity;
use std::collections::BTreeMap;

/// A mapping from action string to the identities allowed to invoke it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rules(BTreeMap<String, Vec<Identity>>);

impl Rules {
    /// An empty rule set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a rule for `action`. Fails if one already exists.
    pub fn add_rule(&mut self, action: &str, identities: Vec<Identity>) -> Result<(), DarcError> {
        if self.0.contains_key(action) {
            return Err(DarcError::RuleAlreadyExists {
                action: action.to_string(),
            });
        }
        self.0.insert(action.to_string(), identities);
        Ok(())
    }

    /// Replace the rule for `action`. Fails if no rule exists yet.
    pub fn update_rule(
        &mut self,
        action: &str,
        identities: Vec<Identity>,
    ) -> Result<(), DarcError> {
        if !self.0.contains_key(action) {
            return Err(DarcError::RuleNotFound {
                action: action.to_string(),
            });
        }
        self.0.insert(action.to_string(), identities);
        Ok(())
    }

    /// Remove the rule for `action`. Fails if none exists.
    pub fn delete_rule(&mut self, action: &str) -> Result<(), DarcError> {
        if self.0.remove(action).is_none() {
            return Err(DarcError::RuleNotFound {
                action: action.to_string(),
            });
        }
        Ok(())
    }

    /// The identities allowed to invoke `action`, if any rule exists.
    pub fn get(&self, action: &str) -> Option<&[Identity]> {
        self.0.get(action).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocs_types::PublicKeyBytes;

    fn id(byte: u8) -> Identity {
        Identity::Ed25519([byte; 32] as PublicKeyBytes)
    }

    #[test]
    fn add_then_get() {
        let mut rules = Rules::new();
        rules.add_rule("invoke:evolve", vec![id(1)]).unwrap();
        assert_eq!(rules.get("invoke:evolve"), Some([id(1)].as_slice()));
    }

    #[test]
    fn add_twice_fails() {
        let mut rules = Rules::new();
        rules.add_rule("spawn:darc", vec![id(1)]).unwrap();
        assert!(matches!(
            rules.add_rule("spawn:darc", vec![id(2)]),
            Err(DarcError::RuleAlreadyExists { .. })
        ));
    }

    #[test]
    fn update_missing_fails() {
        let mut rules = Rules::new();
        assert!(matches!(
            rules.update_rule("spawn:darc", vec![id(1)]),
            Err(DarcError::RuleNotFound { .. })
        ));
    }

    #[test]
    fn delete_missing_fails() {
        let mut rules = Rules::new();
        assert!(matches!(
            rules.delete_rule("spawn:darc"),
            Err(DarcError::RuleNotFound { .. })
        ));
    }

    #[test]
    fn update_replaces_existing() {
        let mut rules = Rules::new();
        rules.add_rule("spawn:darc", vec![id(1)]).unwrap();
        rules.update_rule("spawn:darc", vec![id(2)]).unwrap();
        assert_eq!(rules.get("spawn:darc"), Some([id(2)].as_slice()));
    }
}
