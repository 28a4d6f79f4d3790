// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Principals and the factory that builds them.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Attribute bag: name to one or more values.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// A resolved, canonical identity.
///
/// Equality and hashing consider the id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    #[serde(default)]
    attributes: Attributes,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }
}

impl PartialEq for Principal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Principal {}

impl Hash for Principal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Builds canonical principals from raw identifiers.
pub trait PrincipalFactory: Send + Sync + 'static {
    fn create_principal(&self, id: &str, attributes: Attributes) -> Principal;
}

/// Takes the identifier verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrincipalFactory;

impl PrincipalFactory for DefaultPrincipalFactory {
    fn create_principal(&self, id: &str, attributes: Attributes) -> Principal {
        Principal::with_attributes(id, attributes)
    }
}

/// Merges `incoming` into `target`; keys already present in `target` win.
pub fn merge_attributes(target: &mut Attributes, incoming: &Attributes) {
    for (name, values) in incoming {
        target
            .entry(name.clone())
            .or_insert_with(|| values.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_is_by_id_only() {
        let mut attrs = Attributes::new();
        attrs.insert("mail".into(), vec!["a@example.org".into()]);
        let a = Principal::with_attributes("scott", attrs);
        let b = Principal::new("scott");
        assert_eq!(a, b);

        let set: HashSet<Principal> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn merge_is_first_writer_wins() {
        let mut target = Attributes::new();
        target.insert("role".into(), vec!["staff".into()]);

        let mut incoming = Attributes::new();
        incoming.insert("role".into(), vec!["admin".into()]);
        incoming.insert("mail".into(), vec!["s@example.org".into()]);

        merge_attributes(&mut target, &incoming);
        assert_eq!(target["role"], vec!["staff".to_string()]);
        assert_eq!(target["mail"], vec!["s@example.org".to_string()]);
    }

    #[test]
    fn default_factory_keeps_id_verbatim() {
        let p = DefaultPrincipalFactory.create_principal("brian", Attributes::new());
        assert_eq!(p.id(), "brian");
        assert!(p.attributes().is_empty());
    }
}
