//! Registry of known identities, keyed by contact id.

use std::collections::BTreeMap;

use crate::{ContactId, StoreError, User};

/// Owns the set of used contact ids. Entries are never removed.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: BTreeMap<ContactId, User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new identity. Fails without side effects if the contact id
    /// is already taken.
    pub fn create_user<N, C>(&mut self, name: N, contact_id: C) -> Result<User, StoreError>
    where
        N: Into<String>,
        C: Into<ContactId>,
    {
        let contact_id = contact_id.into();
        if self.users.contains_key(&contact_id) {
            return Err(StoreError::DuplicateUser(contact_id));
        }
        let user = User::new(name, contact_id.clone());
        self.users.insert(contact_id, user.clone());
        Ok(user)
    }

    pub fn user(&self, contact_id: &ContactId) -> Option<&User> {
        self.users.get(contact_id)
    }

    pub fn contains(&self, contact_id: &ContactId) -> bool {
        self.users.contains_key(contact_id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
