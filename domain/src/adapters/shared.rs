//! Lock-guarded store for callers on more than one thread.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use crate::store::{RemovalSummary, Store};
use crate::{Clock, ContactId, Group, GroupId, Message, StoreError, User};

/// A store behind one reader-writer lock.
///
/// Every mutation runs under the exclusive lock. `find_message` and the
/// lookups share the read lock. Results are returned as owned values so no
/// guard escapes.
pub struct SharedStore<C: Clock> {
    inner: RwLock<Store<C>>,
}

impl<C: Clock> SharedStore<C> {
    pub fn new(store: Store<C>) -> Self {
        Self {
            inner: RwLock::new(store),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store<C>>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store<C>>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    pub fn create_user<N, I>(&self, name: N, contact_id: I) -> Result<User, StoreError>
    where
        N: Into<String>,
        I: Into<ContactId>,
    {
        self.write()?.create_user(name, contact_id)
    }

    pub fn create_group(&self, users: Vec<User>) -> Result<Group, StoreError> {
        self.write()?.create_group(users)
    }

    pub fn create_message<S: Into<String>>(&self, content: S) -> Result<Message, StoreError> {
        Ok(self.write()?.create_message(content))
    }

    pub fn send_message(
        &self,
        message: &Message,
        sender: &User,
        group_id: GroupId,
    ) -> Result<usize, StoreError> {
        self.write()?.send_message(message, sender, group_id)
    }

    pub fn change_admin(
        &self,
        approver: &User,
        user: &User,
        group_id: GroupId,
    ) -> Result<(), StoreError> {
        self.write()?.change_admin(approver, user, group_id)
    }

    pub fn remove_user(&self, user: &User) -> Result<RemovalSummary, StoreError> {
        self.write()?.remove_user(user)
    }

    pub fn find_message(
        &self,
        start: SystemTime,
        end: SystemTime,
        k: usize,
    ) -> Result<String, StoreError> {
        self.read()?.find_message(start, end, k).map(str::to_owned)
    }

    pub fn user(&self, contact_id: &ContactId) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users().user(contact_id).cloned())
    }

    pub fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError> {
        Ok(self.read()?.groups().group(id).cloned())
    }

    /// Run several reads against one consistent snapshot.
    pub fn with_read<R>(&self, f: impl FnOnce(&Store<C>) -> R) -> Result<R, StoreError> {
        Ok(f(&*self.read()?))
    }

    /// Run several mutations as one critical section.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Store<C>) -> R) -> Result<R, StoreError> {
        Ok(f(&mut *self.write()?))
    }
}
