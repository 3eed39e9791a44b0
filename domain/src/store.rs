//! The store facade.
//!
//! `Store` ties the user registry, group directory and message ledger
//! together and runs the operations that touch more than one of them.

use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::groups::GroupDirectory;
use crate::ledger::MessageLedger;
use crate::users::UserRegistry;
use crate::{Clock, ContactId, Group, GroupId, Message, StoreError, User};

/// Counts observed right after a successful `remove_user`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RemovalSummary {
    /// Group the user was removed from.
    pub group: GroupId,
    pub members_remaining: usize,
    pub messages_remaining: usize,
    /// Size of the store-wide sender index.
    pub total_messages_remaining: usize,
}

impl RemovalSummary {
    /// Sum of the three counters, the single number older callers expect.
    pub fn total(&self) -> usize {
        self.members_remaining + self.messages_remaining + self.total_messages_remaining
    }
}

/// Facade over the user registry, group directory and message ledger.
///
/// Every operation validates fully before it writes, so a failed call leaves
/// the store exactly as it was. The store is single-threaded; wrap it in
/// [`crate::adapters::shared::SharedStore`] to hand it to concurrent callers.
pub struct Store<C: Clock> {
    users: UserRegistry,
    groups: GroupDirectory,
    ledger: MessageLedger,
    clock: C,
}

impl<C: Clock> Store<C> {
    pub fn new(clock: C) -> Self {
        Self {
            users: UserRegistry::new(),
            groups: GroupDirectory::new(),
            ledger: MessageLedger::new(),
            clock,
        }
    }

    /// Register a user under a contact id that has not been used before.
    pub fn create_user<N, I>(&mut self, name: N, contact_id: I) -> Result<User, StoreError>
    where
        N: Into<String>,
        I: Into<ContactId>,
    {
        let user = self
            .users
            .create_user(name, contact_id)
            .inspect_err(|e| warn!(error = %e, "create_user rejected"))?;
        info!(contact = %user.contact_id, "user created");
        Ok(user)
    }

    /// Create a group; the first user becomes its admin.
    pub fn create_group(&mut self, users: Vec<User>) -> Result<Group, StoreError> {
        let group = self
            .groups
            .create_group(users)
            .inspect_err(|e| warn!(error = %e, "create_group rejected"))?;
        self.ledger.open_group(group.id);
        info!(
            group = %group.id,
            name = %group.name,
            kind = group.kind.as_str(),
            members = group.members.len(),
            "group created"
        );
        Ok(group)
    }

    /// Allocate a detached message stamped with the current time.
    pub fn create_message<S: Into<String>>(&mut self, content: S) -> Message {
        let message = self.ledger.create_message(content.into(), self.clock.now());
        debug!(message_id = %message.id, "message created");
        message
    }

    /// Send a previously created message into a group.
    ///
    /// `message` must have come from this store's `create_message`; only its
    /// id is read, and the stored copy is what gets attached. Returns the
    /// number of messages in that group afterwards.
    pub fn send_message(
        &mut self,
        message: &Message,
        sender: &User,
        group_id: GroupId,
    ) -> Result<usize, StoreError> {
        let count = self
            .ledger
            .send_message(&self.groups, message.id, sender, group_id)
            .inspect_err(|e| warn!(error = %e, message_id = %message.id, "send_message rejected"))?;
        info!(
            message_id = %message.id,
            group = %group_id,
            sender = %sender.contact_id,
            count,
            "message sent"
        );
        Ok(count)
    }

    /// Transfer admin rights of a group from `approver` to `user`.
    pub fn change_admin(
        &mut self,
        approver: &User,
        user: &User,
        group_id: GroupId,
    ) -> Result<(), StoreError> {
        self.groups
            .change_admin(approver, user, group_id)
            .inspect_err(|e| warn!(error = %e, group = %group_id, "change_admin rejected"))?;
        info!(group = %group_id, admin = %user.contact_id, "admin changed");
        Ok(())
    }

    /// Remove a non-admin user from their group, together with every message
    /// they sent there.
    pub fn remove_user(&mut self, user: &User) -> Result<RemovalSummary, StoreError> {
        let group_id = self
            .groups
            .detach_member(user)
            .inspect_err(|e| warn!(error = %e, "remove_user rejected"))?;
        let purged = self.ledger.purge_sender(group_id, user);

        let summary = RemovalSummary {
            group: group_id,
            members_remaining: self
                .groups
                .group(group_id)
                .map_or(0, |g| g.members.len()),
            messages_remaining: self.ledger.group_message_count(group_id),
            total_messages_remaining: self.ledger.sender_index_len(),
        };
        info!(
            contact = %user.contact_id,
            group = %group_id,
            purged,
            total = summary.total(),
            "user removed"
        );
        Ok(summary)
    }

    /// Content of the `k`-th most recent message sent strictly between
    /// `start` and `end`, across all groups.
    pub fn find_message(
        &self,
        start: SystemTime,
        end: SystemTime,
        k: usize,
    ) -> Result<&str, StoreError> {
        let found = self.ledger.find_message(start, end, k);
        debug!(k, found = found.is_ok(), "find_message");
        found
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn groups(&self) -> &GroupDirectory {
        &self.groups
    }

    pub fn ledger(&self) -> &MessageLedger {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
