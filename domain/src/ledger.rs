//! Message allocation, per-group message sequences and the sender index.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::groups::GroupDirectory;
use crate::validate::{in_open_window, validate_rank};
use crate::{GroupId, Message, MessageId, StoreError, User};

/// Owns every message created through the store.
///
/// Messages live in an arena keyed by id. Each group keeps the ids it
/// received in send order, and the sender index maps a sent message's id to
/// its author.
#[derive(Debug, Default)]
pub struct MessageLedger {
    messages: BTreeMap<MessageId, Message>,
    group_messages: BTreeMap<GroupId, Vec<MessageId>>,
    senders: BTreeMap<MessageId, User>,
    last_message_id: u64,
}

impl MessageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty message sequence for a newly created group.
    pub fn open_group(&mut self, group_id: GroupId) {
        self.group_messages.entry(group_id).or_default();
    }

    /// Allocate the next id and store a detached message.
    pub fn create_message(&mut self, content: String, created_at: SystemTime) -> Message {
        self.last_message_id += 1;
        let message = Message::new(MessageId::new(self.last_message_id), content, created_at);
        self.messages.insert(message.id, message.clone());
        message
    }

    /// Attach a detached message to a group on behalf of `sender`.
    ///
    /// Returns the number of messages in the group afterwards.
    pub fn send_message(
        &mut self,
        directory: &GroupDirectory,
        message_id: MessageId,
        sender: &User,
        group_id: GroupId,
    ) -> Result<usize, StoreError> {
        let group = directory
            .group(group_id)
            .ok_or(StoreError::GroupNotFound(group_id))?;
        if !group.is_member(sender) {
            return Err(StoreError::NotAMember(sender.contact_id.clone()));
        }
        let message = self
            .messages
            .get_mut(&message_id)
            .ok_or(StoreError::MessageNotFound(message_id))?;
        if message.is_sent() {
            return Err(StoreError::AlreadySent(message_id));
        }

        message.sender = Some(sender.clone());
        message.group = Some(group_id);
        self.senders.insert(message_id, sender.clone());
        let sequence = self.group_messages.entry(group_id).or_default();
        sequence.push(message_id);
        Ok(sequence.len())
    }

    /// Delete every message `user` sent into `group_id`, from the group's
    /// sequence, the sender index and the arena. Returns how many went.
    pub fn purge_sender(&mut self, group_id: GroupId, user: &User) -> usize {
        let Some(sequence) = self.group_messages.get_mut(&group_id) else {
            return 0;
        };
        let senders = &mut self.senders;
        let messages = &mut self.messages;
        let before = sequence.len();
        sequence.retain(|id| {
            let sent_by_user = senders.get(id).is_some_and(|s| s == user);
            if sent_by_user {
                senders.remove(id);
                messages.remove(id);
            }
            !sent_by_user
        });
        before - sequence.len()
    }

    /// Content of the `k`-th most recent message created strictly inside
    /// `(start, end)`, across all groups.
    ///
    /// Groups are scanned in creation order and each group in send order;
    /// the sort is stable, so equal timestamps keep that scan order.
    pub fn find_message(
        &self,
        start: SystemTime,
        end: SystemTime,
        k: usize,
    ) -> Result<&str, StoreError> {
        validate_rank(k)?;
        let mut matching: Vec<&Message> = self
            .group_messages
            .values()
            .flatten()
            .filter_map(|id| self.messages.get(id))
            .filter(|m| in_open_window(m.created_at, start, end))
            .collect();
        if matching.len() < k {
            return Err(StoreError::InsufficientMessages {
                requested: k,
                available: matching.len(),
            });
        }
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(&matching[k - 1].content)
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(&id)
    }

    /// Messages of a group in send order.
    pub fn messages_in(&self, group_id: GroupId) -> impl Iterator<Item = &Message> {
        self.group_messages
            .get(&group_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.messages.get(id))
    }

    pub fn group_message_count(&self, group_id: GroupId) -> usize {
        self.group_messages.get(&group_id).map_or(0, Vec::len)
    }

    pub fn sender_of(&self, id: MessageId) -> Option<&User> {
        self.senders.get(&id)
    }

    pub fn sender_index_len(&self) -> usize {
        self.senders.len()
    }
}
