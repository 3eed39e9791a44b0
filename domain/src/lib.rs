//! Domain library for the chat service.
//!
//! Holds the entity types (users, groups, messages), the `Clock` port, the
//! error definitions, and the in-memory store that enforces membership and
//! admin rules. Keep transport and IO concerns out of this crate.

use std::fmt::{Display, Formatter};
use std::time::SystemTime;

use serde::Serialize;

/// Globally unique contact identifier (a phone number in practice).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContactId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Surrogate key of a group, assigned in creation order starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupId(u64);

impl GroupId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message id; strictly increasing in creation order starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user. Two users are the same user iff their contact ids match.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub name: String,
    pub contact_id: ContactId,
}

impl User {
    pub fn new<N: Into<String>, C: Into<ContactId>>(name: N, contact_id: C) -> Self {
        Self {
            name: name.into(),
            contact_id: contact_id.into(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.contact_id == other.contact_id
    }
}

impl Eq for User {}

impl std::hash::Hash for User {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.contact_id.hash(state);
    }
}

/// How a group was classified when it was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Exactly two members; named after the non-admin party.
    PersonalChat,
    /// More than two members; named "Group N".
    MultiMember,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::PersonalChat => "personal_chat",
            GroupKind::MultiMember => "multi_member",
        }
    }
}

/// A group and its current membership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub kind: GroupKind,
    /// Members in join order.
    pub members: Vec<User>,
    /// Always an element of `members`.
    pub admin: User,
}

impl Group {
    pub fn is_member(&self, user: &User) -> bool {
        self.members.contains(user)
    }

    pub fn is_admin(&self, user: &User) -> bool {
        self.admin == *user
    }

    pub fn is_personal_chat(&self) -> bool {
        self.kind == GroupKind::PersonalChat
    }
}

/// A message. Detached (no sender, no group) until it is sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub created_at: SystemTime,
    pub sender: Option<User>,
    pub group: Option<GroupId>,
}

impl Message {
    pub fn new(id: MessageId, content: String, created_at: SystemTime) -> Self {
        Self {
            id,
            content,
            created_at,
            sender: None,
            group: None,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.group.is_some()
    }
}

/// Time source abstraction to make code testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Errors reported by store operations. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("user already exists: {0}")]
    DuplicateUser(ContactId),
    #[error("a group needs at least 2 users, got {0}")]
    InvalidGroupSize(usize),
    #[error("group does not exist: {0}")]
    GroupNotFound(GroupId),
    #[error("user {0} is not allowed to send messages to this group")]
    NotAMember(ContactId),
    #[error("approver {0} does not have rights")]
    NotAuthorized(ContactId),
    #[error("user {0} is not a participant")]
    NotParticipant(ContactId),
    #[error("user not found: {0}")]
    UserNotFound(ContactId),
    #[error("cannot remove admin {0}")]
    AdminRemovalForbidden(ContactId),
    #[error("k ({requested}) is greater than the number of messages ({available})")]
    InsufficientMessages { requested: usize, available: usize },
    #[error("k must be at least 1")]
    InvalidRank,
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),
    #[error("message {0} was already sent")]
    AlreadySent(MessageId),
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Stable machine-readable code for calling layers.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateUser(_) => "duplicate_user",
            StoreError::InvalidGroupSize(_) => "invalid_group_size",
            StoreError::GroupNotFound(_) => "group_not_found",
            StoreError::NotAMember(_) => "not_a_member",
            StoreError::NotAuthorized(_) => "not_authorized",
            StoreError::NotParticipant(_) => "not_participant",
            StoreError::UserNotFound(_) => "user_not_found",
            StoreError::AdminRemovalForbidden(_) => "admin_removal_forbidden",
            StoreError::InsufficientMessages { .. } => "insufficient_messages",
            StoreError::InvalidRank => "invalid_rank",
            StoreError::MessageNotFound(_) => "message_not_found",
            StoreError::AlreadySent(_) => "already_sent",
            StoreError::Poisoned => "poisoned",
        }
    }
}

/// Return a short about/version line for binaries to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - chat store library loaded", pkg, ver)
}

pub mod adapters;
pub mod groups;
pub mod ledger;
pub mod store;
pub mod users;
pub mod validate;

pub use store::{RemovalSummary, Store};
