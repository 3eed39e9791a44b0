//! Executes parsed commands against one store.

use domain::{
    Clock, ContactId, Group, GroupId, GroupKind, MessageId, RemovalSummary, Store, StoreError,
    User,
};
use serde::Serialize;

use crate::render::system_time_to_rfc3339;
use crate::script::Command;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unknown contact: {0}")]
    UnknownContact(ContactId),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Store(e) => e.code(),
            SessionError::UnknownContact(_) => "unknown_contact",
        }
    }
}

/// Compact listing entry for the `groups` command.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub id: GroupId,
    pub name: String,
    pub kind: GroupKind,
    pub admin: ContactId,
    pub members: Vec<ContactId>,
    pub messages: usize,
}

/// Result of one successful command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    UserCreated {
        user: User,
    },
    GroupCreated {
        group: Group,
    },
    MessageSent {
        message: MessageId,
        group: GroupId,
        count: usize,
        created_at: String,
    },
    AdminChanged {
        group: GroupId,
        admin: ContactId,
    },
    UserRemoved {
        #[serde(flatten)]
        summary: RemovalSummary,
        total: usize,
    },
    MessageFound {
        content: String,
    },
    Groups {
        groups: Vec<GroupView>,
    },
}

pub struct Session<C: Clock> {
    store: Store<C>,
}

impl<C: Clock> Session<C> {
    pub fn new(store: Store<C>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store<C> {
        &self.store
    }

    fn resolve(&self, contact: &ContactId) -> Result<User, SessionError> {
        self.store
            .users()
            .user(contact)
            .cloned()
            .ok_or_else(|| SessionError::UnknownContact(contact.clone()))
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let outcome = match command {
            Command::User { name, contact } => Outcome::UserCreated {
                user: self.store.create_user(name, contact)?,
            },
            Command::Group { contacts } => {
                let users = contacts
                    .iter()
                    .map(|c| self.resolve(c))
                    .collect::<Result<Vec<_>, _>>()?;
                Outcome::GroupCreated {
                    group: self.store.create_group(users)?,
                }
            }
            Command::Send {
                group,
                contact,
                content,
            } => {
                let sender = self.resolve(&contact)?;
                let message = self.store.create_message(content);
                let count = self.store.send_message(&message, &sender, group)?;
                Outcome::MessageSent {
                    message: message.id,
                    group,
                    count,
                    created_at: system_time_to_rfc3339(message.created_at),
                }
            }
            Command::Admin {
                group,
                approver,
                user,
            } => {
                let approver = self.resolve(&approver)?;
                let user = self.resolve(&user)?;
                self.store.change_admin(&approver, &user, group)?;
                Outcome::AdminChanged {
                    group,
                    admin: user.contact_id,
                }
            }
            Command::Remove { contact } => {
                let user = self.resolve(&contact)?;
                let summary = self.store.remove_user(&user)?;
                Outcome::UserRemoved {
                    summary,
                    total: summary.total(),
                }
            }
            Command::Find { start, end, k } => Outcome::MessageFound {
                content: self.store.find_message(start, end, k)?.to_owned(),
            },
            Command::Groups => Outcome::Groups {
                groups: self
                    .store
                    .groups()
                    .groups()
                    .map(|g| GroupView {
                        id: g.id,
                        name: g.name.clone(),
                        kind: g.kind,
                        admin: g.admin.contact_id.clone(),
                        members: g.members.iter().map(|m| m.contact_id.clone()).collect(),
                        messages: self.store.ledger().group_message_count(g.id),
                    })
                    .collect(),
            },
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_line;
    use domain::adapters::clock::ManualClock;

    fn run(session: &mut Session<ManualClock>, line: &str) -> Result<Outcome, SessionError> {
        let command = parse_line(line).unwrap().expect("a command");
        session.execute(command)
    }

    #[test]
    fn scripted_scenario() {
        let mut s = Session::new(Store::new(ManualClock::at_millis(1_000)));
        for line in [
            "user Alice +1",
            "user Bob +2",
            "user Charlie +3",
            "user Dan +4",
        ] {
            run(&mut s, line).unwrap();
        }
        match run(&mut s, "group +1 +2 +3").unwrap() {
            Outcome::GroupCreated { group } => assert_eq!(group.name, "Group 1"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        match run(&mut s, "group +1 +4").unwrap() {
            Outcome::GroupCreated { group } => assert_eq!(group.name, "Dan"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        for (line, expected) in [("send 1 +2 a", 1), ("send 1 +3 b", 2), ("send 1 +2 c", 3)] {
            s.store().clock().advance(std::time::Duration::from_secs(1));
            match run(&mut s, line).unwrap() {
                Outcome::MessageSent { count, .. } => assert_eq!(count, expected),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
        match run(&mut s, "remove +2").unwrap() {
            Outcome::UserRemoved { summary, total } => {
                assert_eq!(summary.members_remaining, 2);
                assert_eq!(summary.messages_remaining, 1);
                assert_eq!(total, 4);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        match run(&mut s, "find 1970-01-01T00:00:00Z 1970-01-01T01:00:00Z 1").unwrap() {
            Outcome::MessageFound { content } => assert_eq!(content, "b"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn errors_carry_codes() {
        let mut s = Session::new(Store::new(ManualClock::default()));
        run(&mut s, "user Alice +1").unwrap();
        let err = run(&mut s, "user Alicia +1").unwrap_err();
        assert_eq!(err.code(), "duplicate_user");

        let err = run(&mut s, "group +1 +404").unwrap_err();
        assert_eq!(err.code(), "unknown_contact");

        let err = run(&mut s, "group +1").unwrap_err();
        assert_eq!(err.code(), "invalid_group_size");

        let err = run(&mut s, "send 9 +1 hi").unwrap_err();
        assert_eq!(err.code(), "group_not_found");
    }

    #[test]
    fn groups_listing_serializes() {
        let mut s = Session::new(Store::new(ManualClock::default()));
        run(&mut s, "user Alice +1").unwrap();
        run(&mut s, "user Bob +2").unwrap();
        run(&mut s, "group +1 +2").unwrap();
        let outcome = run(&mut s, "groups").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "groups");
        assert_eq!(json["groups"][0]["name"], "Bob");
        assert_eq!(json["groups"][0]["kind"], "personal_chat");
        assert_eq!(json["groups"][0]["members"][1], "+2");
    }
}
