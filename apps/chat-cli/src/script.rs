//! Line-oriented script commands.
//!
//! ```text
//! user <name...> <contact>
//! group <contact> <contact> [<contact>...]
//! send <group-id> <contact> <content...>
//! admin <group-id> <approver-contact> <user-contact>
//! remove <contact>
//! find <start-rfc3339> <end-rfc3339> <k>
//! groups
//! ```

use std::time::SystemTime;

use domain::{ContactId, GroupId};

use crate::render::parse_rfc3339;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    User { name: String, contact: ContactId },
    Group { contacts: Vec<ContactId> },
    Send { group: GroupId, contact: ContactId, content: String },
    Admin { group: GroupId, approver: ContactId, user: ContactId },
    Remove { contact: ContactId },
    Find { start: SystemTime, end: SystemTime, k: usize },
    Groups,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (cmd, args) = tokens.split_first().ok_or("empty command")?;

    let command = match *cmd {
        "user" => {
            let (contact, name) = args.split_last().ok_or("user requires <name> <contact>")?;
            if name.is_empty() {
                return Err("user requires <name> <contact>".into());
            }
            Command::User {
                name: name.join(" "),
                contact: ContactId::new(*contact),
            }
        }
        "group" => {
            if args.is_empty() {
                return Err("group requires at least one <contact>".into());
            }
            Command::Group {
                contacts: args.iter().map(|c| ContactId::new(*c)).collect(),
            }
        }
        "send" => {
            if args.len() < 3 {
                return Err("send requires <group-id> <contact> <content>".into());
            }
            Command::Send {
                group: parse_group_id(args[0])?,
                contact: ContactId::new(args[1]),
                content: args[2..].join(" "),
            }
        }
        "admin" => {
            let [group, approver, user] = args else {
                return Err("admin requires <group-id> <approver> <user>".into());
            };
            Command::Admin {
                group: parse_group_id(group)?,
                approver: ContactId::new(*approver),
                user: ContactId::new(*user),
            }
        }
        "remove" => {
            let [contact] = args else {
                return Err("remove requires <contact>".into());
            };
            Command::Remove {
                contact: ContactId::new(*contact),
            }
        }
        "find" => {
            let [start, end, k] = args else {
                return Err("find requires <start> <end> <k>".into());
            };
            Command::Find {
                start: parse_rfc3339(start).map_err(|e| format!("invalid start: {}", e))?,
                end: parse_rfc3339(end).map_err(|e| format!("invalid end: {}", e))?,
                k: k.parse().map_err(|_| format!("invalid k: {}", k))?,
            }
        }
        "groups" => Command::Groups,
        unk => return Err(format!("unknown command: {}", unk)),
    };
    Ok(Some(command))
}

fn parse_group_id(s: &str) -> Result<GroupId, String> {
    s.parse::<u64>()
        .map(GroupId::new)
        .map_err(|_| format!("invalid group id: {}", s))
}
