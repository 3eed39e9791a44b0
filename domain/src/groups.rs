//! Group creation, naming policy, membership and admin assignment.

use std::collections::BTreeMap;

use crate::validate::validate_group_size;
use crate::{Group, GroupId, GroupKind, StoreError, User};

/// Owns every group, keyed by id. Groups are never deleted, so iteration in
/// key order is creation order.
#[derive(Debug, Default)]
pub struct GroupDirectory {
    groups: BTreeMap<GroupId, Group>,
    last_group_id: u64,
    multi_member_groups: u64,
}

impl GroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group from an ordered user list; the first user is the admin.
    ///
    /// Two users make a personal chat named after the second user. Larger
    /// groups are named "Group N", N counting multi-member groups only.
    /// Membership in other groups is not checked.
    pub fn create_group(&mut self, users: Vec<User>) -> Result<Group, StoreError> {
        validate_group_size(users.len())?;

        let (kind, name) = if users.len() == 2 {
            (GroupKind::PersonalChat, users[1].name.clone())
        } else {
            self.multi_member_groups += 1;
            (
                GroupKind::MultiMember,
                format!("Group {}", self.multi_member_groups),
            )
        };

        self.last_group_id += 1;
        let group = Group {
            id: GroupId::new(self.last_group_id),
            name,
            kind,
            admin: users[0].clone(),
            members: users,
        };
        self.groups.insert(group.id, group.clone());
        Ok(group)
    }

    /// Hand admin rights from `approver` to `user`.
    pub fn change_admin(
        &mut self,
        approver: &User,
        user: &User,
        group_id: GroupId,
    ) -> Result<(), StoreError> {
        let group = self
            .groups
            .get_mut(&group_id)
            .ok_or(StoreError::GroupNotFound(group_id))?;
        if !group.is_admin(approver) {
            return Err(StoreError::NotAuthorized(approver.contact_id.clone()));
        }
        if !group.is_member(user) {
            return Err(StoreError::NotParticipant(user.contact_id.clone()));
        }
        group.admin = user.clone();
        Ok(())
    }

    /// Drop `user` from the first group (in creation order) that lists them.
    ///
    /// The admin cannot be detached; that is checked before anything changes.
    pub fn detach_member(&mut self, user: &User) -> Result<GroupId, StoreError> {
        let group = self
            .groups
            .values_mut()
            .find(|g| g.is_member(user))
            .ok_or_else(|| StoreError::UserNotFound(user.contact_id.clone()))?;
        if group.is_admin(user) {
            return Err(StoreError::AdminRemovalForbidden(user.contact_id.clone()));
        }
        group.members.retain(|m| m != user);
        Ok(group.id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// All groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// First group (in creation order) that lists `user` as a member.
    pub fn group_of(&self, user: &User) -> Option<&Group> {
        self.groups.values().find(|g| g.is_member(user))
    }

    pub fn multi_member_group_count(&self) -> u64 {
        self.multi_member_groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, contact: &str) -> User {
        User::new(name, contact)
    }

    #[test]
    fn personal_chat_is_named_after_second_user() {
        let mut dir = GroupDirectory::new();
        let g = dir
            .create_group(vec![user("Alice", "+1"), user("Bob", "+2")])
            .unwrap();
        assert_eq!(g.name, "Bob");
        assert_eq!(g.kind, GroupKind::PersonalChat);
        assert_eq!(g.admin, user("Alice", "+1"));
        assert_eq!(dir.multi_member_group_count(), 0);
    }

    #[test]
    fn multi_member_groups_are_numbered_ignoring_personal_chats() {
        let mut dir = GroupDirectory::new();
        let first = dir
            .create_group(vec![user("A", "+1"), user("B", "+2"), user("C", "+3")])
            .unwrap();
        let chat = dir
            .create_group(vec![user("D", "+4"), user("E", "+5")])
            .unwrap();
        let second = dir
            .create_group(vec![user("F", "+6"), user("G", "+7"), user("H", "+8")])
            .unwrap();
        assert_eq!(first.name, "Group 1");
        assert_eq!(chat.name, "E");
        assert_eq!(second.name, "Group 2");
        assert_eq!(dir.multi_member_group_count(), 2);
        let ids: Vec<_> = dir.groups().map(|g| g.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn too_few_users_is_rejected() {
        let mut dir = GroupDirectory::new();
        let err = dir.create_group(vec![user("A", "+1")]).unwrap_err();
        assert_eq!(err, StoreError::InvalidGroupSize(1));
        assert!(dir.is_empty());
        assert_eq!(dir.multi_member_group_count(), 0);
    }

    #[test]
    fn change_admin_checks_in_order() {
        let mut dir = GroupDirectory::new();
        let (a, b, c) = (user("A", "+1"), user("B", "+2"), user("C", "+3"));
        let outsider = user("X", "+9");
        let g = dir
            .create_group(vec![a.clone(), b.clone(), c.clone()])
            .unwrap();

        let missing = GroupId::new(42);
        assert_eq!(
            dir.change_admin(&a, &b, missing),
            Err(StoreError::GroupNotFound(missing))
        );
        assert_eq!(
            dir.change_admin(&b, &c, g.id),
            Err(StoreError::NotAuthorized(b.contact_id.clone()))
        );
        assert_eq!(
            dir.change_admin(&a, &outsider, g.id),
            Err(StoreError::NotParticipant(outsider.contact_id.clone()))
        );
        assert_eq!(dir.group(g.id).unwrap().admin, a);

        dir.change_admin(&a, &b, g.id).unwrap();
        let g = dir.group(g.id).unwrap();
        assert_eq!(g.admin, b);
        assert!(g.is_member(&g.admin));
    }

    #[test]
    fn detach_member_refuses_admin() {
        let mut dir = GroupDirectory::new();
        let (a, b, c) = (user("A", "+1"), user("B", "+2"), user("C", "+3"));
        let g = dir
            .create_group(vec![a.clone(), b.clone(), c.clone()])
            .unwrap();

        assert_eq!(
            dir.detach_member(&a),
            Err(StoreError::AdminRemovalForbidden(a.contact_id.clone()))
        );
        assert_eq!(dir.group(g.id).unwrap().members.len(), 3);

        assert_eq!(dir.detach_member(&b), Ok(g.id));
        assert_eq!(dir.group(g.id).unwrap().members, vec![a, c]);
        assert_eq!(
            dir.detach_member(&b),
            Err(StoreError::UserNotFound(b.contact_id.clone()))
        );
    }

    #[test]
    fn group_of_scans_in_creation_order() {
        let mut dir = GroupDirectory::new();
        let (a, b, c) = (user("A", "+1"), user("B", "+2"), user("C", "+3"));
        let first = dir.create_group(vec![a.clone(), b.clone()]).unwrap();
        // Membership is not exclusive at creation time.
        let _second = dir.create_group(vec![c.clone(), b.clone()]).unwrap();
        assert_eq!(dir.group_of(&b).map(|g| g.id), Some(first.id));
        assert_eq!(dir.group_of(&user("Z", "+0")), None);
    }
}
