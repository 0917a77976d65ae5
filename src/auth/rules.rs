//! Access rules for task operations.
//!
//! Pure decision functions: no I/O, no clock. Callers load whatever
//! resource facts a rule needs (the task row, the owner's manager link)
//! before invoking it. Role checks are evaluated strictly before ownership
//! and hierarchy checks, so a caller in the wrong role always sees the
//! role denial regardless of unrelated resource state.

use uuid::Uuid;

use crate::database::models::task::Task;
use crate::middleware::auth::AuthUser;

/// Outcome of an access rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

/// Why a rule denied the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The caller's role cannot perform this operation at all.
    RoleNotPermitted(&'static str),
    /// A technician touched a task owned by someone else.
    NotOwner,
    /// The task owner has no manager link on record.
    NoManagerLink,
    /// Hierarchy does not connect the caller to the target.
    Forbidden(&'static str),
}

impl Decision {
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(denial) => Err(denial),
        }
    }
}

/// Only technicians create tasks, and they always create their own.
pub fn can_create_task(identity: &AuthUser) -> Decision {
    if !identity.is_technician() {
        return Decision::Denied(Denial::RoleNotPermitted("Only Technicians can create tasks"));
    }
    Decision::Allowed
}

/// Technicians update tasks they own; managers never update.
pub fn can_update_task(identity: &AuthUser, task: &Task) -> Decision {
    if !identity.is_technician() {
        return Decision::Denied(Denial::RoleNotPermitted(
            "Only Technicians can update their tasks",
        ));
    }
    if task.user_id != identity.user_id {
        return Decision::Denied(Denial::NotOwner);
    }
    Decision::Allowed
}

/// Managers delete tasks, and only those owned by their own technicians.
///
/// `owner_link` is the task owner's resolved manager link. A missing link
/// is a missing relationship, reported distinctly from an insufficient
/// role.
pub fn can_delete_task(identity: &AuthUser, owner_link: Option<Uuid>) -> Decision {
    if !identity.is_manager() {
        return Decision::Denied(Denial::RoleNotPermitted("Only Managers can delete tasks"));
    }
    match owner_link {
        None => Decision::Denied(Denial::NoManagerLink),
        Some(manager_id) if manager_id == identity.user_id => Decision::Allowed,
        Some(_) => Decision::Denied(Denial::Forbidden(
            "You can only delete tasks owned by your technicians",
        )),
    }
}

/// A user lists their own tasks; a manager also lists a linked technician's.
pub fn can_list_tasks_of(
    identity: &AuthUser,
    target_user_id: Uuid,
    target_link: Option<Uuid>,
) -> Decision {
    if identity.user_id == target_user_id {
        return Decision::Allowed;
    }
    match target_link {
        Some(manager_id) if manager_id == identity.user_id => Decision::Allowed,
        _ => Decision::Denied(Denial::Forbidden(
            "You can only view your own tasks or those of your technicians",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn technician(manager_id: Uuid) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            manager_id: Some(manager_id),
        }
    }

    fn manager() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            manager_id: None,
        }
    }

    fn task_owned_by(owner: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: owner,
            summary: "Replace the compressor filter".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 6, 12).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn technicians_create_managers_do_not() {
        assert_eq!(can_create_task(&technician(Uuid::new_v4())), Decision::Allowed);
        assert!(matches!(
            can_create_task(&manager()),
            Decision::Denied(Denial::RoleNotPermitted(_))
        ));
    }

    #[test]
    fn technician_updates_own_task_only() {
        let tech = technician(Uuid::new_v4());
        let own = task_owned_by(tech.user_id);
        let other = task_owned_by(Uuid::new_v4());

        assert_eq!(can_update_task(&tech, &own), Decision::Allowed);
        assert_eq!(
            can_update_task(&tech, &other),
            Decision::Denied(Denial::NotOwner)
        );
    }

    #[test]
    fn manager_update_denied_by_role_before_ownership() {
        // A manager never owns a task either, but the role denial must win
        // so the decision is independent of resource state.
        let boss = manager();
        let task = task_owned_by(Uuid::new_v4());
        assert!(matches!(
            can_update_task(&boss, &task),
            Decision::Denied(Denial::RoleNotPermitted(_))
        ));
    }

    #[test]
    fn manager_deletes_linked_technicians_tasks_only() {
        let boss = manager();
        assert_eq!(can_delete_task(&boss, Some(boss.user_id)), Decision::Allowed);
        assert!(matches!(
            can_delete_task(&boss, Some(Uuid::new_v4())),
            Decision::Denied(Denial::Forbidden(_))
        ));
    }

    #[test]
    fn missing_link_is_distinct_from_wrong_role() {
        let boss = manager();
        assert_eq!(
            can_delete_task(&boss, None),
            Decision::Denied(Denial::NoManagerLink)
        );

        let tech = technician(Uuid::new_v4());
        assert!(matches!(
            can_delete_task(&tech, Some(Uuid::new_v4())),
            Decision::Denied(Denial::RoleNotPermitted(_))
        ));
        // Role is checked first even when the link is also missing.
        assert!(matches!(
            can_delete_task(&tech, None),
            Decision::Denied(Denial::RoleNotPermitted(_))
        ));
    }

    #[test]
    fn listing_is_self_or_managed() {
        let boss = manager();
        let tech = technician(boss.user_id);

        // Self, with or without a link on record.
        assert_eq!(
            can_list_tasks_of(&tech, tech.user_id, Some(boss.user_id)),
            Decision::Allowed
        );
        assert_eq!(can_list_tasks_of(&boss, boss.user_id, None), Decision::Allowed);

        // Manager of the target.
        assert_eq!(
            can_list_tasks_of(&boss, tech.user_id, Some(boss.user_id)),
            Decision::Allowed
        );

        // Everyone else.
        let stranger = technician(Uuid::new_v4());
        assert!(matches!(
            can_list_tasks_of(&stranger, tech.user_id, Some(boss.user_id)),
            Decision::Denied(Denial::Forbidden(_))
        ));
        let other_boss = manager();
        assert!(matches!(
            can_list_tasks_of(&other_boss, tech.user_id, Some(boss.user_id)),
            Decision::Denied(Denial::Forbidden(_))
        ));
    }
}
