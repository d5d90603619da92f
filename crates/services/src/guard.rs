//! # Ownership & Authorization Guard
//!
//! The single place where "who may do what" is decided. Handlers and
//! services call these functions instead of sprinkling role checks around;
//! the admin bypass lives here and nowhere else.
//!
//! Two failure kinds are kept strictly apart: `Unauthorized` means no
//! identity was presented at all, `Forbidden` means the identity exists but
//! lacks the right. Callers map them to different responses.

use domains::{Actor, DomainError, Result};
use uuid::Uuid;

/// What the actor is trying to do to a target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Update,
    Delete,
    Administer,
}

/// Central decision function: may `actor` perform `action` on an entity
/// owned by `owner`? `publicly_readable` marks entities anonymous visitors
/// may read (published blogs and their comments).
pub fn authorize(
    actor: Option<&Actor>,
    action: Action,
    owner: Uuid,
    publicly_readable: bool,
) -> Result<()> {
    match action {
        Action::Read => {
            if publicly_readable {
                return Ok(());
            }
            let actor = require_actor(actor)?;
            if actor.is_admin() || actor.id == owner {
                Ok(())
            } else {
                Err(DomainError::Forbidden("not authorized to view this resource".into()))
            }
        }
        Action::Update | Action::Delete => {
            let actor = require_actor(actor)?;
            if actor.is_admin() || actor.id == owner {
                Ok(())
            } else {
                Err(DomainError::Forbidden("not authorized to modify this resource".into()))
            }
        }
        Action::Administer => require_admin(actor).map(|_| ()),
    }
}

/// Fails with `Unauthorized` when no identity is present.
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor> {
    actor.ok_or_else(|| DomainError::Unauthorized("authentication required".into()))
}

/// Fails with `Unauthorized` for anonymous callers, `Forbidden` for
/// non-admin identities.
pub fn require_admin(actor: Option<&Actor>) -> Result<&Actor> {
    let actor = require_actor(actor)?;
    if actor.is_admin() {
        Ok(actor)
    } else {
        Err(DomainError::Forbidden("admin access required".into()))
    }
}

/// Author-or-admin check for mutating a blog or comment. `entity` names the
/// thing in the error message ("blog", "comment").
pub fn authorize_mutation<'a>(
    actor: Option<&'a Actor>,
    owner: Uuid,
    entity: &str,
) -> Result<&'a Actor> {
    let actor = require_actor(actor)?;
    if actor.is_admin() || actor.id == owner {
        Ok(actor)
    } else {
        Err(DomainError::Forbidden(format!("not authorized to modify this {entity}")))
    }
}

/// Drafts are visible to their author and to admins only.
pub fn can_view_blog(actor: Option<&Actor>, author: Uuid, published: bool) -> bool {
    published || matches!(actor, Some(a) if a.is_admin() || a.id == author)
}

/// Admins are barred from the reporting workflow entirely.
pub fn authorize_reporter(actor: Option<&Actor>) -> Result<&Actor> {
    let actor = require_actor(actor)?;
    if actor.is_admin() {
        Err(DomainError::Forbidden("admin users cannot submit reports or complaints".into()))
    } else {
        Ok(actor)
    }
}

/// Reporting your own content is rejected with `InvalidOperation`.
pub fn reject_self_report(actor: &Actor, content_owner: Uuid, what: &str) -> Result<()> {
    if actor.id == content_owner {
        Err(DomainError::InvalidOperation(format!("you cannot report your own {what}")))
    } else {
        Ok(())
    }
}

/// An admin may not delete or re-role their own account. `action` completes
/// the error message ("delete", "change the role of").
pub fn forbid_self_administration(actor: &Actor, target_user: Uuid, action: &str) -> Result<()> {
    if actor.id == target_user {
        Err(DomainError::InvalidOperation(format!("cannot {action} your own account")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::Role;

    fn user() -> Actor {
        Actor { id: Uuid::now_v7(), role: Role::User }
    }

    fn admin() -> Actor {
        Actor { id: Uuid::now_v7(), role: Role::Admin }
    }

    #[test]
    fn anonymous_reads_public_entities_only() {
        let owner = Uuid::now_v7();
        assert!(authorize(None, Action::Read, owner, true).is_ok());
        assert!(matches!(
            authorize(None, Action::Read, owner, false),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            authorize(None, Action::Update, owner, true),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn author_may_mutate_stranger_may_not() {
        let actor = user();
        assert!(authorize(Some(&actor), Action::Update, actor.id, false).is_ok());
        assert!(authorize(Some(&actor), Action::Delete, actor.id, false).is_ok());

        let stranger = user();
        assert!(matches!(
            authorize(Some(&stranger), Action::Delete, actor.id, false),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_bypasses_ownership_but_not_reporting() {
        let a = admin();
        let owner = Uuid::now_v7();
        assert!(authorize(Some(&a), Action::Update, owner, false).is_ok());
        assert!(authorize(Some(&a), Action::Administer, owner, false).is_ok());
        assert!(matches!(authorize_reporter(Some(&a)), Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn administer_requires_admin_role() {
        let u = user();
        assert!(matches!(
            authorize(Some(&u), Action::Administer, u.id, false),
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(None, Action::Administer, u.id, false),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn self_targeting_rules() {
        let a = admin();
        assert!(matches!(
            forbid_self_administration(&a, a.id, "delete"),
            Err(DomainError::InvalidOperation(_))
        ));
        assert!(forbid_self_administration(&a, Uuid::now_v7(), "delete").is_ok());

        let u = user();
        assert!(matches!(
            reject_self_report(&u, u.id, "article"),
            Err(DomainError::InvalidOperation(_))
        ));
        assert!(reject_self_report(&u, Uuid::now_v7(), "article").is_ok());
    }
}
