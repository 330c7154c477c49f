// src/permissions.rs

//! Access policy
//!
//! - Anyone may read tags, ingredients and recipes
//! - Signed-in users may create recipes and manage their own favorites,
//!   shopping cart and subscriptions
//! - A recipe may be changed or deleted by its author, staff or a superuser
//! - Only staff may change the tag and ingredient catalog

use crate::error::{Error, Result};

/// Who is making a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User {
        id: i64,
        is_staff: bool,
        is_superuser: bool,
    },
}

/// Operations subject to the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read any public resource
    Read,
    /// Create a recipe, follow an author, fill favorites or cart
    Contribute,
    /// Update or delete the recipe written by `author_id`
    EditRecipe { author_id: i64 },
    /// Create, update or delete tags and ingredients
    EditCatalog,
}

impl Actor {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Actor::Anonymous => None,
            Actor::User { id, .. } => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User { .. })
    }

    fn is_admin(&self) -> bool {
        matches!(
            self,
            Actor::User { is_staff: true, .. } | Actor::User { is_superuser: true, .. }
        )
    }

    /// Whether the policy allows `action`
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => true,
            Action::Contribute => self.is_authenticated(),
            Action::EditRecipe { author_id } => {
                self.user_id() == Some(author_id) || self.is_admin()
            }
            Action::EditCatalog => self.is_admin(),
        }
    }

    /// `Ok` when allowed; `Unauthorized` for anonymous callers, `PermissionDenied` otherwise
    pub fn require(&self, action: Action) -> Result<()> {
        if self.allows(action) {
            return Ok(());
        }
        if !self.is_authenticated() {
            return Err(Error::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            ));
        }
        Err(Error::PermissionDenied(
            "You do not have permission to perform this action.".to_string(),
        ))
    }

    /// The signed-in user's id, or `Unauthorized`
    pub fn require_user(&self) -> Result<i64> {
        self.user_id().ok_or_else(|| {
            Error::Unauthorized("Authentication credentials were not provided.".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> Actor {
        Actor::User {
            id,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[test]
    fn test_anonymous_reads_only() {
        let actor = Actor::Anonymous;
        assert!(actor.allows(Action::Read));
        assert!(!actor.allows(Action::Contribute));
        assert!(matches!(actor.require(Action::Contribute), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn test_author_edits_own_recipe() {
        assert!(user(1).allows(Action::EditRecipe { author_id: 1 }));
        assert!(!user(2).allows(Action::EditRecipe { author_id: 1 }));
        assert!(matches!(
            user(2).require(Action::EditRecipe { author_id: 1 }),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_admins() {
        let staff = Actor::User {
            id: 5,
            is_staff: true,
            is_superuser: false,
        };
        let superuser = Actor::User {
            id: 6,
            is_staff: false,
            is_superuser: true,
        };
        assert!(staff.allows(Action::EditCatalog));
        assert!(staff.allows(Action::EditRecipe { author_id: 1 }));
        assert!(superuser.allows(Action::EditRecipe { author_id: 1 }));
        assert!(!user(1).allows(Action::EditCatalog));
    }
}
