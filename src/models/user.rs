//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User record as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Create user request body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Partial update request body. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

impl UpdateUser {
    /// Merge this patch onto an existing record, filling omitted fields
    /// from the stored value.
    pub fn merge_into(self, existing: User) -> User {
        User {
            id: existing.id,
            name: self.name.unwrap_or(existing.name),
            email: self.email.unwrap_or(existing.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> User {
        User {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let patch = UpdateUser {
            name: Some("Alicia".to_string()),
            email: None,
        };
        let merged = patch.merge_into(stored());
        assert_eq!(merged.name, "Alicia");
        assert_eq!(merged.email, "alice@example.com");
        assert_eq!(merged.id, 7);
    }

    #[test]
    fn merge_single_field_equals_full_merge() {
        // update(id, {email: X}) == update(id, merge(current, {email: X}))
        let patch = UpdateUser {
            name: None,
            email: Some("new@example.com".to_string()),
        };
        let direct = patch.clone().merge_into(stored());
        let full = UpdateUser {
            name: Some(stored().name),
            email: patch.email,
        }
        .merge_into(stored());
        assert_eq!(direct, full);
    }

    #[test]
    fn empty_patch_is_identity() {
        let merged = UpdateUser::default().merge_into(stored());
        assert_eq!(merged, stored());
    }
}
