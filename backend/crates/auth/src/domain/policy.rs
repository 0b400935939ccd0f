//! Authorization Policy
//!
//! Pure decision over the caller's resolved identity and the target resource.
//!
//! - `admin` may perform any resource-scoped operation
//! - `user` may act only on resources it owns
//! - `user` may not delete, not even its own resource

use kernel::id::UserId;

use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Kind of operation attempted on a user-owned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

impl Operation {
    #[inline]
    pub const fn is_destructive(&self) -> bool {
        matches!(self, Operation::Delete)
    }
}

/// Decide whether `caller` may perform `operation` on a resource owned by `owner`
pub fn is_permitted(
    caller_role: UserRole,
    caller_id: &UserId,
    owner_id: &UserId,
    operation: Operation,
) -> bool {
    match caller_role {
        UserRole::Admin => true,
        // Self-delete is reserved to admins
        UserRole::Standard => caller_id == owner_id && !operation.is_destructive(),
    }
}

/// [`is_permitted`] as a result, `Forbidden` on denial
pub fn authorize(
    caller_role: UserRole,
    caller_id: &UserId,
    owner_id: &UserId,
    operation: Operation,
) -> AuthResult<()> {
    if is_permitted(caller_role, caller_id, owner_id, operation) {
        Ok(())
    } else {
        tracing::debug!(
            caller_id = %caller_id,
            owner_id = %owner_id,
            role = %caller_role,
            ?operation,
            "Operation denied by policy"
        );
        Err(AuthError::Forbidden)
    }
}

/// Collection-wide operations (listing every identity) are admin-only
pub fn authorize_admin(caller_role: UserRole) -> AuthResult<()> {
    if caller_role.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Operation; 3] = [Operation::Read, Operation::Update, Operation::Delete];

    #[test]
    fn test_admin_is_always_permitted() {
        let admin = UserId::new();
        let other = UserId::new();
        for op in ALL {
            assert!(is_permitted(UserRole::Admin, &admin, &other, op));
            assert!(is_permitted(UserRole::Admin, &admin, &admin, op));
        }
    }

    #[test]
    fn test_standard_on_own_resource() {
        let me = UserId::new();
        assert!(is_permitted(UserRole::Standard, &me, &me, Operation::Read));
        assert!(is_permitted(UserRole::Standard, &me, &me, Operation::Update));
        assert!(!is_permitted(UserRole::Standard, &me, &me, Operation::Delete));
    }

    #[test]
    fn test_standard_on_foreign_resource() {
        let me = UserId::new();
        let other = UserId::new();
        for op in ALL {
            assert!(!is_permitted(UserRole::Standard, &me, &other, op));
        }
    }

    #[test]
    fn test_authorize_returns_forbidden() {
        let me = UserId::new();
        assert!(authorize(UserRole::Standard, &me, &me, Operation::Read).is_ok());
        assert!(matches!(
            authorize(UserRole::Standard, &me, &me, Operation::Delete),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_collection_is_admin_only() {
        assert!(authorize_admin(UserRole::Admin).is_ok());
        assert!(matches!(
            authorize_admin(UserRole::Standard),
            Err(AuthError::Forbidden)
        ));
    }
}
