//! Role and ownership access decisions.
//!
//! `decide` is pure: it sees the caller's name and roles plus the owner name
//! of the target resource (when the operation has one) and nothing else.
//! Handlers resolve the owner first; a failed lookup is reported as not-found
//! before this function is ever consulted.
//!
//! Ownership is matched on the identity *name*, not on a stable id. Names are
//! unique at the store layer, and that uniqueness is what keeps this sound.

use crate::services::auth::role::Role;

/// Operation kinds guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CreateOrder,
    ReadOrder,
    UpdateOrder,
    DeleteOrder,
    ReadUser,
    UpdateUser,
    DeleteUser,
    ListUserOrders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Caller must hold one of the roles. Ownership is irrelevant.
    AnyRole(&'static [Role]),
    /// Caller must hold one of the roles, and then be ADMIN or the owner.
    OwnerOrAdmin(&'static [Role]),
}

const USER_ONLY: &[Role] = &[Role::User];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];

impl Capability {
    fn rule(self) -> Rule {
        match self {
            Capability::CreateOrder => Rule::AnyRole(USER_ONLY),
            Capability::UpdateOrder | Capability::DeleteOrder => Rule::AnyRole(ADMIN_ONLY),
            Capability::ReadOrder
            | Capability::ReadUser
            | Capability::UpdateUser
            | Capability::DeleteUser
            | Capability::ListUserOrders => Rule::OwnerOrAdmin(USER_OR_ADMIN),
        }
    }
}

pub fn decide(
    capability: Capability,
    caller_name: Option<&str>,
    caller_roles: &[Role],
    owner_name: Option<&str>,
) -> AccessDecision {
    let Some(caller_name) = caller_name else {
        return AccessDecision::Deny;
    };

    let holds_any = |allowed: &[Role]| caller_roles.iter().any(|r| allowed.contains(r));

    let allowed = match capability.rule() {
        Rule::AnyRole(roles) => holds_any(roles),
        Rule::OwnerOrAdmin(roles) => {
            holds_any(roles)
                && (caller_roles.iter().any(Role::is_admin) || owner_name == Some(caller_name))
        }
    };

    if allowed {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use AccessDecision::{Allow, Deny};
    use Capability::*;

    const ALL: [Capability; 8] = [
        CreateOrder,
        ReadOrder,
        UpdateOrder,
        DeleteOrder,
        ReadUser,
        UpdateUser,
        DeleteUser,
        ListUserOrders,
    ];

    #[test]
    fn create_order_is_user_only() {
        assert_eq!(decide(CreateOrder, Some("alice"), &[Role::User], None), Allow);
        assert_eq!(decide(CreateOrder, Some("root"), &[Role::Admin], None), Deny);
    }

    #[test]
    fn order_mutation_is_admin_only_regardless_of_ownership() {
        for cap in [UpdateOrder, DeleteOrder] {
            assert_eq!(decide(cap, Some("root"), &[Role::Admin], Some("alice")), Allow);
            assert_eq!(decide(cap, Some("alice"), &[Role::User], Some("alice")), Deny);
        }
    }

    #[test]
    fn owner_scoped_reads() {
        for cap in [ReadOrder, ReadUser, UpdateUser, DeleteUser, ListUserOrders] {
            assert_eq!(decide(cap, Some("alice"), &[Role::User], Some("alice")), Allow);
            assert_eq!(decide(cap, Some("alice"), &[Role::User], Some("bob")), Deny);
            assert_eq!(decide(cap, Some("alice"), &[Role::User], None), Deny);
            assert_eq!(decide(cap, Some("root"), &[Role::Admin], None), Allow);
        }
    }

    #[test]
    fn anonymous_is_always_denied() {
        for cap in ALL {
            assert_eq!(decide(cap, None, &[Role::Admin], Some("alice")), Deny);
            assert_eq!(decide(cap, None, &[], None), Deny);
        }
    }

    #[test]
    fn no_roles_means_no_access() {
        for cap in ALL {
            assert_eq!(decide(cap, Some("alice"), &[], Some("alice")), Deny);
        }
    }

    proptest! {
        #[test]
        fn admin_passes_read_update_delete_for_any_owner(
            caller in "[a-z]{1,12}",
            owner in proptest::option::of("[a-z]{1,12}"),
        ) {
            for cap in [ReadOrder, UpdateOrder, DeleteOrder, ReadUser, UpdateUser, DeleteUser] {
                prop_assert_eq!(
                    decide(cap, Some(&caller), &[Role::Admin], owner.as_deref()),
                    Allow
                );
            }
        }

        #[test]
        fn user_reads_order_only_when_names_match(
            caller in "[a-z]{1,12}",
            owner in "[a-z]{1,12}",
        ) {
            let expected = if caller == owner { Allow } else { Deny };
            prop_assert_eq!(
                decide(ReadOrder, Some(&caller), &[Role::User], Some(&owner)),
                expected
            );
        }
    }
}
