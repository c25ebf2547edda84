//! Identity and role types supplied by the authentication collaborator

use crate::auth::Capability;
use crate::core::types::{ServicePointId, UserId};
use crate::queue::QueueError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumString};

/// Role assigned by the accounts system
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Customer,
    Staff,
}

impl Role {
    /// Capability subset granted to this role
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Customer => &[Capability::Join],
            Role::Staff => &[
                Capability::Join,
                Capability::ManageOwnServicePoints,
                Capability::CallNextOwn,
                Capability::DismissOwn,
                Capability::ViewOwnAnalytics,
            ],
        }
    }
}

/// Authenticated caller context for one operation
///
/// Constructed by the API layer from its session state. `owned_points` is the
/// set of service points the accounts system attributes to a staff member and
/// is only consulted for operations that scan "all my points" (call-next
/// without an explicit target, analytics); per-point ownership checks compare
/// against the registry record itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
    pub owned_points: HashSet<ServicePointId>,
}

impl Identity {
    /// Identity for a customer (owns no service points)
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
            owned_points: HashSet::new(),
        }
    }

    /// Identity for a staff member with the given owned service points
    pub fn staff(user_id: UserId, owned_points: impl IntoIterator<Item = ServicePointId>) -> Self {
        Self {
            user_id,
            role: Role::Staff,
            owned_points: owned_points.into_iter().collect(),
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.role.capabilities().contains(&capability)
    }

    /// Single up-front authorisation check for an operation
    pub fn require(&self, capability: Capability) -> Result<(), QueueError> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(QueueError::Forbidden(format!(
                "Role '{}' may not perform this operation",
                self.role
            )))
        }
    }

    /// Owned service points in deterministic (ascending id) order
    pub fn owned_points_sorted(&self) -> Vec<ServicePointId> {
        let mut points: Vec<ServicePointId> = self.owned_points.iter().copied().collect();
        points.sort();
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_strings_match_wire_format() {
        assert_eq!(Role::Customer.to_string(), "customer");
        assert_eq!(Role::Staff.to_string(), "staff");
        assert_eq!(Role::from_str("staff").unwrap(), Role::Staff);
        assert!(Role::from_str("admin").is_err());
    }

    #[test]
    fn test_customer_capabilities() {
        let identity = Identity::customer(UserId(1));
        assert!(identity.has_capability(Capability::Join));
        assert!(!identity.has_capability(Capability::CallNextOwn));
        assert!(identity.require(Capability::Join).is_ok());
        assert!(matches!(
            identity.require(Capability::DismissOwn),
            Err(QueueError::Forbidden(_))
        ));
    }

    #[test]
    fn test_staff_capabilities() {
        let identity = Identity::staff(UserId(2), [ServicePointId(7)]);
        assert!(identity.has_capability(Capability::Join));
        assert!(identity.has_capability(Capability::ManageOwnServicePoints));
        assert!(identity.has_capability(Capability::ViewOwnAnalytics));
    }

    #[test]
    fn test_owned_points_sorted() {
        let identity = Identity::staff(
            UserId(2),
            [ServicePointId(9), ServicePointId(3), ServicePointId(5)],
        );
        assert_eq!(
            identity.owned_points_sorted(),
            vec![ServicePointId(3), ServicePointId(5), ServicePointId(9)]
        );
    }
}
