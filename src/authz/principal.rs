use super::position::{Position, Tier};
use crate::models::user::{SessionUser, User};

/// The acting identity every permission check is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: u64,
    pub tier: Tier,
}

impl Principal {
    pub fn new(id: u64, position: impl Into<Position>) -> Self {
        Self {
            id,
            tier: position.into().tier(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.tier.is_admin()
    }
}

impl From<&SessionUser> for Principal {
    fn from(user: &SessionUser) -> Self {
        Self::new(user.id, user.position)
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.position)
    }
}
