use strum_macros::{AsRefStr, Display};

/// Role carried in the access token's `role` claim.
#[derive(Debug, Copy, Clone, Eq, PartialEq, AsRefStr, Display)]
pub enum Role {
    #[strum(serialize = "HR")]
    Hr = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }
}
