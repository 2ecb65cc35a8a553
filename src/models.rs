use serde::{Deserialize, Serialize};

/// Claims of the bearer tokens issued by the credential store.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,

    /// Absent on tokens from issuers that only mint access tokens
    #[serde(default)]
    pub token_type: TokenType,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    #[default]
    Access,
    Refresh,
}
