//! Session variables from the request context.

use std::collections::HashMap;

use crate::access::Principal;

/// Session variable carrying the authenticated user's id.
pub const USER_ID_KEY: &str = "x-calchart-user-id";

/// Parsed session variables from the incoming request.
///
/// The authentication layer in front of the store forwards the logged-in
/// user as a session variable:
///
/// ```json
/// { "x-calchart-user-id": "user-42" }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// A session for the given user.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(USER_ID_KEY, user_id);
        session
    }

    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_KEY).filter(|id| !id.is_empty())
    }

    pub fn principal(&self) -> Option<Principal> {
        self.user_id().map(Principal::new)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}
