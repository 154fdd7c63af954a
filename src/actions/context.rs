//! Context passed to action handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ActionError;
use super::session::Session;
use crate::access::Principal;
use crate::store::ShowDocumentStore;

/// Everything a handler needs: the action's input data, the session, and
/// the store.
pub struct Context<'a, B, I> {
    action: &'static str,
    data: Value,
    session: Session,
    store: &'a ShowDocumentStore<B, I>,
}

impl<'a, B, I> Context<'a, B, I> {
    pub(crate) fn new(
        action: &'static str,
        data: Value,
        session: Session,
        store: &'a ShowDocumentStore<B, I>,
    ) -> Self {
        Self {
            action,
            data,
            session,
            store,
        }
    }

    /// Deserialize the input data into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, ActionError> {
        serde_json::from_value(self.data.clone()).map_err(|e| ActionError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.data
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The acting user. Every action requires one.
    pub fn principal(&self) -> Result<Principal, ActionError> {
        self.session.principal().ok_or(ActionError::Unauthenticated)
    }

    pub fn store(&self) -> &ShowDocumentStore<B, I> {
        self.store
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.data.get(field).is_some()
    }

    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
