//! ActionService - routes named actions to their handlers.
//!
//! The set of actions is closed: names are parsed into [`Action`] before
//! anything runs, so an unknown name fails with
//! [`ActionError::UnknownAction`] instead of reaching a handler.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::Context;
use super::error::ActionError;
use super::handlers::{create_show, delete_show, get_show, get_tab, publish_show, save_show};
use super::session::Session;
use crate::access::IdentityProvider;
use crate::backend::ShowBackend;
use crate::store::ShowDocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetShow,
    GetTab,
    CreateShow,
    SaveShow,
    PublishShow,
    DeleteShow,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::GetShow,
        Action::GetTab,
        Action::CreateShow,
        Action::SaveShow,
        Action::PublishShow,
        Action::DeleteShow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::GetShow => get_show::ACTION,
            Action::GetTab => get_tab::ACTION,
            Action::CreateShow => create_show::ACTION,
            Action::SaveShow => save_show::ACTION,
            Action::PublishShow => publish_show::ACTION,
            Action::DeleteShow => delete_show::ACTION,
        }
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .ok_or_else(|| ActionError::UnknownAction(name.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serves the fixed action set over a [`ShowDocumentStore`].
pub struct ActionService<B, I> {
    store: ShowDocumentStore<B, I>,
}

impl<B: ShowBackend, I: IdentityProvider> ActionService<B, I> {
    pub fn new(store: ShowDocumentStore<B, I>) -> Self {
        Self { store }
    }

    /// Dispatch an action by name.
    pub fn dispatch(&self, action: &str, data: Value, session: Session) -> Result<Value, ActionError> {
        let action: Action = action.parse()?;
        self.dispatch_action(action, data, session)
    }

    /// Run the guard, then the handler, for an already-parsed action.
    pub fn dispatch_action(
        &self,
        action: Action,
        data: Value,
        session: Session,
    ) -> Result<Value, ActionError> {
        let ctx = Context::new(action.name(), data, session, &self.store);

        let result = match action {
            Action::GetShow => run(&ctx, get_show::guard, get_show::handle),
            Action::GetTab => run(&ctx, get_tab::guard, get_tab::handle),
            Action::CreateShow => run(&ctx, create_show::guard, create_show::handle),
            Action::SaveShow => run(&ctx, save_show::guard, save_show::handle),
            Action::PublishShow => run(&ctx, publish_show::guard, publish_show::handle),
            Action::DeleteShow => run(&ctx, delete_show::guard, delete_show::handle),
        };
        if let Err(e) = &result {
            tracing::debug!(action = action.name(), error = %e, "action failed");
        }
        result
    }

    /// Dispatch an [`ActionRequest`], returning an [`ActionResponse`].
    pub fn dispatch_request(&self, request: &ActionRequest) -> ActionResponse {
        let session = Session::from_map(request.session_variables.clone());
        match self.dispatch(&request.action, request.data.clone(), session) {
            Ok(body) => ActionResponse { status: 200, body },
            Err(e) => ActionResponse::from_error(&e),
        }
    }

    pub fn actions(&self) -> Vec<&'static str> {
        Action::ALL.iter().map(|a| a.name()).collect()
    }

    pub fn store(&self) -> &ShowDocumentStore<B, I> {
        &self.store
    }
}

type Guard<B, I> = for<'a, 'b> fn(&'a Context<'b, B, I>) -> bool;
type Handler<B, I> = for<'a, 'b> fn(&'a Context<'b, B, I>) -> Result<Value, ActionError>;

fn run<B, I>(ctx: &Context<'_, B, I>, guard: Guard<B, I>, handle: Handler<B, I>) -> Result<Value, ActionError> {
    if !guard(ctx) {
        return Err(ActionError::GuardRejected(ctx.action().to_string()));
    }
    handle(ctx)
}

/// An inbound action request.
///
/// ```json
/// {
///   "action": "publish_show",
///   "data": { "slug": "spring-show", "publish": true },
///   "session_variables": { "x-calchart-user-id": "user-42" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub session_variables: HashMap<String, String>,
}

/// Response from dispatching an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Handler result, or `{ "message": ... }` on error.
    pub body: Value,
}

impl ActionResponse {
    pub fn from_error(err: &ActionError) -> Self {
        Self {
            status: err.status_code(),
            body: serde_json::json!({ "message": err.to_string() }),
        }
    }
}
