//! Named actions - the request surface of the show store.
//!
//! Each action name maps to exactly one handler in [`handlers`]. The
//! service parses the name, runs the handler's guard over the raw input,
//! then runs the handler with a [`Context`] holding the input, the session
//! and the store.
//!
//! ## Example
//!
//! ```ignore
//! use calchart_store::actions::{ActionService, Session};
//! use serde_json::json;
//!
//! let service = ActionService::new(store);
//! let created = service.dispatch(
//!     "create_show",
//!     json!({ "name": "Spring Show", "isBand": false }),
//!     Session::for_user("user-42"),
//! )?;
//! assert_eq!(created["slug"], "spring-show");
//! ```

mod context;
mod error;
pub mod handlers;
mod service;
mod session;

pub use context::Context;
pub use error::ActionError;
pub use service::{Action, ActionRequest, ActionResponse, ActionService};
pub use session::{Session, USER_ID_KEY};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};
