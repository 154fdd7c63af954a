//! Action: get_tab

use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::IdentityProvider;
use crate::actions::{ActionError, Context};
use crate::backend::ShowBackend;
use crate::store::Tab;

pub const ACTION: &str = "get_tab";

#[derive(Deserialize)]
pub struct Input {
    pub tab: String,
    /// Defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
}

pub fn guard<B, I>(ctx: &Context<B, I>) -> bool {
    ctx.has_fields(&["tab"])
}

pub fn handle<B: ShowBackend, I: IdentityProvider>(ctx: &Context<B, I>) -> Result<Value, ActionError> {
    let input = ctx.input::<Input>()?;
    let principal = ctx.principal()?;
    let tab: Tab = input.tab.parse()?;
    let year = input.year.unwrap_or_else(|| Utc::now().year());

    let shows = ctx.store().list_tab(&principal, tab, year)?;
    Ok(json!({ "shows": shows }))
}
