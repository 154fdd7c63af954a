//! Action: get_show

use serde::Deserialize;
use serde_json::Value;

use crate::access::IdentityProvider;
use crate::actions::{ActionError, Context};
use crate::backend::ShowBackend;

pub const ACTION: &str = "get_show";

#[derive(Deserialize)]
pub struct Input {
    pub slug: String,
}

pub fn guard<B, I>(ctx: &Context<B, I>) -> bool {
    ctx.has_fields(&["slug"])
}

pub fn handle<B: ShowBackend, I: IdentityProvider>(ctx: &Context<B, I>) -> Result<Value, ActionError> {
    let input = ctx.input::<Input>()?;
    let principal = ctx.principal()?;
    let view = ctx.store().view_show(&input.slug, &principal)?;
    Ok(view.to_json())
}
