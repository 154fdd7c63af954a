//! Action: delete_show

use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::IdentityProvider;
use crate::actions::{ActionError, Context};
use crate::backend::ShowBackend;

pub const ACTION: &str = "delete_show";

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
    ctx.store().delete(&input.slug, &principal)?;
    Ok(json!({ "slug": input.slug, "deleted": true }))
}
