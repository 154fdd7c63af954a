//! Action: create_show

use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::IdentityProvider;
use crate::actions::{ActionError, Context};
use crate::backend::ShowBackend;

pub const ACTION: &str = "create_show";

#[derive(Deserialize)]
pub struct Input {
    pub name: String,
    #[serde(rename = "isBand")]
    pub is_band: bool,
}

pub fn guard<B, I>(ctx: &Context<B, I>) -> bool {
    ctx.has_fields(&["name", "isBand"])
}

pub fn handle<B: ShowBackend, I: IdentityProvider>(ctx: &Context<B, I>) -> Result<Value, ActionError> {
    let input = ctx.input::<Input>()?;
    let principal = ctx.principal()?;
    let record = ctx.store().create(&input.name, &principal, input.is_band)?;
    Ok(json!({ "slug": record.slug, "isBand": record.is_band }))
}
