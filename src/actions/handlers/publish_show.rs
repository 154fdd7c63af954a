//! Action: publish_show

use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::IdentityProvider;
use crate::actions::{ActionError, Context};
use crate::backend::ShowBackend;

pub const ACTION: &str = "publish_show";

#[derive(Deserialize)]
pub struct Input {
    pub slug: String,
    pub publish: bool,
}

pub fn guard<B, I>(ctx: &Context<B, I>) -> bool {
    ctx.has_fields(&["slug", "publish"])
}

pub fn handle<B: ShowBackend, I: IdentityProvider>(ctx: &Context<B, I>) -> Result<Value, ActionError> {
    let input = ctx.input::<Input>()?;
    let principal = ctx.principal()?;
    let record = ctx
        .store()
        .set_published(&input.slug, &principal, input.publish)?;
    Ok(json!({ "slug": record.slug, "published": record.published }))
}
