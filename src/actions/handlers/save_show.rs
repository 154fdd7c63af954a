//! Action: save_show
//!
//! The input is the whole show document; `slug` addresses the show being
//! saved and `name` is required.

use serde_json::{json, Value};

use crate::access::IdentityProvider;
use crate::actions::{ActionError, Context};
use crate::backend::ShowBackend;
use crate::show::{NAME_KEY, SLUG_KEY};

pub const ACTION: &str = "save_show";

pub fn guard<B, I>(ctx: &Context<B, I>) -> bool {
    ctx.raw_input().is_object() && ctx.has_fields(&[SLUG_KEY, NAME_KEY])
}

pub fn handle<B: ShowBackend, I: IdentityProvider>(ctx: &Context<B, I>) -> Result<Value, ActionError> {
    let principal = ctx.principal()?;
    let payload = match ctx.raw_input() {
        Value::Object(map) => map.clone(),
        _ => return Err(ActionError::DecodeFailed("show data must be an object".into())),
    };
    let slug = payload
        .get(SLUG_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| ActionError::DecodeFailed("`slug` must be a string".into()))?
        .to_string();

    let record = ctx.store().save_document(&slug, &principal, payload)?;
    Ok(json!({ "slug": record.slug }))
}
