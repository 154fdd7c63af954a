//! One module per action. Each exports `ACTION`, a `guard` over the raw
//! input, and the `handle` function itself.

pub mod create_show;
pub mod delete_show;
pub mod get_show;
pub mod get_tab;
pub mod publish_show;
pub mod save_show;
