//! Show store integration tests.

mod support;
mod actions;
mod concurrency;
mod migration;

#[cfg(feature = "http")]
mod http;
