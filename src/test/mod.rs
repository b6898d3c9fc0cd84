//! Shared test support.

mod helpers;

pub(crate) use context::{CountingFactory, TestContext};
pub(crate) use helpers::*;
