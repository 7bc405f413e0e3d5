//! Test support

mod helpers;

pub(crate) use helpers::api_client;
