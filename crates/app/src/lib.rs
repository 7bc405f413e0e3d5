//! Vetshop console services: backend API access and the billing flows built on the core crate.

pub mod api;
pub mod billing;
pub mod config;
pub mod console;
pub mod context;
pub mod domain;
pub mod observability;

#[cfg(test)]
mod test;
