//! Client services for the medical store.

pub mod api;
pub mod checkout;
pub mod config;
pub mod observability;
pub mod search;
pub mod services;
pub mod session;
