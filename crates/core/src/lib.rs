//! Medstore
//!
//! Client-side domain of the medical store: the catalog model, the shopping
//! cart, and the multi-row order builder used at the counter.

pub mod builder;
pub mod cart;
pub mod drafts;
pub mod medicines;
pub mod orders;
pub mod pricing;
