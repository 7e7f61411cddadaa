//! Storefront domain rules with no I/O: shared types, the domain error,
//! catalog field rules, search matching, price conversion, and account
//! normalisation. Used by both the storage and HTTP layers so the Postgres
//! and in-memory stores agree on semantics.

pub mod account;
pub mod catalog;
pub mod error;
pub mod pricing;
pub mod search;
pub mod types;
