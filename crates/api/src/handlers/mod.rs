pub mod admin;
pub mod auth;
pub mod beat;
pub mod checkout;
pub mod webhook;
