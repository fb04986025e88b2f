// src/services/mod.rs
//! Business logic and API: code allocation, the signature engine,
//! certificate lifecycle, validation, and the HTTP surface.

pub mod allocator;
pub mod api_server;
pub mod issuer;
pub mod signature;
pub mod validator;
