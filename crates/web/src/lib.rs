//! Userdesk web application library.
//!
//! Server-rendered CRUD over a single `users` table. The binary in
//! `main.rs` only wires configuration, logging and [`server::run`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

#[cfg(test)]
mod test_support;
