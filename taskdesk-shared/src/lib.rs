//! # Taskdesk Shared Library
//!
//! This crate contains the domain types and business logic behind the
//! Taskdesk API server.
//!
//! ## Module Organization
//!
//! - `models`: User and task records with their SQL
//! - `auth`: Password hashing, JWT issuance and bearer token verification
//! - `db`: Connection pool and migrations
//! - `store`: Storage interfaces with PostgreSQL and in-memory backends
//! - `services`: Auth Service and ownership-scoped Task Service

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskdesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
