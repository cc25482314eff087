//! tinyurl - a small URL shortener service
//!
//! Maps long URLs to random short codes, redirects visitors with a `302`,
//! counts clicks and periodically deletes links nobody ever used.
//!
//! # Architecture
//! - `storage`: `UrlStore` trait and the SeaORM backend (SQLite, MySQL, PostgreSQL)
//! - `services`: code generation, allocation, redirect, admin, retention, health
//! - `api`: actix-web routes and JSON types
//! - `config`: TOML + environment configuration
//! - `runtime`: startup wiring, server and sweep modes
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
