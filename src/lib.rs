//! Vendor management server library.
//!
//! Provides the core functionality for the vendor management server:
//! vendor and purchase-order CRUD, vendor performance metrics, token
//! authentication, and database access.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
