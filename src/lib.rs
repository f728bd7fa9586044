//! snulog - A small team status log
//!
//! This library provides session-based authentication, the status log store
//! and the web front end for the snulog server.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
