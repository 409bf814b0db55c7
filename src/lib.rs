//! Tasknest - a small server-rendered todo manager
//!
//! This library provides the core functionality behind the `tasknest`
//! server and the `tasknest-seed` tool: storage, authentication, per-user
//! todos, HTML views and the Plinko board configuration.

pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod plinko;
pub mod services;
pub mod session;
pub mod views;
pub mod web;
