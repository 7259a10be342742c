//! Villa Showcase Library
//!
//! This library provides the core of the Villa Showcase application: the
//! drag-driven slide carousel and booking date-range engines, the gallery
//! admin services with their record and media stores, and the terminal
//! preview and web API built on top of them.

// Module declarations
pub mod calendar;
pub mod carousel;
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod store;
pub mod tui;
#[cfg(feature = "web")]
pub mod web;
