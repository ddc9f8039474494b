//! Core library exports for the bookstore service.
//!
//! With only the `data` feature the crate exposes the domain, models,
//! schema and repositories. The default `server` feature adds forms,
//! services, routes and the session, mail and payment integrations used by
//! the web application.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod mail;
#[cfg(feature = "server")]
pub mod otp;
#[cfg(feature = "server")]
pub mod payments;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Prefix every HTTP route is mounted under.
pub const API_PREFIX: &str = "/api/bookstore";
