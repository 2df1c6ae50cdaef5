//! Saved movies, user directory and search telemetry for a movie-browsing app.
//!
//! Remote state lives in a hosted document store ([`db`]); movie details come
//! from TMDB ([`services::providers`]); the logged-in user is remembered in a
//! local key-value file ([`session`]). [`api`] exposes everything over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
