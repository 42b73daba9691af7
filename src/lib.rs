//! LinguaNote client - a library and CLI for a personal English-learning
//! notebook backend.
//!
//! The interesting part lives in [`auth`]: a self-healing token store, the
//! request pipeline that attaches credentials and reacts to 401s, and the
//! session bootstrap that restores a login across process starts. [`api`]
//! wraps the notebook's REST endpoints; [`models`] holds the wire types.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;
