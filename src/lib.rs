//! StarBot - website chat assistant for a single organization
//!
//! This crate answers visitor questions grounded in a description of the
//! organization, through quick-reply buttons and a hosted text-generation
//! endpoint.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
