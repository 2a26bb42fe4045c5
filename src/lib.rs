//! DynDNS2-compatible update endpoint backed by the Vercel DNS API.

pub mod config;
pub mod dns;
pub mod server;
pub mod update;
