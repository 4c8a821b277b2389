//! Car catalogue domain, persistence and supporting services.

pub mod assets;
pub mod cache;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod images;
pub mod observability;

#[cfg(test)]
mod test;
