//! snapsight library crate.
//!
//! Pick or capture a photo, send it to a hosted vision-language model and get
//! back a text description.

pub mod acquire;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod session;
