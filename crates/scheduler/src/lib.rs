//! Generates every conflict-free combination of course sections, one per
//! course, subject to day/time rules and protected buffer blocks.

pub mod catalog;
pub mod format;
pub mod generator;
pub mod server;
pub mod types;
