//! Termpaint library crate.
//!
//! This exposes the internal modules for testing and library usage.

pub mod backend;
pub mod buffer;
pub mod cli;
pub mod color;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod grid;
pub mod keys;
pub mod os;
pub mod render;
