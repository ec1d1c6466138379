//! Shared setup for the vane binaries

pub mod common;
