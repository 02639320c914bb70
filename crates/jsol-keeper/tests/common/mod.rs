//! Shared test helpers for keeper tests.

#![allow(dead_code)]

pub mod fakes;
pub mod setup;

pub use fakes::*;
pub use setup::*;
