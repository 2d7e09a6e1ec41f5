//! Request lifecycle for one inquiry.

pub mod controller;

pub use controller::{FormDefaults, TurnController, TurnSettings};
