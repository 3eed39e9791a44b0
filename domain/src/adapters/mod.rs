//! Adapters that plug into the store's ports.
//!
//! `clock` provides the wall clock and a manual clock for tests and demos;
//! `shared` wraps a store in a lock so it can be handed to concurrent callers.

pub mod clock;
pub mod shared;
