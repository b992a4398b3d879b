//! **gridway-core** — Core types for grid pathfinding.
//!
//! This crate provides the leaf building blocks shared across the *gridway*
//! workspace: the [`Cell`] coordinate type, the boolean-occupancy [`Grid`]
//! with bounds-checked queries and deterministic neighbor enumeration, and
//! grid distance functions.

pub mod cell;
pub mod distance;
pub mod grid;

pub use cell::Cell;
pub use distance::manhattan;
pub use grid::Grid;
