//! Tiled map rendering with click-to-walk pathfinding.
//!
//! The map's base layer becomes a walkability grid; clicking sends the actor
//! along the shortest route to the coin pile. [`demo::DemoState`] holds the
//! whole simulation and runs without a window, [`engine::EngineBuilder`]
//! hosts it in one.

pub mod actor;
pub mod assets;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod pathfinding;
pub mod renderer;
pub mod tilemap;
pub mod walkgrid;
pub mod window;

pub use error::{HostError, LoadFailure};
