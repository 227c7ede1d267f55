//! Quiz-maze game core library crate.

pub mod ai;
pub mod assets;
pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod events;
pub mod field;
pub mod ghost;
pub mod map;
pub mod motion;
pub mod placement;
pub mod player;
pub mod quiz;
pub mod session;
pub mod stats;
