//! Freight train consist modeling: an ordered sequence of cars with a movable
//! cursor, continuously maintained totals, and an interactive shell on top.

pub mod consist;
pub mod error;
pub mod roster;
pub mod shell;
