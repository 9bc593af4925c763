//! Survival shooter: hold out against converging zombies and bosses until
//! the clock runs out.
//!
//! The library is the simulation core.  Drawing, input, image loading and
//! sound reach it only through the traits in [`platform`].

pub mod camera;
pub mod compute;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod movement;
pub mod platform;
pub mod projectile;
pub mod spawner;
