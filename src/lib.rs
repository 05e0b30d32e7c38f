//! Behavior and animation core of an aquarium simulation.
//!
//! Fish, enemies, coins and pellets live in a [`registry::Registry`]; every
//! tick the [`sim::Simulation`] driver updates each of them (goal choice,
//! movement, hunger) and then draws its current sprite frame onto a
//! [`surface::Surface`], advancing its animation clock.

pub mod animation;
pub mod assets;
pub mod audio;
pub mod config;
pub mod entity;
pub mod error;
pub mod registry;
pub mod sim;
pub mod species;
pub mod surface;
