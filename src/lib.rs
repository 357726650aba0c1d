//! Hierarchical save/restore for a small alchemy game world
//!
//! The scene is a tree of game objects. Objects marked saveable get a
//! stable id, and their components flatten their state into string pairs.
//! The `save` module walks the tree, writes it to a JSON slot file, and
//! later applies a slot back onto a live scene by matching ids.

pub mod components;
pub mod config;
pub mod events;
pub mod inventory;
pub mod item;
pub mod save;
pub mod scene;

pub use config::SaveConfig;
