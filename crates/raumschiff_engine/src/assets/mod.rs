//! Asset loading
//!
//! Startup-time readers for the model and the lore text. Nothing here touches
//! the graphics device.

pub mod obj_loader;
pub mod lore;

pub use obj_loader::{ImportError, ObjLoader};
