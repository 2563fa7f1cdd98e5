//! Input state mapped from window events to plain data.
//!
//! # Invariants
//! - Nothing here depends on the windowing library; the host maps its own
//!   key codes and events onto [`Key`] and [`Action`].

pub mod action;
pub mod cursor;
pub mod keys;

pub use action::Action;
pub use cursor::VirtualCursor;
pub use keys::{Key, MoveKeys};

pub fn crate_info() -> &'static str {
    "voxel-input v0.1.0"
}
