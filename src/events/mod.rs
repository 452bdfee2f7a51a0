//! # Events published through the bus.
//!
//! This module defines the [`Event`] capability (anything with a topic) and
//! the [`EventQueue`] collaborator used for deferred batch publication.

mod event;
mod queue;

pub use event::{Event, EventRef};
pub use queue::EventQueue;
