//! Study events.
//!
//! The scheduler announces progress changes on an [`EventBus`]. Presentation
//! layers that cache a learner's study queue drop it on
//! [`StudyEvent::QueueInvalidated`].

mod bus;
mod event;

pub use bus::{EventBus, EventSubscriber};
pub use event::StudyEvent;
