//! Domain events emitted by classification lifecycle operations.

pub mod event;

pub use event::Event;
