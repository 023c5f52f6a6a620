//! Cross-view change propagation.
//!
//! # Responsibility
//! - Decouple the task store from the views rendering it (month grid,
//!   flat list) via a publish/subscribe bus.
//!
//! # Invariants
//! - Listeners are invoked synchronously, in subscription order, on the
//!   same logical turn as the triggering mutation.
//! - A failing listener never prevents later listeners from running.

pub mod change_bus;
