//! Stateful interaction logic, kept free of any transport concern.
//! Operations return the events they emit; publication belongs to the caller.

pub mod gate;
pub mod interaction;
pub mod recognizer;
pub mod registry;
pub mod timedial;
