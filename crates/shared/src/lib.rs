//! Domain types and wire protocol shared between the event client core and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
