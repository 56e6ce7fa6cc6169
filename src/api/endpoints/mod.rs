//! API endpoint handlers.

pub mod health;
pub mod internal;
pub mod submissions;
