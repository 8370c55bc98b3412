//! Background job implementations.

pub mod retention;
