//! Integration tests over the full router with in-memory stores.

mod helpers;

mod activity_test;
mod notification_test;
