//! HTTP request handlers

pub mod common;
pub mod health;
pub mod location;
pub mod notifications;
pub mod push;
pub mod worker;
