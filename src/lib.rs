//! imgconv - PNG/JPEG image converter
//!
//! Converts uploads between PNG and JPEG, flattening transparency onto white
//! where the target cannot store alpha. This library exposes modules for the
//! binary and for integration testing.

pub mod api;
pub mod codec;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
