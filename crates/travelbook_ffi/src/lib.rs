//! FFI bridge crate exposing the TravelBook core to the Flutter shell.

pub mod api;
