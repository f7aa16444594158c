//! Storage pools and volumes

pub mod ports;
