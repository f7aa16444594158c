//! Virtual machine lifecycle and configuration

pub mod ports;
mod service;

pub use service::QemuService;
