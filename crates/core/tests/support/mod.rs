//! Shared test helpers for `pvekit-core` integration tests.

pub mod qemu;
