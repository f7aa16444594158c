//! Cluster node inventory

pub mod ports;
