//! Test helpers para hrcache-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod stores;

pub use client::{TestClient, TestResponse, client, client_with_state};
pub use stores::{FailingStore, memory_state, seed};
