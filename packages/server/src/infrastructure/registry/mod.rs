//! ConnectionRegistry の実装
//!
//! - `inmemory`: HashMap + 単一の排他ロックによる実装

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
