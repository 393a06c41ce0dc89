//! Storage implementations.
//!
//! `MemoryStore` is the in-process backend; a durable backend slots in by
//! implementing [`crate::traits::store::DocumentStore`] over the same keys.

pub mod memory;

pub use memory::MemoryStore;
