//! Actor System for Live Rebuilds
//!
//! Message-passing concurrency for watch and serve mode:
//!
//! ```text
//! FsActor --> BuilderActor --> ServerState
//! (watch)      (convert)       (snapshot + waiters)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - Document watcher with debouncing and fingerprinting
//! - `builder` - Serialized, coalescing rebuilds
//! - `coordinator` - Wires up and runs actors

pub mod builder;
pub mod coordinator;
pub mod fs;
pub mod messages;

pub use builder::Builder;
pub use coordinator::Coordinator;
