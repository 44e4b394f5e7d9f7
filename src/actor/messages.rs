//! Actor Message Definitions
//!
//! ```text
//! FsActor --Rebuild--> BuilderActor --publish--> ServerState
//! ```

/// Messages to Builder Actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMsg {
    /// The source content changed; a rebuild is owed.
    Rebuild,
    /// Stop after the in-flight build, if any.
    Shutdown,
}
