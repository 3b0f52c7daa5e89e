//! Git integration layer
//!
//! The versioning engine is treated as a black box: every question this hook
//! asks of git (revision ranges, commit metadata, changed paths, tree
//! exports) goes through text-based subcommands via [`crate::exec`]. There
//! is no object-store access and no diffing here, only parsing of output
//! formats git documents as stable.

pub mod commit;
pub mod push;

pub use commit::Commit;
pub use push::{PushEvent, Ref};
