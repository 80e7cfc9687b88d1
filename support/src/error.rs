// Shared error plumbing.
//
// Integration-seam code (constructors, the run loop) propagates failures
// with `anyhow`, the same way `utils::{anyhow, Context, Error, Result}` is
// re-exported and used throughout the teacher crates. Subsystem-local fatal
// error enums (`view::ViewTreeError`, `gpu::GpuError`) are `thiserror`-backed
// and convert into this `Error` at the seam via `?`.
pub use anyhow::{anyhow, Context, Error, Result};
