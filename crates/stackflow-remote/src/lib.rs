//! Remote command execution transport for StackFlow
//!
//! Runs shell commands and uploads files on provisioned nodes over SSH.
//! The transport sits behind the [`RemoteExecutor`] trait so stage logic
//! never talks to `ssh`/`scp` directly; a future implementation may
//! parallelize per-node work behind the same contract.

pub mod error;
pub mod executor;
pub mod ssh;

pub use error::{RemoteError, Result};
pub use executor::RemoteExecutor;
pub use ssh::SshExecutor;
