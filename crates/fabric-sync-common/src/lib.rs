//! Common synchronization infrastructure.
//!
//! This crate provides the domain-agnostic building blocks shared by the
//! fabric synchronization daemons:
//!
//! - [`SyncError`]: error taxonomy for reconciliation operations
//! - [`Synchronizer`]: generic interval-driven task engine (once,
//!   periodic, or disabled)
//! - [`SyncReport`]: per-entity outcome recording for full resync passes
//!
//! # Architecture
//!
//! Reconciliation runs on two paths that share these primitives:
//!
//! 1. Incremental events are handled synchronously as the orchestration
//!    framework delivers them
//! 2. A full resync pass, driven by the [`Synchronizer`], replays every
//!    known entity's create side effect to catch the fabric up after
//!    missed events, restarts, or drift
//!
//! Both paths rely on idempotent fabric operations; the resync path adds
//! per-entity failure isolation recorded in a [`SyncReport`].

mod engine;
mod error;
mod report;

pub use engine::{SyncHandle, SyncMode, Synchronizer};
pub use error::{SyncError, SyncResult};
pub use report::{EntityKind, SyncOutcome, SyncReport};
