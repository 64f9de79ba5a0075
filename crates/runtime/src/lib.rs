//! Runtime orchestration for the arena simulation.
//!
//! This crate wires loaded content, the simulation worker, and the event bus
//! into a cohesive runtime API. Consumers embed [`Runtime`] to drive the
//! fixed-rate tick, subscribe to events, and forward client commands through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] adapts loaded content into engine environments
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, SimulationEvent, SnapshotEvent, Topic};
pub use oracle::OracleManager;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
