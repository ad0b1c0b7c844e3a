//! Session and orchestration layer for the SIMLIT workflow.
//!
//! Sits between a presentation layer and the backend: the [`gateway`] trait
//! is the REST boundary, [`client::WorkflowClient`] wraps every mutating
//! call in the validate/permit/call/refetch discipline, and [`session`]
//! owns the logged-in user plus the polled notification state. The
//! [`test_harness`] module ships an in-process reference backend used by
//! integration tests and the `simlit` binary.

pub mod client;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod session;
pub mod test_harness;

pub use client::WorkflowClient;
pub use error::{ClientError, GatewayError, SessionError};
pub use gateway::ResearchGateway;
pub use poller::NotificationPoller;
pub use session::{AuthToken, Session};
pub use test_harness::InMemoryResearch;
