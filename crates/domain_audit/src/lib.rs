//! Audit/Compliance Reporter
//!
//! Every statutory figure the VAT and CIT engines produce is backed by an
//! ordered, append-only [`AuditTrail`]: one entry per computation step, each
//! with the formula applied and the provision it applies. Before a trail is
//! persisted it is verified: steps must be strictly increasing and the last
//! entry's result must equal the headline figure it explains.
//!
//! Persistence goes through the [`AuditSink`] port. A failing sink never
//! invalidates a calculation; [`record_trail`] logs the failure and moves on.

pub mod regulation;
pub mod trail;
pub mod sink;
pub mod error;

pub use trail::{verify, AuditTrail, AuditTrailEntry};
pub use sink::{record_trail, AuditRecord, AuditSink, CalculationKind};
#[cfg(any(test, feature = "mock"))]
pub use sink::mock::MockAuditSink;
pub use error::AuditError;
