//! RF math on a single resolved point.
//!
//! ```text
//!   Γ (ComplexSample.coefficient)
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ immittance  │  Z, Y, parallel equivalent, L / C
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │  metrics    │  VSWR, return loss, Q, phase, group delay
//!   └─────────────┘
//! ```

pub mod immittance;
pub mod metrics;
