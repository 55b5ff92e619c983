//! Data layer: sweep types, loading, and marker resolution.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → SweepSnapshot
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ SweepSnapshot │  Arc<[ComplexSample]> for S11 and S21
//!   └───────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ resolver │  marker frequency → nearest sample index
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod resolver;
