//! Aggregation layer for the campaign report.
//!
//! `queries` holds the parameterized read-only aggregations over the
//! denormalized dataset; `report` binds them to the fixed question battery,
//! times each one, and renders the combined multi-line report.

pub mod queries;
pub mod report;
