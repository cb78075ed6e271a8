#![doc = include_str!("../README.md")]

pub mod estimator;
pub mod model;
pub mod pricing;
pub mod report;
pub mod scenario;

pub use estimator::{NodeCounts, compute, compute_with_prices, node_counts};
pub use model::{
    ClusterInputs, CpuVendor, Financials, LicenseTier, LimitingFactor, RedundancyLevel,
    SizingResults,
};
pub use pricing::PriceBook;
pub use report::Report;
pub use scenario::{Scenario, ScenarioError, validate};
