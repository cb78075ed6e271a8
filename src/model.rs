//! Input and output records of the sizing estimator.
//!
//! Units follow the usual conventions of the sizing worksheets: RAM in
//! **gigabytes (GB)**, storage in **terabytes (TB)**, money in a single
//! unnamed currency unit.

use std::fmt::{Display, Formatter, Result as FmtResult};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// CPU vendor of the target nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CpuVendor {
    Intel,
    Amd,
}

/// Spare nodes added on top of the computed node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum RedundancyLevel {
    #[serde(rename = "none")]
    #[value(name = "none")]
    None,
    #[serde(rename = "n+1")]
    #[value(name = "n+1")]
    NPlusOne,
    #[serde(rename = "n+2")]
    #[value(name = "n+2")]
    NPlusTwo,
}

/// Target license tier. Also selects the legacy edition it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    Starter,
    Pro,
    Ultimate,
}

/// Resource dimension that determined the node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitingFactor {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "RAM")]
    Ram,
    Storage,
}

impl LimitingFactor {
    pub fn as_str(self) -> &'static str {
        match self {
            LimitingFactor::Cpu => "CPU",
            LimitingFactor::Ram => "RAM",
            LimitingFactor::Storage => "Storage",
        }
    }
}

impl Display for LimitingFactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Display for RedundancyLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            RedundancyLevel::None => "none",
            RedundancyLevel::NPlusOne => "n+1",
            RedundancyLevel::NPlusTwo => "n+2",
        })
    }
}

impl Display for CpuVendor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            CpuVendor::Intel => "Intel",
            CpuVendor::Amd => "AMD",
        })
    }
}

/// Everything the estimator needs to know about one migration scenario.
///
/// The estimator applies no defaults and no validation: every field is
/// supplied by the caller. See [`crate::scenario::validate`] for the checks
/// a caller should run first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterInputs {
    // --- Source cluster ---
    /// Number of hosts in the existing cluster.
    pub source_hosts: u32,
    /// CPU sockets per source host.
    pub source_sockets: u32,
    /// Physical cores per source socket.
    pub source_cores_per_socket: u32,
    /// RAM per source host, in GB.
    pub source_ram: f64,
    /// Usable storage of the whole source cluster, in TB.
    pub source_usable_storage: f64,

    // --- Growth & services ---
    /// Projected growth in percent (0–50).
    pub growth_factor: f64,
    /// Assume a 1.5:1 data-reduction ratio on the target storage.
    pub storage_efficiency: bool,
    /// Add professional services for the migration itself.
    pub include_migration_services: bool,

    // --- Target node ---
    pub target_cpu_type: CpuVendor,
    /// Cores per socket of a target node; nodes are always dual-socket.
    pub target_cores_per_socket: u32,
    /// RAM per target node, in GB.
    pub target_ram: f64,
    /// Raw storage per target node, in TB.
    pub target_raw_storage: f64,

    // --- Policies ---
    /// Credit newer CPU generations with fewer cores for the same work.
    pub apply_modernization: bool,
    /// Reserve capacity on every node for the controller VM.
    pub apply_cvm_overhead: bool,
    pub redundancy_level: RedundancyLevel,
    pub target_license: LicenseTier,
    /// Whether the caller wants the financial section rendered.
    pub show_financials: bool,
}

/// Cost comparison between renewing the legacy licenses and moving to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    /// Legacy license renewal for the current billable cores.
    pub legacy_cost: f64,
    pub target_license_cost: f64,
    pub target_hardware_cost: f64,
    /// Zero unless migration services were requested.
    pub migration_services_cost: f64,
    /// License + hardware + migration services.
    pub total_target_tco: f64,
    /// `legacy_cost - total_target_tco`; negative when the target costs more.
    pub savings: f64,
    /// Savings relative to the legacy cost, in whole percent.
    ///
    /// Non-finite when the legacy cost is zero.
    pub savings_pct: f64,
}

/// Capacity plan and cost comparison produced by [`crate::compute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResults {
    // --- Source totals ---
    pub source_total_cores: u64,
    pub source_total_ram: f64,
    pub source_total_storage: f64,

    // --- Target totals ---
    /// Final node count, redundancy included.
    pub nodes_required: u32,
    pub target_total_cores: u64,
    pub target_total_ram: f64,
    /// Usable physical storage of the whole target cluster, in TB.
    pub target_total_storage: f64,

    // --- Metrics ---
    /// Source hosts per target node, e.g. `"1.1 : 1"`.
    pub consolidation_ratio: String,
    pub limiting_factor: LimitingFactor,
    /// CPU modernization multiplier that was applied (1.0 when disabled).
    pub efficiency_factor: f64,

    // --- Licensing ---
    pub legacy_edition: String,
    pub target_edition: String,

    pub financials: Financials,
}
