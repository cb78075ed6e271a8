//! Model constants, policy lookups and the price book.
//!
//! Everything the estimator multiplies by lives here, so the financial model
//! can be audited (and overridden, for prices) in one place.

use serde::{Deserialize, Serialize};

use crate::model::{CpuVendor, LicenseTier, RedundancyLevel};

/// RAM reserved per node for the controller VM, in GB.
pub const CVM_RAM_GB: f64 = 32.0;
/// Cores reserved per node for the controller VM.
pub const CVM_CORES: u32 = 4;

/// Target nodes are always dual-socket.
pub const TARGET_SOCKETS_PER_NODE: u32 = 2;

/// Share of raw node storage left after on-disk format and replication.
pub const USABLE_STORAGE_FACTOR: f64 = 0.55;

/// Data-reduction ratio assumed when storage efficiency is enabled.
pub const STORAGE_EFFICIENCY_RATIO: f64 = 1.5;

pub const AMD_MODERNIZATION_GAIN: f64 = 1.4;
pub const INTEL_MODERNIZATION_GAIN: f64 = 1.25;

/// Smallest cluster the target platform supports.
pub const MIN_CLUSTER_NODES: u32 = 3;

/// Legacy licensing bills at least this many cores per socket.
pub const LEGACY_MIN_CORES_PER_SOCKET: u32 = 16;

/// Assumed VM density used to estimate migration services.
pub const EST_VMS_PER_HOST: u32 = 15;

/// Multiplier applied to compute demand when modernization is credited.
pub fn cpu_efficiency(apply_modernization: bool, vendor: CpuVendor) -> f64 {
    if !apply_modernization {
        return 1.0;
    }
    match vendor {
        CpuVendor::Amd => AMD_MODERNIZATION_GAIN,
        CpuVendor::Intel => INTEL_MODERNIZATION_GAIN,
    }
}

/// Divisor applied to storage demand.
pub fn storage_efficiency_ratio(enabled: bool) -> f64 {
    if enabled {
        STORAGE_EFFICIENCY_RATIO
    } else {
        1.0
    }
}

/// Per-node `(cores, ram_gb)` reserved for the controller VM.
pub fn cvm_reservation(enabled: bool) -> (u32, f64) {
    if enabled {
        (CVM_CORES, CVM_RAM_GB)
    } else {
        (0, 0.0)
    }
}

/// Spare nodes added for the redundancy policy.
pub fn extra_nodes(level: RedundancyLevel) -> u32 {
    match level {
        RedundancyLevel::None => 0,
        RedundancyLevel::NPlusOne => 1,
        RedundancyLevel::NPlusTwo => 2,
    }
}

/// Legacy edition the target tier is compared against.
pub fn legacy_edition(tier: LicenseTier) -> &'static str {
    match tier {
        LicenseTier::Starter => "VVF (Standard)",
        LicenseTier::Pro => "VVF + vSAN (Advanced)",
        LicenseTier::Ultimate => "VCF (Enterprise)",
    }
}

pub fn target_edition(tier: LicenseTier) -> &'static str {
    match tier {
        LicenseTier::Starter => "NCI Starter",
        LicenseTier::Pro => "NCI Pro",
        LicenseTier::Ultimate => "NCI Ultimate",
    }
}

/// Static rates used by the financial model.
///
/// Any rate missing from a deserialized price book falls back to the
/// built-in list price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBook {
    /// Legacy rate per billable core for starter/pro comparisons.
    pub legacy_base_per_core: f64,
    /// Legacy rate per billable core for ultimate comparisons.
    pub legacy_premium_per_core: f64,
    pub target_starter_per_core: f64,
    pub target_pro_per_core: f64,
    pub target_ultimate_per_core: f64,
    pub migration_per_vm: f64,
    pub hw_chassis_base: f64,
    pub hw_per_gb_ram: f64,
    pub hw_per_tb_storage: f64,
    pub hw_per_core: f64,
}

impl Default for PriceBook {
    fn default() -> Self {
        Self {
            legacy_base_per_core: 450.0,
            legacy_premium_per_core: 950.0,
            target_starter_per_core: 280.0,
            target_pro_per_core: 500.0,
            target_ultimate_per_core: 850.0,
            migration_per_vm: 150.0,
            hw_chassis_base: 6000.0,
            hw_per_gb_ram: 8.0,
            hw_per_tb_storage: 150.0,
            hw_per_core: 75.0,
        }
    }
}

impl PriceBook {
    /// Only the ultimate tier is compared against the premium legacy bundle.
    pub fn legacy_rate(&self, tier: LicenseTier) -> f64 {
        match tier {
            LicenseTier::Ultimate => self.legacy_premium_per_core,
            LicenseTier::Starter | LicenseTier::Pro => self.legacy_base_per_core,
        }
    }

    pub fn target_rate(&self, tier: LicenseTier) -> f64 {
        match tier {
            LicenseTier::Starter => self.target_starter_per_core,
            LicenseTier::Pro => self.target_pro_per_core,
            LicenseTier::Ultimate => self.target_ultimate_per_core,
        }
    }

    /// Hardware price of one node, priced on raw (not usable) storage.
    pub fn node_hardware_cost(
        &self,
        cores_per_socket: u32,
        ram_gb: f64,
        raw_storage_tb: f64,
    ) -> f64 {
        let cores = f64::from(cores_per_socket) * f64::from(TARGET_SOCKETS_PER_NODE);
        self.hw_chassis_base
            + ram_gb * self.hw_per_gb_ram
            + raw_storage_tb * self.hw_per_tb_storage
            + cores * self.hw_per_core
    }

    pub fn migration_services(&self, source_hosts: u32) -> f64 {
        f64::from(source_hosts) * f64::from(EST_VMS_PER_HOST) * self.migration_per_vm
    }
}
