use crate::model::{ClusterInputs, Financials, LimitingFactor, SizingResults};
use crate::pricing::{self, PriceBook};

/// Nodes required by each resource dimension on its own, before the
/// minimum cluster size and redundancy are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounts {
    pub cpu: u32,
    pub ram: u32,
    pub storage: u32,
}

impl NodeCounts {
    /// Largest of the three counts.
    pub fn max(&self) -> u32 {
        self.cpu.max(self.ram).max(self.storage)
    }

    /// Dimension holding the largest count. Ties go to CPU, then RAM.
    pub fn limiting_factor(&self) -> LimitingFactor {
        if self.cpu >= self.ram && self.cpu >= self.storage {
            LimitingFactor::Cpu
        } else if self.ram >= self.storage {
            LimitingFactor::Ram
        } else {
            LimitingFactor::Storage
        }
    }
}

/// Demand after growth (and data reduction for storage).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Demand {
    pub cores: f64,
    pub ram: f64,
    pub storage: f64,
}

/// Usable capacity of one target node once the CVM reservation is taken out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCapacity {
    pub cores: f64,
    pub ram: f64,
    pub storage: f64,
}

/// Projects the source totals forward by the growth factor.
pub fn project_demand(inputs: &ClusterInputs) -> Demand {
    let growth = 1.0 + inputs.growth_factor / 100.0;
    let cores = f64::from(inputs.source_hosts)
        * f64::from(inputs.source_sockets)
        * f64::from(inputs.source_cores_per_socket);
    let ram = f64::from(inputs.source_hosts) * inputs.source_ram;
    Demand {
        cores: cores * growth,
        ram: ram * growth,
        storage: inputs.source_usable_storage * growth
            / pricing::storage_efficiency_ratio(inputs.storage_efficiency),
    }
}

pub fn node_capacity(inputs: &ClusterInputs) -> NodeCapacity {
    let (cvm_cores, cvm_ram) = pricing::cvm_reservation(inputs.apply_cvm_overhead);
    let raw_cores =
        f64::from(inputs.target_cores_per_socket) * f64::from(pricing::TARGET_SOCKETS_PER_NODE);
    NodeCapacity {
        cores: raw_cores - f64::from(cvm_cores),
        ram: inputs.target_ram - cvm_ram,
        storage: inputs.target_raw_storage * pricing::USABLE_STORAGE_FACTOR,
    }
}

/// Per-dimension node counts, each rounded up on its own.
pub fn node_counts(inputs: &ClusterInputs) -> NodeCounts {
    let demand = project_demand(inputs);
    let capacity = node_capacity(inputs);
    let efficiency = pricing::cpu_efficiency(inputs.apply_modernization, inputs.target_cpu_type);
    let cpu_demand = demand.cores / efficiency;
    NodeCounts {
        cpu: nodes_for(cpu_demand, capacity.cores),
        ram: nodes_for(demand.ram, capacity.ram),
        storage: nodes_for(demand.storage, capacity.storage),
    }
}

// Float-to-int `as` saturates: a zero capacity yields u32::MAX, NaN yields 0.
fn nodes_for(demand: f64, per_node: f64) -> u32 {
    (demand / per_node).ceil() as u32
}

// Saturates instead of overflowing on absurdly large inputs.
fn source_total_cores(inputs: &ClusterInputs) -> u64 {
    u64::from(inputs.source_hosts)
        .saturating_mul(u64::from(inputs.source_sockets))
        .saturating_mul(u64::from(inputs.source_cores_per_socket))
}

/// `hosts / nodes` as a double, printed to one decimal.
fn consolidation_ratio(hosts: u32, nodes: u32) -> String {
    let ratio = f64::from(hosts) / f64::from(nodes.max(1));
    format!("{} : 1", one_decimal(ratio))
}

/// Formats to one decimal, rounding an exact half-way value (x.25, x.75) up.
///
/// `{:.1}` already rounds the exact binary value, but breaks exact ties to even.
fn one_decimal(x: f64) -> String {
    let quarters = x * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        format!("{:.1}", (x * 10.0).ceil() / 10.0)
    } else {
        format!("{:.1}", x)
    }
}

/// Rounds half-way cases toward positive infinity; non-finite values pass through.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Sizes the target cluster and compares costs using the built-in price list.
///
/// Shorthand for [`compute_with_prices`] with [`PriceBook::default`].
///
/// # Examples
///
/// ```
/// use hv_migration_sizer::{
///     ClusterInputs, CpuVendor, LicenseTier, LimitingFactor, RedundancyLevel, compute,
/// };
///
/// let inputs = ClusterInputs {
///     source_hosts: 10,
///     source_sockets: 2,
///     source_cores_per_socket: 8,
///     source_ram: 256.0,
///     source_usable_storage: 50.0,
///     growth_factor: 0.0,
///     storage_efficiency: false,
///     include_migration_services: false,
///     target_cpu_type: CpuVendor::Intel,
///     target_cores_per_socket: 16,
///     target_ram: 512.0,
///     target_raw_storage: 15.0,
///     apply_modernization: false,
///     apply_cvm_overhead: false,
///     redundancy_level: RedundancyLevel::NPlusTwo,
///     target_license: LicenseTier::Pro,
///     show_financials: true,
/// };
///
/// let r = compute(&inputs);
/// assert_eq!(r.nodes_required, 9);
/// assert_eq!(r.limiting_factor, LimitingFactor::Storage);
/// assert_eq!(r.consolidation_ratio, "1.1 : 1");
/// ```
pub fn compute(inputs: &ClusterInputs) -> SizingResults {
    compute_with_prices(inputs, &PriceBook::default())
}

/// Sizes the target cluster and compares costs against `prices`.
///
/// The computation is pure and total: no validation happens here, so
/// degenerate inputs (zero hosts, a CVM reservation larger than the node)
/// surface as saturated node counts or non-finite financial figures rather
/// than errors.
///
/// # Formulas
///
/// ```text
/// growth         = 1 + growth_factor / 100
/// demand_cores   = hosts * sockets * cores_per_socket * growth
/// demand_ram     = hosts * ram * growth
/// demand_storage = usable_storage * growth / efficiency_ratio
///
/// cpu_nodes      = ceil(demand_cores / cpu_efficiency / (2 * target_cps - cvm_cores))
/// ram_nodes      = ceil(demand_ram / (target_ram - cvm_ram))
/// storage_nodes  = ceil(demand_storage / (target_raw_storage * 0.55))
/// nodes          = max(cpu_nodes, ram_nodes, storage_nodes, 3) + redundancy
///
/// legacy_cost    = hosts * sockets * max(cores_per_socket, 16) * legacy_rate
/// license_cost   = nodes * 2 * target_cps * target_rate
/// hardware_cost  = nodes * node_hardware_cost
/// savings        = legacy_cost - (license_cost + hardware_cost + migration)
/// savings_pct    = round(savings / legacy_cost * 100)
/// ```
pub fn compute_with_prices(inputs: &ClusterInputs, prices: &PriceBook) -> SizingResults {
    let counts = node_counts(inputs);
    let capacity = node_capacity(inputs);

    let raw_nodes = counts.max().max(pricing::MIN_CLUSTER_NODES);
    let nodes = raw_nodes.saturating_add(pricing::extra_nodes(inputs.redundancy_level));
    let nodes_f = f64::from(nodes);

    let cores_per_node =
        u64::from(inputs.target_cores_per_socket) * u64::from(pricing::TARGET_SOCKETS_PER_NODE);
    let target_total_cores = u64::from(nodes).saturating_mul(cores_per_node);

    let billable_cores = f64::from(inputs.source_hosts)
        * f64::from(inputs.source_sockets)
        * f64::from(inputs.source_cores_per_socket.max(pricing::LEGACY_MIN_CORES_PER_SOCKET));
    let legacy_cost = billable_cores * prices.legacy_rate(inputs.target_license);

    let target_license_cost = target_total_cores as f64 * prices.target_rate(inputs.target_license);
    let cost_per_node = prices.node_hardware_cost(
        inputs.target_cores_per_socket,
        inputs.target_ram,
        inputs.target_raw_storage,
    );
    let target_hardware_cost = nodes_f * cost_per_node;
    let migration_services_cost = if inputs.include_migration_services {
        prices.migration_services(inputs.source_hosts)
    } else {
        0.0
    };

    let total_target_tco = target_license_cost + target_hardware_cost + migration_services_cost;
    let savings = legacy_cost - total_target_tco;

    SizingResults {
        source_total_cores: source_total_cores(inputs),
        source_total_ram: f64::from(inputs.source_hosts) * inputs.source_ram,
        source_total_storage: inputs.source_usable_storage,
        nodes_required: nodes,
        target_total_cores,
        target_total_ram: nodes_f * inputs.target_ram,
        target_total_storage: nodes_f * capacity.storage,
        consolidation_ratio: consolidation_ratio(inputs.source_hosts, nodes),
        limiting_factor: counts.limiting_factor(),
        efficiency_factor: pricing::cpu_efficiency(
            inputs.apply_modernization,
            inputs.target_cpu_type,
        ),
        legacy_edition: pricing::legacy_edition(inputs.target_license).to_string(),
        target_edition: pricing::target_edition(inputs.target_license).to_string(),
        financials: Financials {
            legacy_cost,
            target_license_cost,
            target_hardware_cost,
            migration_services_cost,
            total_target_tco,
            savings,
            savings_pct: round_half_up(savings / legacy_cost * 100.0),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{CpuVendor, LicenseTier, RedundancyLevel};

    pub(crate) fn reference_inputs() -> ClusterInputs {
        ClusterInputs {
            source_hosts: 10,
            source_sockets: 2,
            source_cores_per_socket: 8,
            source_ram: 256.0,
            source_usable_storage: 50.0,
            growth_factor: 0.0,
            storage_efficiency: false,
            include_migration_services: false,
            target_cpu_type: CpuVendor::Intel,
            target_cores_per_socket: 16,
            target_ram: 512.0,
            target_raw_storage: 15.0,
            apply_modernization: false,
            apply_cvm_overhead: false,
            redundancy_level: RedundancyLevel::None,
            target_license: LicenseTier::Pro,
            show_financials: true,
        }
    }

    #[test]
    fn reference_scenario_is_storage_bound() {
        let inputs = reference_inputs();
        let counts = node_counts(&inputs);
        assert_eq!(
            counts,
            NodeCounts {
                cpu: 5,
                ram: 5,
                storage: 7
            }
        );

        let cap = node_capacity(&inputs);
        assert!((cap.cores - 32.0).abs() < 1e-9);
        assert!((cap.ram - 512.0).abs() < 1e-9);
        assert!((cap.storage - 8.25).abs() < 1e-9);

        let r = compute(&inputs);
        assert_eq!(r.source_total_cores, 160);
        assert!((r.source_total_ram - 2560.0).abs() < 1e-9);
        assert_eq!(r.nodes_required, 7);
        assert_eq!(r.limiting_factor, LimitingFactor::Storage);
        assert_eq!(r.target_total_cores, 224);
        assert!((r.target_total_ram - 3584.0).abs() < 1e-9);
        assert!((r.target_total_storage - 57.75).abs() < 1e-9);
        assert_eq!(r.consolidation_ratio, "1.4 : 1");
        assert_eq!(r.efficiency_factor, 1.0);
    }

    #[test]
    fn n_plus_two_adds_two_nodes() {
        let inputs = ClusterInputs {
            redundancy_level: RedundancyLevel::NPlusTwo,
            ..reference_inputs()
        };
        let r = compute(&inputs);
        assert_eq!(r.nodes_required, 9);
        assert_eq!(r.consolidation_ratio, "1.1 : 1");
    }

    #[test]
    fn reference_financials() {
        let r = compute(&reference_inputs());
        let f = r.financials;
        // 10 hosts * 2 sockets * max(8, 16) cores * 450
        assert!((f.legacy_cost - 144_000.0).abs() < 1e-6);
        // 224 cores * 500
        assert!((f.target_license_cost - 112_000.0).abs() < 1e-6);
        // 7 * 14746
        assert!((f.target_hardware_cost - 103_222.0).abs() < 1e-6);
        assert_eq!(f.migration_services_cost, 0.0);
        assert!((f.total_target_tco - 215_222.0).abs() < 1e-6);
        assert!((f.savings + 71_222.0).abs() < 1e-6);
        // -49.46 -> -49
        assert_eq!(f.savings_pct, -49.0);
        assert_eq!(r.legacy_edition, "VVF + vSAN (Advanced)");
        assert_eq!(r.target_edition, "NCI Pro");
    }

    #[test]
    fn migration_services_priced_per_estimated_vm() {
        let inputs = ClusterInputs {
            include_migration_services: true,
            ..reference_inputs()
        };
        let f = compute(&inputs).financials;
        // 10 hosts * 15 VMs * 150
        assert!((f.migration_services_cost - 22_500.0).abs() < 1e-6);
        assert!((f.total_target_tco - 237_722.0).abs() < 1e-6);
    }

    #[test]
    fn ultimate_compares_against_premium_legacy() {
        let inputs = ClusterInputs {
            target_license: LicenseTier::Ultimate,
            ..reference_inputs()
        };
        let r = compute(&inputs);
        assert!((r.financials.legacy_cost - 304_000.0).abs() < 1e-6);
        assert!((r.financials.target_license_cost - 224.0 * 850.0).abs() < 1e-6);
        assert_eq!(r.legacy_edition, "VCF (Enterprise)");
        assert_eq!(r.target_edition, "NCI Ultimate");
    }

    #[test]
    fn modernization_and_cvm_overhead_shift_cpu_demand() {
        let inputs = ClusterInputs {
            source_cores_per_socket: 32,
            source_usable_storage: 10.0,
            apply_modernization: true,
            apply_cvm_overhead: true,
            target_cpu_type: CpuVendor::Amd,
            ..reference_inputs()
        };
        // 640 cores / 1.4 = 457.1 over 28 usable cores per node -> 17 nodes
        let counts = node_counts(&inputs);
        assert_eq!(counts.cpu, 17);
        // 2560 GB over 480 usable GB -> 6 nodes
        assert_eq!(counts.ram, 6);
        let r = compute(&inputs);
        assert_eq!(r.nodes_required, 17);
        assert_eq!(r.limiting_factor, LimitingFactor::Cpu);
        assert_eq!(r.efficiency_factor, 1.4);
    }

    #[test]
    fn small_source_is_floored_at_three_nodes() {
        let inputs = ClusterInputs {
            source_hosts: 1,
            source_usable_storage: 1.0,
            redundancy_level: RedundancyLevel::NPlusOne,
            ..reference_inputs()
        };
        let r = compute(&inputs);
        assert_eq!(r.nodes_required, 4);
        assert_eq!(r.consolidation_ratio, "0.3 : 1");
    }

    #[test]
    fn growth_and_storage_efficiency_shape_storage_demand() {
        let inputs = ClusterInputs {
            growth_factor: 50.0,
            storage_efficiency: true,
            ..reference_inputs()
        };
        let d = project_demand(&inputs);
        assert!((d.cores - 240.0).abs() < 1e-9);
        assert!((d.ram - 3840.0).abs() < 1e-9);
        assert!((d.storage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_hosts_yields_non_finite_savings_pct() {
        let inputs = ClusterInputs {
            source_hosts: 0,
            source_usable_storage: 0.0,
            ..reference_inputs()
        };
        let r = compute(&inputs);
        assert_eq!(r.financials.legacy_cost, 0.0);
        assert!(!r.financials.savings_pct.is_finite());
        assert_eq!(r.nodes_required, 3);
        assert_eq!(r.consolidation_ratio, "0.0 : 1");

        // Storage demand is independent of the host count.
        let with_storage = ClusterInputs {
            source_hosts: 0,
            ..reference_inputs()
        };
        assert_eq!(compute(&with_storage).nodes_required, 7);
    }

    #[test]
    fn huge_source_saturates_instead_of_overflowing() {
        let inputs = ClusterInputs {
            source_hosts: u32::MAX,
            source_sockets: u32::MAX,
            source_cores_per_socket: u32::MAX,
            ..reference_inputs()
        };
        let r = compute(&inputs);
        assert_eq!(r.source_total_cores, u64::MAX);
        assert!(r.nodes_required >= pricing::MIN_CLUSTER_NODES);
        assert_eq!(r.limiting_factor, LimitingFactor::Cpu);
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let inputs = ClusterInputs {
            growth_factor: 17.0,
            storage_efficiency: true,
            ..reference_inputs()
        };
        let a = compute(&inputs);
        let b = compute(&inputs);
        assert_eq!(a, b);
        assert_eq!(a.financials.savings.to_bits(), b.financials.savings.to_bits());
    }

    #[test]
    fn ratio_ties_round_up() {
        assert_eq!(consolidation_ratio(5, 4), "1.3 : 1");
        assert_eq!(consolidation_ratio(3, 4), "0.8 : 1");
        assert_eq!(consolidation_ratio(1, 4), "0.3 : 1");
        assert_eq!(consolidation_ratio(30, 3), "10.0 : 1");
    }

    #[test]
    fn ratio_rounds_the_double_not_the_fraction() {
        // 1.15, 0.15 and 0.35 sit just below the half-way point as doubles.
        assert_eq!(consolidation_ratio(23, 20), "1.1 : 1");
        assert_eq!(consolidation_ratio(3, 20), "0.1 : 1");
        assert_eq!(consolidation_ratio(7, 20), "0.3 : 1");
        assert_eq!(consolidation_ratio(10, 9), "1.1 : 1");
        assert_eq!(consolidation_ratio(10, 7), "1.4 : 1");
    }

    #[test]
    fn twenty_node_cluster_reports_ratio_from_double() {
        // 165 TB over 8.25 TB usable per node -> 20 nodes, storage bound.
        let inputs = ClusterInputs {
            source_hosts: 23,
            source_usable_storage: 165.0,
            ..reference_inputs()
        };
        let r = compute(&inputs);
        assert_eq!(r.nodes_required, 20);
        assert_eq!(r.limiting_factor, LimitingFactor::Storage);
        assert_eq!(r.consolidation_ratio, "1.1 : 1");
    }

    #[test]
    fn tie_break_prefers_cpu_then_ram() {
        let factor = |cpu, ram, storage| NodeCounts { cpu, ram, storage }.limiting_factor();
        assert_eq!(factor(4, 4, 4), LimitingFactor::Cpu);
        assert_eq!(factor(3, 4, 4), LimitingFactor::Ram);
        assert_eq!(factor(3, 2, 4), LimitingFactor::Storage);
    }

    #[test]
    fn half_way_rounds_toward_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-49.46), -49.0);
        assert!(round_half_up(f64::NAN).is_nan());
        assert_eq!(round_half_up(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }
}
