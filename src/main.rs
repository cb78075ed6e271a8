use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hv_migration_sizer::{
    ClusterInputs, CpuVendor, LicenseTier, PriceBook, RedundancyLevel, Report, Scenario,
    compute_with_prices, validate,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Command-line arguments for the hypervisor migration sizer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Read all inputs (and optional `[pricing]` overrides) from a .toml or .json file.
    /// Input flags below are ignored when set.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Skip input validation and print whatever the estimator yields.
    #[arg(long)]
    no_validate: bool,

    /// Number of hosts in the source cluster.
    #[arg(long, default_value_t = 4)]
    source_hosts: u32,

    /// CPU sockets per source host.
    #[arg(long, default_value_t = 2)]
    source_sockets: u32,

    /// Cores per source socket.
    #[arg(long, default_value_t = 16)]
    source_cores_per_socket: u32,

    /// RAM per source host (GB).
    #[arg(long, default_value_t = 512.0)]
    source_ram: f64,

    /// Usable storage of the whole source cluster (TB).
    #[arg(long, default_value_t = 50.0)]
    source_usable_storage: f64,

    /// Projected growth in percent (0-50).
    #[arg(long, default_value_t = 0.0)]
    growth_factor: f64,

    /// Assume 1.5:1 data reduction on the target storage.
    #[arg(long)]
    storage_efficiency: bool,

    /// Add migration professional services to the target TCO.
    #[arg(long)]
    include_migration_services: bool,

    /// CPU vendor of the target nodes.
    #[arg(long, value_enum, default_value_t = CpuVendor::Intel)]
    target_cpu_type: CpuVendor,

    /// Cores per socket of a (dual-socket) target node.
    #[arg(long, default_value_t = 16)]
    target_cores_per_socket: u32,

    /// RAM per target node (GB).
    #[arg(long, default_value_t = 512.0)]
    target_ram: f64,

    /// Raw storage per target node (TB).
    #[arg(long, default_value_t = 15.36)]
    target_raw_storage: f64,

    /// Credit newer CPU generations with fewer required cores.
    #[arg(long)]
    apply_modernization: bool,

    /// Reserve CVM cores and RAM on every node.
    #[arg(long)]
    apply_cvm_overhead: bool,

    /// Spare nodes on top of the computed count.
    #[arg(long = "redundancy", value_enum, default_value_t = RedundancyLevel::NPlusOne)]
    redundancy_level: RedundancyLevel,

    /// Target license tier.
    #[arg(long, value_enum, default_value_t = LicenseTier::Pro)]
    target_license: LicenseTier,

    /// Omit the financial comparison from the text report.
    #[arg(long)]
    hide_financials: bool,
}

impl Args {
    fn inputs(&self) -> ClusterInputs {
        ClusterInputs {
            source_hosts: self.source_hosts,
            source_sockets: self.source_sockets,
            source_cores_per_socket: self.source_cores_per_socket,
            source_ram: self.source_ram,
            source_usable_storage: self.source_usable_storage,
            growth_factor: self.growth_factor,
            storage_efficiency: self.storage_efficiency,
            include_migration_services: self.include_migration_services,
            target_cpu_type: self.target_cpu_type,
            target_cores_per_socket: self.target_cores_per_socket,
            target_ram: self.target_ram,
            target_raw_storage: self.target_raw_storage,
            apply_modernization: self.apply_modernization,
            apply_cvm_overhead: self.apply_cvm_overhead,
            redundancy_level: self.redundancy_level,
            target_license: self.target_license,
            show_financials: !self.hide_financials,
        }
    }
}

fn run(a: &Args) -> Result<()> {
    let scenario = match &a.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario {
            inputs: a.inputs(),
            pricing: PriceBook::default(),
        },
    };
    debug!(?scenario, "resolved inputs");

    if !a.no_validate {
        validate(&scenario.inputs).context("input validation failed")?;
    }

    let results = compute_with_prices(&scenario.inputs, &scenario.pricing);
    info!(
        nodes = results.nodes_required,
        limiting = %results.limiting_factor,
        "sizing complete"
    );

    match a.format {
        Format::Text => println!("{}", Report::new(&scenario.inputs, &results)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let a = Args::parse();

    if let Err(e) = run(&a) {
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }
}
