use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::model::{ClusterInputs, SizingResults};

/// Human-readable rendering of one sizing run.
///
/// The financial section is only written when the inputs ask for it
/// (`show_financials`).
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub inputs: &'a ClusterInputs,
    pub results: &'a SizingResults,
}

impl<'a> Report<'a> {
    pub fn new(inputs: &'a ClusterInputs, results: &'a SizingResults) -> Self {
        Self { inputs, results }
    }
}

fn fmt_gb(x: f64) -> String {
    format!("{:.0} GB", x)
}
fn fmt_tb(x: f64) -> String {
    format!("{:.2} TB", x)
}
fn fmt_money(x: f64) -> String {
    if !x.is_finite() {
        return format!("{}", x);
    }
    let whole = x.abs().round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if x < 0.0 && whole > 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let i = self.inputs;
        let r = self.results;

        writeln!(f, "=== Hypervisor Migration Sizing ===")?;
        writeln!(
            f,
            "Source: {} hosts x {} sockets x {} cores | {} RAM/host | {} usable",
            i.source_hosts,
            i.source_sockets,
            i.source_cores_per_socket,
            fmt_gb(i.source_ram),
            fmt_tb(i.source_usable_storage)
        )?;
        writeln!(
            f,
            "Growth: {:.0}% | Storage efficiency: {} | Modernization: {} | CVM overhead: {}",
            i.growth_factor,
            on_off(i.storage_efficiency),
            on_off(i.apply_modernization),
            on_off(i.apply_cvm_overhead)
        )?;
        writeln!(
            f,
            "Target node: {} 2 x {} cores | {} RAM | {} raw | redundancy {}",
            i.target_cpu_type,
            i.target_cores_per_socket,
            fmt_gb(i.target_ram),
            fmt_tb(i.target_raw_storage),
            i.redundancy_level
        )?;
        writeln!(f)?;

        writeln!(f, "Source cores:             {}", r.source_total_cores)?;
        writeln!(f, "Source RAM:               {}", fmt_gb(r.source_total_ram))?;
        writeln!(f, "Source storage:           {}", fmt_tb(r.source_total_storage))?;
        writeln!(f)?;
        writeln!(f, "Nodes required:           {}", r.nodes_required)?;
        writeln!(f, "Target cores:             {}", r.target_total_cores)?;
        writeln!(f, "Target RAM:               {}", fmt_gb(r.target_total_ram))?;
        writeln!(f, "Target usable storage:    {}", fmt_tb(r.target_total_storage))?;
        writeln!(f, "Consolidation ratio:      {}", r.consolidation_ratio)?;
        writeln!(f, "Limiting factor:          {}", r.limiting_factor)?;
        writeln!(f, "CPU efficiency applied:   {:.2}x", r.efficiency_factor)?;
        writeln!(f)?;
        writeln!(f, "Legacy edition:           {}", r.legacy_edition)?;
        writeln!(f, "Target edition:           {}", r.target_edition)?;

        if i.show_financials {
            let m = &r.financials;
            writeln!(f)?;
            writeln!(f, "Legacy renewal:           {}", fmt_money(m.legacy_cost))?;
            writeln!(f, "Target licenses:          {}", fmt_money(m.target_license_cost))?;
            writeln!(f, "+ Target hardware:        {}", fmt_money(m.target_hardware_cost))?;
            writeln!(f, "+ Migration services:     {}", fmt_money(m.migration_services_cost))?;
            writeln!(f, "= Target TCO:             {}", fmt_money(m.total_target_tco))?;
            writeln!(
                f,
                "Savings:                  {} ({}%)",
                fmt_money(m.savings),
                m.savings_pct
            )?;
        }

        Ok(())
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}
