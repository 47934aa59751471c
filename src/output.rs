//! Output formatting for the state-probe CLI
//!
//! Human-readable text for each command, and a shared JSON printer.

use serde::Serialize;

use state_probe_resolver::{CandidateReport, ProbeOutcome, ResolutionReport, Role};
use state_probe_types::{HostVersion, MethodShape, StructuredValue};

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a successful resolution.
pub fn format_resolution(version: &HostVersion, report: &ResolutionReport) -> String {
    format!("Host {version}\n{report}\n")
}

/// Format every probed candidate as an aligned table.
pub fn format_candidates(report: &CandidateReport) -> String {
    let mut out = format!(
        "Host {} ({} protocol), owner {}\n",
        report.host_version, report.protocol, report.owner
    );
    if report.candidates.is_empty() {
        out.push_str("  no candidates\n");
        return out;
    }

    let width = report
        .candidates
        .iter()
        .map(|entry| entry.signature.to_string().len())
        .max()
        .unwrap_or(0);
    for entry in &report.candidates {
        let outcome = match entry.outcome {
            ProbeOutcome::NoValue => "no value",
            ProbeOutcome::Empty => "empty",
            ProbeOutcome::NonEmpty => "non-empty",
        };
        let role = match entry.role {
            Some(Role::Load) => "load",
            Some(Role::Save) => "save",
            None => "-",
        };
        out.push_str(&format!(
            "  {:<width$}  {:<9}  {}\n",
            entry.signature.to_string(),
            outcome,
            role,
            width = width
        ));
    }

    // Duplicates count within one shape; returning candidates only save.
    let void = MethodShape::void_procedure();
    let returning = MethodShape::returning_blob();
    for (shape, role) in [
        (&void, Role::Load),
        (&void, Role::Save),
        (&returning, Role::Save),
    ] {
        let count = report
            .candidates
            .iter()
            .filter(|entry| &entry.shape == shape && entry.role == Some(role))
            .count();
        if count > 1 {
            out.push_str(&format!("  warning: {count} candidates look like {role}\n"));
        }
    }
    out
}

/// Format an entity state, one top-level entry per line.
pub fn format_state(state: &StructuredValue) -> String {
    match state.as_compound() {
        Some(map) => map
            .iter()
            .map(|(key, value)| format!("  {key} = {value}\n"))
            .collect(),
        None => format!("  {state}\n"),
    }
}
