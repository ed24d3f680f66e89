use duplexcmp::backends::BackendError;
use duplexcmp::engine::ScenarioComparison;
use duplexcmp::workflows::{DriftFinding, Scenario};
use std::io::{self, Write};

const RULE: &str =
    "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Backends that could not be resolved at all (missing in-process library);
/// printed once, before the first scenario.
pub fn render_unavailable(
    out: &mut impl Write,
    unavailable: &[(String, BackendError)],
) -> io::Result<()> {
    for (label, error) in unavailable {
        writeln!(out, "NOTE: backend '{label}' is unavailable and will be skipped: {error}")?;
    }
    if !unavailable.is_empty() {
        writeln!(out)?;
    }
    Ok(())
}

/// One scenario block: the input, every backend's result or failure, and
/// the pairwise differences.
pub fn render_scenario(
    out: &mut impl Write,
    scenario: &Scenario,
    comparison: &ScenarioComparison,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "[{}] — {}", scenario.pair_label, scenario.conditions_label)?;
    writeln!(out, "Primer:  {}", scenario.pair.primer)?;
    writeln!(out, "Target:  {}", scenario.pair.target)?;
    let c = &scenario.conditions;
    writeln!(
        out,
        "Conditions: Na+ {} mM, Mg2+ {} mM, dNTP {} mM, DNA {} nM, T {} °C",
        c.monovalent_mm, c.divalent_mm, c.dntp_mm, c.dna_nm, c.temperature_c
    )?;
    writeln!(out, "{THIN_RULE}")?;

    for outcome in &comparison.outcomes {
        match &outcome.result {
            Ok(result) => {
                write!(
                    out,
                    "  {:<18} ΔG {:8.2} kcal/mol   Tm {:8.2} °C",
                    outcome.label, result.dg, result.tm
                )?;
                if let Some(dh) = result.dh {
                    write!(out, "   ΔH {dh:8.2} kcal/mol")?;
                }
                if let Some(ds) = result.ds {
                    write!(out, "   ΔS {ds:8.2} cal/mol/K")?;
                }
                writeln!(out)?;
            }
            Err(error) => {
                writeln!(out, "  {:<18} FAILED: {error}", outcome.label)?;
            }
        }
    }

    if comparison.records.is_empty() {
        writeln!(
            out,
            "Differences: none computable ({} backend(s) produced a result)",
            comparison.present_count()
        )?;
    } else {
        writeln!(out, "Differences:")?;
        for record in &comparison.records {
            writeln!(
                out,
                "  {} vs {}:  ΔG {:+.2} kcal/mol   Tm {:+.2} °C",
                record.second, record.first, record.dg_diff, record.tm_diff
            )?;
        }
    }
    writeln!(out)
}

/// End-of-run drift findings: values that moved with the reporting
/// temperature even though the salt composition was unchanged.
pub fn render_findings(out: &mut impl Write, findings: &[DriftFinding]) -> io::Result<()> {
    if findings.is_empty() {
        return Ok(());
    }
    writeln!(out, "{RULE}")?;
    writeln!(out, "UNEXPECTED: values varying with the reporting temperature")?;
    writeln!(out, "{THIN_RULE}")?;
    for finding in findings {
        writeln!(
            out,
            "  {} / [{}]: {} is {:.4} at baseline but {:.4} at reduced temperature",
            finding.backend,
            finding.pair_label,
            finding.quantity,
            finding.at_baseline,
            finding.at_reduced_temperature
        )?;
    }
    Ok(())
}
