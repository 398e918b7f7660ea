use crate::scoring::{Profile, QualityFlag};
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Plain-text report built from the same fields as the JSON profile.
pub fn render_text_report(profile: &Profile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, profile);
    out
}

fn write_report(out: &mut String, profile: &Profile) -> std::fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    let meta = &profile.meta;

    writeln!(out, "{rule}")?;
    writeln!(out, "LERNPROFIL: {}", profile.profile_id)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Version:   {}", meta.version)?;
    writeln!(
        out,
        "Erstellt:  {}",
        meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(out, "\nDimensionen (0-100)")?;
    for score in profile.dimensions.values() {
        writeln!(
            out,
            "- {:<22} {:>5.1}  {:<8} (Mittelwert {:.2}, {} Items)",
            score.label,
            score.score,
            score.classification.label(),
            score.raw_mean,
            score.num_items
        )?;
    }

    let chronotype = &profile.additional_indices.chronotype;
    let avoidance = &profile.additional_indices.motivation_avoidance;
    writeln!(out, "\nZusatzindizes")?;
    writeln!(
        out,
        "- Chronotyp:              {:+.2}  {}",
        chronotype.balance_score, chronotype.interpretation
    )?;
    writeln!(
        out,
        "- Vermeidungsorientierung {:>5.1}  {} ({})",
        avoidance.score,
        avoidance.classification.label(),
        avoidance.interpretation
    )?;

    let quality = &profile.response_quality;
    writeln!(out, "\nAntwortqualität")?;
    writeln!(
        out,
        "- Verschiedene Antworten: {}",
        quality.num_unique_responses
    )?;
    writeln!(out, "- Status: {}", quality.quality_flag.label())?;
    if quality.quality_flag == QualityFlag::Check {
        if let Some(warnings) = &quality.warnings {
            writeln!(out, "- Hinweise: {}", warnings.join(", "))?;
        }
    }

    writeln!(out, "\nItems")?;
    writeln!(
        out,
        "- Instrument: {} | beantwortet: {} | Hauptskalen: {} | Zusatz: {} | invertiert: {}",
        meta.num_items_instrument,
        meta.num_items_answered,
        meta.num_items_main_scales,
        meta.num_items_additional,
        meta.num_reversed_total
    )?;

    Ok(())
}
