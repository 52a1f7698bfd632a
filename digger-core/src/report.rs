// Rendering of a run's final result set

use crate::error::Result;
use crate::model::{HostingLink, RunSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub summary: RunSummary,
    pub links: Vec<HostingLink>,
}

pub fn generate_report(report: &RunReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

pub fn generate_text_report(report: &RunReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", RULE));
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Candidates listed:        {}\n", summary.listed));
    out.push_str(&format!("  Hosting links found:      {}\n", summary.linked));
    out.push_str(&format!("  With legacy manifest:     {}\n", summary.with_legacy_manifest));
    out.push_str(&format!("  Without modern manifest:  {}\n", summary.without_modern_manifest));
    out.push_str(&format!("  Previously reported:      {}\n", summary.previously_reported));
    out.push_str(&format!("  New:                      {}\n", summary.unreported));
    out.push_str(&format!("\n{}\n\n", RULE));

    out.push_str(&format!(
        "Results {} :\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if report.links.is_empty() {
        out.push_str("  (no new candidates)\n");
    }
    for link in &report.links {
        out.push_str(&format!("{}\n", link));
    }

    out
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
