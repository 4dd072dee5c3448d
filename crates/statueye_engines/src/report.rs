#![forbid(unsafe_code)]

use std::fmt::Write as _;

use statueye_contracts::finding::Finding;
use statueye_contracts::session::Session;

pub const REPORT_HEADER: &str = "Statueye Legal Analysis Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    EmptySession,
}

/// Deterministic plain-text export of a completed session: header, first
/// query, finding count of the most recent turn, one blank-line-separated
/// block per finding, dataset fingerprint footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRuntime;

impl ReportRuntime {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        session: &Session,
        dataset_fingerprint: &str,
    ) -> Result<String, ReportError> {
        let latest = session.latest_turn().ok_or(ReportError::EmptySession)?;
        let first_query = session
            .first_query_text()
            .ok_or(ReportError::EmptySession)?;

        let mut out = String::new();
        out.push_str(REPORT_HEADER);
        out.push('\n');
        out.push_str(&"=".repeat(REPORT_HEADER.len()));
        out.push_str("\n\n");
        let _ = writeln!(out, "Query: {first_query}");
        let _ = writeln!(out, "Results: {} provisions found", latest.findings.len());
        for finding in &latest.findings {
            out.push('\n');
            render_finding(&mut out, finding);
        }
        out.push('\n');
        let _ = writeln!(out, "dataset: {dataset_fingerprint}");
        Ok(out)
    }
}

fn render_finding(out: &mut String, finding: &Finding) {
    let _ = writeln!(out, "{}", finding.title);
    let _ = writeln!(out, "{}", finding.description);
    let _ = writeln!(
        out,
        "Confidence: {}% ({})",
        finding.confidence.value(),
        finding.provenance.as_str()
    );
    if let Some(penalty) = &finding.penalty_text {
        let _ = writeln!(out, "Penalty: {penalty}");
    }
    if !finding.next_steps.is_empty() {
        out.push_str("Next steps:\n");
        for step in &finding.next_steps {
            let _ = writeln!(out, "  - {step}");
        }
    }
}
