//! Insights report assembly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Requested report flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Default,
    Detailed,
    Summary,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Detailed => "detailed",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown report type '{0}'. Valid: default, detailed, summary")]
pub struct UnknownReportKind(String);

impl FromStr for ReportKind {
    type Err = UnknownReportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "detailed" => Ok(Self::Detailed),
            "summary" => Ok(Self::Summary),
            other => Err(UnknownReportKind(other.to_string())),
        }
    }
}

/// Status flag on a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
}

/// A generated insights report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub status: ReportStatus,
    pub report_type: ReportKind,
    pub report: Vec<String>,
}

/// Build a report of `kind` around `insights`. The insights pass through as-is.
pub fn generate_insights_report(insights: Vec<String>, kind: ReportKind) -> InsightsReport {
    tracing::info!("Generating {kind} report");
    InsightsReport {
        status: ReportStatus::Success,
        report_type: kind,
        report: insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_echoes_insights() {
        let insights = vec!["a".to_string(), "b".to_string()];
        let report = generate_insights_report(insights.clone(), ReportKind::Summary);

        assert_eq!(report.status, ReportStatus::Success);
        assert_eq!(report.report_type, ReportKind::Summary);
        assert_eq!(report.report, insights);
    }

    #[test]
    fn report_json_shape() {
        let report = generate_insights_report(vec!["x".into()], ReportKind::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "report_type": "default", "report": ["x"]})
        );
    }

    #[test]
    fn report_kind_parses_known_names() {
        assert_eq!("detailed".parse::<ReportKind>().unwrap(), ReportKind::Detailed);
        assert_eq!("summary".parse::<ReportKind>().unwrap(), ReportKind::Summary);
        assert!("fancy".parse::<ReportKind>().is_err());
    }
}
