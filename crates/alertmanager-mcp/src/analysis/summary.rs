//! Severity, name and namespace tallies.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::models::Alert;

/// Maximum alert names listed under "Top Alerts".
pub const TOP_ALERTS: usize = 10;

/// Counts over one alert snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub total: usize,
    /// Keyed by `severity`; missing or blank severities count as `unknown`.
    pub by_severity: BTreeMap<String, usize>,
    pub by_name: BTreeMap<String, usize>,
    /// Alerts without a `namespace` label are left out.
    pub by_namespace: BTreeMap<String, usize>,
}

impl AlertSummary {
    #[must_use]
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut summary = Self {
            total: alerts.len(),
            ..Self::default()
        };

        for alert in alerts {
            let severity = match alert.severity() {
                "" => "unknown",
                severity => severity,
            };
            *summary.by_severity.entry(severity.to_string()).or_default() += 1;
            *summary.by_name.entry(alert.name().to_string()).or_default() += 1;

            if let Some(ns) = alert.label("namespace").filter(|ns| !ns.is_empty()) {
                *summary.by_namespace.entry(ns.to_string()).or_default() += 1;
            }
        }

        summary
    }

    /// Alert names by instance count descending, ties by name, at most [`TOP_ALERTS`].
    #[must_use]
    pub fn top_alerts(&self) -> Vec<(&str, usize)> {
        let mut ranked = ranked(&self.by_name);
        ranked.truncate(TOP_ALERTS);
        ranked
    }

    /// Namespaces by alert count descending, ties by name.
    #[must_use]
    pub fn namespaces(&self) -> Vec<(&str, usize)> {
        ranked(&self.by_namespace)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!(
            "=== Alerting Summary ===\nTotal Active Alerts: {}\n\n",
            self.total
        );

        out.push_str("--- By Severity ---\n");
        for (severity, count) in &self.by_severity {
            let _ = writeln!(out, "  {severity}: {count}");
        }

        out.push_str("\n--- Top Alerts ---\n");
        for (name, count) in self.top_alerts() {
            let _ = writeln!(out, "  {name}: {count} instances");
        }

        out.push_str("\n--- Affected Namespaces ---\n");
        for (ns, count) in self.namespaces() {
            let _ = writeln!(out, "  {ns}: {count} alerts");
        }

        out
    }
}

fn ranked(counts: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<_> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    // BTreeMap iteration is already name-ordered and sort_by is stable
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::alert;

    #[test]
    fn counts_severities() {
        let alerts = vec![
            alert(&[("alertname", "A"), ("severity", "critical")]),
            alert(&[("alertname", "B"), ("severity", "critical")]),
            alert(&[("alertname", "C"), ("severity", "warning")]),
        ];

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_severity.get("critical"), Some(&2));
        assert_eq!(summary.by_severity.get("warning"), Some(&1));

        let text = summary.render();
        assert!(text.contains("Total Active Alerts: 3"));
        assert!(text.contains("  critical: 2\n  warning: 1\n"));
    }

    #[test]
    fn missing_severity_is_unknown_and_missing_namespace_is_skipped() {
        let alerts = vec![
            alert(&[("alertname", "A"), ("namespace", "ns1")]),
            alert(&[("alertname", "A"), ("severity", "")]),
        ];

        let summary = AlertSummary::from_alerts(&alerts);
        assert_eq!(summary.by_severity.get("unknown"), Some(&2));
        assert_eq!(summary.namespaces(), vec![("ns1", 1)]);
        assert_eq!(summary.top_alerts(), vec![("A", 2)]);
    }

    #[test]
    fn rankings_break_ties_by_name_and_cap_top_alerts() {
        let mut alerts = Vec::new();
        for i in 0..12 {
            let name = format!("Alert{i:02}");
            alerts.push(alert(&[("alertname", name.as_str()), ("namespace", "b")]));
        }
        alerts.push(alert(&[("alertname", "Alert11"), ("namespace", "a")]));
        alerts.push(alert(&[("alertname", "Alert11"), ("namespace", "c")]));
        alerts.push(alert(&[("alertname", "Zeta"), ("namespace", "c")]));

        let summary = AlertSummary::from_alerts(&alerts);
        let top = summary.top_alerts();
        assert_eq!(top.len(), TOP_ALERTS);
        assert_eq!(top[0], ("Alert11", 3));
        assert_eq!(top[1], ("Alert00", 1));
        assert_eq!(top[9], ("Alert08", 1));

        assert_eq!(summary.namespaces(), vec![("b", 12), ("c", 2), ("a", 1)]);

        let text = summary.render();
        assert!(text.contains("  Alert11: 3 instances\n"));
        assert!(!text.contains("Zeta"));
        assert!(text.contains("  b: 12 alerts\n  c: 2 alerts\n  a: 1 alerts\n"));
    }

    #[test]
    fn empty_snapshot_renders_headers() {
        let text = AlertSummary::from_alerts(&[]).render();
        assert!(text.starts_with("=== Alerting Summary ===\nTotal Active Alerts: 0\n"));
        assert!(text.contains("--- Affected Namespaces ---\n"));
    }
}
