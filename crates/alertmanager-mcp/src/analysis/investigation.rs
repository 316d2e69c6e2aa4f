//! Per-alert investigation and history views.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use super::format_elapsed;
use crate::models::Alert;

/// One firing instance of the investigated alert.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance<'a> {
    pub alert: &'a Alert,
    /// Time since `startsAt`, whole seconds, never negative.
    pub elapsed: Duration,
}

/// Every instance of one alert name in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Investigation<'a> {
    pub alert_name: String,
    pub instances: Vec<Instance<'a>>,
}

/// Collect alerts whose `alertname` equals `alert_name` exactly.
///
/// No matches is a valid, empty investigation.
#[must_use]
pub fn investigate<'a>(alerts: &'a [Alert], alert_name: &str, now: DateTime<Utc>) -> Investigation<'a> {
    let instances = alerts
        .iter()
        .filter(|alert| alert.label("alertname") == Some(alert_name))
        .map(|alert| Instance {
            alert,
            elapsed: Duration::seconds((now - alert.starts_at).num_seconds().max(0)),
        })
        .collect();

    Investigation {
        alert_name: alert_name.to_string(),
        instances,
    }
}

impl Investigation<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Full view: labels, annotations and silencing/inhibition per instance.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("=== Investigation: {} ===\n\n", self.alert_name);

        if self.is_empty() {
            out.push_str("No instances found for this alert.\n");
            return out;
        }

        let _ = writeln!(out, "Active Instances: {}\n", self.instances.len());

        for (i, instance) in self.instances.iter().enumerate() {
            let alert = instance.alert;
            let _ = writeln!(out, "--- Instance {} ---", i + 1);
            write_timing(&mut out, instance);

            out.push_str("  Labels:\n");
            for (key, value) in &alert.labels {
                let _ = writeln!(out, "    {key}: {value}");
            }
            if !alert.annotations.is_empty() {
                out.push_str("  Annotations:\n");
                for (key, value) in &alert.annotations {
                    let _ = writeln!(out, "    {key}: {value}");
                }
            }
            if !alert.status.silenced_by.is_empty() {
                let _ = writeln!(out, "  Silenced by: {}", alert.status.silenced_by.join(", "));
            }
            if !alert.status.inhibited_by.is_empty() {
                let _ = writeln!(out, "  Inhibited by: {}", alert.status.inhibited_by.join(", "));
            }
            out.push('\n');
        }

        out
    }
}

/// History view: current instances plus where to look for older data.
#[must_use]
pub fn render_history(investigation: &Investigation<'_>) -> String {
    let name = &investigation.alert_name;
    let mut out = format!("=== Alert History: {name} ===\n\n");

    if investigation.is_empty() {
        out.push_str("No current instances found.\n\n");
    } else {
        let _ = writeln!(out, "Current Instances: {}\n", investigation.instances.len());
        for (i, instance) in investigation.instances.iter().enumerate() {
            let alert = instance.alert;
            let _ = writeln!(out, "Instance {}:", i + 1);
            write_timing(&mut out, instance);
            let _ = writeln!(out, "  Severity: {}", alert.severity());
            if let Some(ns) = alert.label("namespace").filter(|ns| !ns.is_empty()) {
                let _ = writeln!(out, "  Namespace: {ns}");
            }
            out.push('\n');
        }
    }

    out.push_str("--- Historical Analysis Guidance ---\n");
    out.push_str("Alertmanager only stores current/active alerts.\n");
    out.push_str("For historical alert data, query Prometheus with:\n");
    let _ = writeln!(out, "  ALERTS{{alertname=\"{name}\"}}");
    let _ = writeln!(out, "  ALERTS_FOR_STATE{{alertname=\"{name}\"}}");

    out
}

fn write_timing(out: &mut String, instance: &Instance<'_>) {
    let _ = writeln!(out, "  State: {}", instance.alert.status.state);
    let _ = writeln!(
        out,
        "  Started: {}",
        instance.alert.starts_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "  Duration: {}", format_elapsed(instance.elapsed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{alert, ts};

    #[test]
    fn zero_matches_is_an_empty_result() {
        let alerts = vec![alert(&[("alertname", "Other")])];
        let investigation = investigate(&alerts, "Missing", ts("2026-10-19T11:00:00Z"));

        assert!(investigation.is_empty());
        assert_eq!(
            investigation.render(),
            "=== Investigation: Missing ===\n\nNo instances found for this alert.\n"
        );
    }

    #[test]
    fn matches_exact_name_and_truncates_elapsed() {
        let mut first = alert(&[("alertname", "Down"), ("namespace", "ns1")]);
        first.starts_at = ts("2026-10-19T10:00:00.750Z");
        let alerts = vec![
            first,
            alert(&[("alertname", "DownAgain")]),
            alert(&[("alertname", "Down"), ("namespace", "ns2")]),
        ];

        let investigation = investigate(&alerts, "Down", ts("2026-10-19T11:02:03.500Z"));
        assert_eq!(investigation.instances.len(), 2);
        // 1h2m2.75s truncates to whole seconds
        assert_eq!(investigation.instances[0].elapsed, Duration::seconds(3722));
        assert_eq!(investigation.instances[1].elapsed, Duration::seconds(3723));
    }

    #[test]
    fn future_start_clamps_to_zero() {
        let alerts = vec![alert(&[("alertname", "Down")])];
        let investigation = investigate(&alerts, "Down", ts("2026-10-19T09:00:00Z"));
        assert_eq!(investigation.instances[0].elapsed, Duration::zero());
    }

    #[test]
    fn render_shows_labels_annotations_and_references() {
        let mut target = alert(&[("alertname", "Down"), ("severity", "critical")]);
        target
            .annotations
            .insert("summary".to_string(), "Target is down".to_string());
        target.status.silenced_by = vec!["s-1".to_string(), "s-2".to_string()];
        target.status.inhibited_by = vec!["r-1".to_string()];
        let alerts = vec![target];

        let text = investigate(&alerts, "Down", ts("2026-10-19T10:00:45Z")).render();
        assert!(text.contains("Active Instances: 1\n\n--- Instance 1 ---\n"));
        assert!(text.contains("  State: active\n  Started: 2026-10-19T10:00:00Z\n  Duration: 45s\n"));
        assert!(text.contains("  Labels:\n    alertname: Down\n    severity: critical\n"));
        assert!(text.contains("  Annotations:\n    summary: Target is down\n"));
        assert!(text.contains("  Silenced by: s-1, s-2\n"));
        assert!(text.contains("  Inhibited by: r-1\n"));
    }

    #[test]
    fn history_includes_prometheus_guidance() {
        let alerts = vec![alert(&[("alertname", "Down"), ("namespace", "ns1"), ("severity", "warning")])];
        let now = ts("2026-10-19T12:00:00Z");

        let text = render_history(&investigate(&alerts, "Down", now));
        assert!(text.starts_with("=== Alert History: Down ===\n\nCurrent Instances: 1\n\n"));
        assert!(text.contains("Instance 1:\n  State: active\n"));
        assert!(text.contains("  Duration: 2h0m0s\n  Severity: warning\n  Namespace: ns1\n"));
        assert!(text.contains("  ALERTS{alertname=\"Down\"}\n"));
        assert!(text.contains("  ALERTS_FOR_STATE{alertname=\"Down\"}\n"));

        let empty = render_history(&investigate(&alerts, "Gone", now));
        assert!(empty.contains("No current instances found.\n\n--- Historical Analysis Guidance ---"));
    }
}
