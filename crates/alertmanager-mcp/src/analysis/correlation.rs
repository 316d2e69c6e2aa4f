//! Correlation of alerts that share a label value.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::models::Alert;

/// Labels alerts are correlated on.
pub const CORRELATION_LABELS: [&str; 6] = ["namespace", "pod", "node", "service", "job", "instance"];

/// Alerts sharing one `label=value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationGroup<'a> {
    /// `label=value`
    pub key: String,
    pub alerts: Vec<&'a Alert>,
}

impl CorrelationGroup<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Group alerts by each non-empty correlation label they carry.
///
/// An alert joins one group per label it carries. Only groups with two or
/// more members are returned, largest first, ties broken by key. Members
/// keep their snapshot order.
#[must_use]
pub fn correlate(alerts: &[Alert]) -> Vec<CorrelationGroup<'_>> {
    let mut groups: HashMap<String, Vec<&Alert>> = HashMap::new();

    for alert in alerts {
        for label in CORRELATION_LABELS {
            if let Some(value) = alert.label(label).filter(|v| !v.is_empty()) {
                groups.entry(format!("{label}={value}")).or_default().push(alert);
            }
        }
    }

    let mut correlated: Vec<_> = groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(key, alerts)| CorrelationGroup { key, alerts })
        .collect();
    correlated.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.key.cmp(&b.key)));
    correlated
}

/// Text view of [`correlate`] output for a snapshot of `total` alerts.
#[must_use]
pub fn render_correlation(total: usize, groups: &[CorrelationGroup<'_>]) -> String {
    if total == 0 {
        return "No active alerts to correlate.".to_string();
    }

    let mut out = format!("=== Alert Correlation ===\nTotal Active Alerts: {total}\n\n");

    if groups.is_empty() {
        out.push_str("No correlated alerts found (no shared labels between alerts).\n");
        return out;
    }

    for group in groups {
        let _ = writeln!(out, "--- {} ({} alerts) ---", group.key, group.len());
        for alert in &group.alerts {
            let _ = writeln!(
                out,
                "  - {} [{}] ({})",
                alert.name(),
                alert.severity(),
                alert.status.state
            );
        }
        out.push('\n');
    }

    out
}
