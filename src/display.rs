//! Presentation mapping for insights.
//!
//! Pure lookup tables outside the decision core: a stable
//! `kind → icon key` / `priority → color key` contract consumed by
//! dashboard renderers. No formatting logic lives here beyond attaching
//! the keys.

use serde::Serialize;

use crate::insights::{Insight, InsightKind, Priority};

/// Icon key for a renderer's icon set.
pub fn icon_key(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Trend => "TrendingUp",
        InsightKind::Social => "Users",
        InsightKind::Video => "Music",
        InsightKind::Intent => "Target",
        InsightKind::Budget => "DollarSign",
        InsightKind::MultiSource => "Layers",
    }
}

/// Color key for a renderer's palette.
pub fn color_key(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "red",
        Priority::Medium => "yellow",
        Priority::Low => "gray",
    }
}

/// An [`Insight`] decorated with its presentation keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayInsight {
    pub icon: &'static str,
    pub color: &'static str,
    pub badge: &'static str,
    #[serde(flatten)]
    pub insight: Insight,
}

/// Decorate ranked insights for display, preserving order.
pub fn format_for_display(insights: &[Insight]) -> Vec<DisplayInsight> {
    insights
        .iter()
        .map(|insight| DisplayInsight {
            icon: icon_key(insight.kind),
            color: color_key(insight.priority),
            badge: insight.priority.badge(),
            insight: insight.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_total_and_stable() {
        assert_eq!(icon_key(InsightKind::Budget), "DollarSign");
        assert_eq!(icon_key(InsightKind::MultiSource), "Layers");
        assert_eq!(color_key(Priority::High), "red");
        assert_eq!(color_key(Priority::Low), "gray");
    }

    #[test]
    fn display_records_carry_keys_and_badge() {
        let insight = Insight {
            id: "budget_optimization",
            kind: InsightKind::Budget,
            priority: Priority::High,
            title: "Optimization detected: a".to_string(),
            description: String::new(),
            action: String::new(),
            confidence: 0.85,
            impact_score: 15.0,
            source: "Budget Optimizer",
            detail: None,
        };
        let display = format_for_display(std::slice::from_ref(&insight));
        assert_eq!(display.len(), 1);
        assert_eq!(display[0].icon, "DollarSign");
        assert_eq!(display[0].color, "red");
        assert_eq!(display[0].badge, "HIGH");
        assert_eq!(display[0].insight, insight);
    }
}
