//! Deterministic rule engine over per-source data fragments.
//!
//! [`InsightGenerator::generate`] runs six independent sub-generators (trend,
//! social, video platform, analytics/intent, cross-source, budget) in fixed
//! order against whatever fragments are present, then merges, filters by
//! confidence, stable-sorts by impact score, and truncates. Absence of a
//! source never blocks insights derived from other sources: every
//! sub-generator guards missing/empty input and contributes nothing.
//!
//! The per-rule thresholds, confidence constants, and impact formulas are a
//! behavior-compatibility contract for downstream consumers that depend on
//! specific ranking — including a couple of hand-tuned scores (the budget
//! rule's `|change| / 2`, the cross-source 8) that are intentionally not
//! normalized against the other rules' scales.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::optimizer::{BudgetOptimizer, ConfidenceTier, Observation, Recommendation, ShiftDirection};

/// Sentiment categories treated as positive when computing the social
/// sentiment ratio. Matched case-insensitively; includes the legacy
/// Spanish-localized bucket names still emitted by older scrapers.
const POSITIVE_SENTIMENTS: &[&str] = &[
    "very_positive",
    "very positive",
    "positive",
    "muy_positivo",
    "positivo",
];

/// Configuration for insight generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Maximum number of insights returned by `generate`.
    pub max_insights: usize,
    /// Minimum confidence an insight needs to survive filtering.
    pub min_confidence: f64,
    /// Brand token probed against social `top_brands` lists
    /// (case-insensitive substring). `None` disables the brand-presence
    /// insight.
    pub brand_token: Option<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_insights: 10,
            min_confidence: 0.6,
            brand_token: None,
        }
    }
}

/// Which sub-generator produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Trend,
    Social,
    Video,
    Intent,
    Budget,
    MultiSource,
}

/// Insight priority bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Upper-case badge label for display surfaces.
    pub fn badge(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

/// Region with its share of search interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionScore {
    pub region: String,
    pub score: f64,
}

/// Typed rule-specific payload attached to an [`Insight`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightDetail {
    /// A headline numeric metric, optionally with its raw growth label.
    Metric {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        change: Option<String>,
    },
    /// Keywords backing the insight (bounded to 3).
    Keywords(Vec<String>),
    /// Top regions by interest share (bounded to 3).
    Regions(Vec<RegionScore>),
    /// Sentiment category of the referenced topic.
    Sentiment(String),
    /// Raw growth label of the referenced hashtag.
    Growth(String),
    /// Top budget recommendations (bounded to 3).
    Recommendations(Vec<Recommendation>),
}

/// One ranked, human-readable recommendation. Output-only: consumers
/// serialize it, nothing deserializes it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// Stable machine-readable key, unique per rule.
    pub id: &'static str,
    pub kind: InsightKind,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub action: String,
    /// Rule confidence in `[0, 1]`.
    pub confidence: f64,
    /// Ranking key; rule-assigned, not a probability.
    pub impact_score: f64,
    /// Human-readable upstream source label.
    pub source: &'static str,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<InsightDetail>,
}

// ---------------------------------------------------------------------------
// Input fragments (JSON-shaped, one per upstream source).
//
// Field aliases accept the raw upstream keys (`meta`, `tiktok`, `ga4`,
// `aggregatedTopics`, `relevanceScore`, ...) so scraper payloads deserialize
// unchanged.
// ---------------------------------------------------------------------------

/// All data sources for one generation run. Every fragment is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceData {
    pub trends: Option<TrendsData>,
    #[serde(alias = "meta")]
    pub social: Option<SocialData>,
    #[serde(alias = "tiktok")]
    pub video: Option<VideoData>,
    #[serde(alias = "ga4")]
    pub analytics: Option<AnalyticsData>,
    pub budget: Option<BudgetData>,
}

impl SourceData {
    /// Parse a raw upstream JSON payload.
    pub fn from_json_str(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}

/// Search-trends fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsData {
    pub keywords: Vec<TrendKeyword>,
}

/// One tracked search keyword. `keywords[0]` is the top performer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendKeyword {
    pub keyword: String,
    /// Interest index on a 0-100 scale.
    pub average_interest: f64,
    /// Raw growth label over three months, e.g. `"+25%"`.
    pub growth_3m: Option<String>,
    /// Trend direction label, e.g. `"rising"`.
    pub trend: Option<String>,
    /// Interest share per region.
    pub top_regions: BTreeMap<String, f64>,
}

/// Social-listening fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialData {
    #[serde(alias = "aggregatedTopics")]
    pub aggregated_topics: Vec<SocialTopic>,
}

/// One aggregated conversation topic.
///
/// `sentiment` is the category label produced by the upstream sentiment
/// scorer (one of five ordered buckets); this engine treats it as opaque
/// apart from the positive-bucket check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialTopic {
    pub topic: String,
    /// Engagement on a 0-10 scale.
    pub engagement_score: f64,
    pub mentions: u64,
    pub sentiment: Option<String>,
    pub top_brands: Vec<String>,
}

/// Video-platform fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoData {
    pub trends: Option<VideoTrends>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoTrends {
    pub hashtags: Vec<TrendingHashtag>,
}

/// One trending hashtag. `views`/`posts` arrive pre-formatted ("15.2B").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingHashtag {
    pub hashtag: String,
    pub views: Option<String>,
    pub posts: Option<String>,
    pub growth: Option<String>,
    #[serde(alias = "relevanceScore")]
    pub relevance_score: Option<f64>,
}

/// Web-analytics fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsData {
    pub overview: Option<AnalyticsOverview>,
    #[serde(alias = "topPages")]
    pub top_pages: Vec<PageStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOverview {
    /// Conversion rate as a fraction in `[0, 1]`.
    #[serde(alias = "conversionRate")]
    pub conversion_rate: f64,
    pub conversions: u64,
    #[serde(alias = "totalUsers")]
    pub total_users: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStats {
    pub page: String,
    pub views: u64,
    #[serde(alias = "conversionRate")]
    pub conversion_rate: f64,
}

/// Budget fragment driving the bandit optimizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetData {
    /// Aggregated past performance, replayed into the optimizer.
    pub historical: Vec<Observation>,
    /// Current percentage split per channel.
    pub current: Option<BTreeMap<String, f64>>,
    /// Total budget to allocate.
    pub total: Option<f64>,
}

/// Fallback percentage split used when the budget fragment carries none.
fn default_current_split() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("google_search".to_string(), 35.0),
        ("meta_ads".to_string(), 35.0),
        ("youtube".to_string(), 20.0),
        ("display".to_string(), 10.0),
    ])
}

const DEFAULT_TOTAL_BUDGET: f64 = 23_000.0;

/// Parse a raw growth label like `"+25%"` into an integer percentage.
///
/// Keeps digits and the minus sign, drops everything else. Returns `None`
/// when nothing numeric remains.
fn parse_growth(label: Option<&str>) -> Option<i64> {
    let digits: String = label?
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

fn is_positive_sentiment(sentiment: Option<&str>) -> bool {
    let Some(s) = sentiment else {
        return false;
    };
    let s = s.to_lowercase();
    POSITIVE_SENTIMENTS.iter().any(|p| *p == s)
}

/// Rule engine turning source fragments into ranked insights.
///
/// Stateless across calls except for the wrapped [`BudgetOptimizer`], whose
/// posterior persists (and is mutated by the budget sub-generator) when the
/// same generator instance is reused.
#[derive(Debug)]
pub struct InsightGenerator {
    config: InsightConfig,
    optimizer: BudgetOptimizer,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new(InsightConfig::default())
    }
}

impl InsightGenerator {
    /// Create a generator with the default channel set and a deterministic
    /// optimizer seed.
    pub fn new(config: InsightConfig) -> Self {
        Self {
            config,
            optimizer: BudgetOptimizer::default(),
        }
    }

    /// Create a generator around an already-trained optimizer.
    pub fn with_optimizer(config: InsightConfig, optimizer: BudgetOptimizer) -> Self {
        Self { config, optimizer }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &BudgetOptimizer {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut BudgetOptimizer {
        &mut self.optimizer
    }

    /// Run every sub-generator against the fragments present in `data`,
    /// then filter to `min_confidence`, stable-sort descending by impact
    /// score, and truncate to `max_insights`.
    pub fn generate(&mut self, data: &SourceData) -> Vec<Insight> {
        let mut insights = Vec::new();

        if let Some(trends) = &data.trends {
            insights.extend(self.trend_insights(trends));
        }
        if let Some(social) = &data.social {
            insights.extend(self.social_insights(social));
        }
        if let Some(video) = &data.video {
            insights.extend(self.video_insights(video));
        }
        if let Some(analytics) = &data.analytics {
            insights.extend(self.intent_insights(analytics));
        }
        insights.extend(self.cross_source_insights(data));
        if let Some(budget) = &data.budget {
            insights.extend(self.budget_insights(budget));
        }

        let produced = insights.len();
        insights.retain(|i| i.confidence >= self.config.min_confidence);
        // `sort_by` is stable: ties keep generator order.
        insights.sort_by(|a, b| {
            b.impact_score
                .partial_cmp(&a.impact_score)
                .unwrap_or(Ordering::Equal)
        });
        insights.truncate(self.config.max_insights);
        tracing::debug!(produced, kept = insights.len(), "generated insights");
        insights
    }

    /// Insights from search-trends data.
    pub fn trend_insights(&self, trends: &TrendsData) -> Vec<Insight> {
        let keywords = &trends.keywords;
        let Some(top) = keywords.first() else {
            return Vec::new();
        };
        let mut insights = Vec::new();

        insights.push(Insight {
            id: "trend_top_keyword",
            kind: InsightKind::Trend,
            priority: Priority::High,
            title: format!("\"{}\" leads search interest", top.keyword),
            description: format!(
                "Interest of {}/100 with {} growth",
                top.average_interest,
                top.growth_3m.as_deref().unwrap_or("n/a"),
            ),
            action: "Increase investment in this keyword in search ads".to_string(),
            confidence: 0.85,
            impact_score: top.average_interest * 0.1,
            source: "Google Trends",
            detail: Some(InsightDetail::Metric {
                value: top.average_interest,
                change: top.growth_3m.clone(),
            }),
        });

        let rising: Vec<&TrendKeyword> = keywords
            .iter()
            .filter(|k| {
                k.trend.as_deref() == Some("rising")
                    && parse_growth(k.growth_3m.as_deref()).is_some_and(|g| g > 20)
            })
            .collect();
        if !rising.is_empty() {
            let avg_growth = rising
                .iter()
                .map(|k| parse_growth(k.growth_3m.as_deref()).unwrap_or(0) as f64)
                .sum::<f64>()
                / rising.len() as f64;
            insights.push(Insight {
                id: "trend_rising",
                kind: InsightKind::Trend,
                priority: if avg_growth > 30.0 {
                    Priority::High
                } else {
                    Priority::Medium
                },
                title: format!("{} keywords on a rising trend", rising.len()),
                description: format!(
                    "Average growth of +{avg_growth:.0}% over the last 3 months"
                ),
                action: "Create content targeting these emerging keywords".to_string(),
                confidence: 0.80,
                impact_score: avg_growth * 0.2,
                source: "Google Trends",
                detail: Some(InsightDetail::Keywords(
                    rising.iter().take(3).map(|k| k.keyword.clone()).collect(),
                )),
            });
        }

        let mut regions: Vec<(&String, f64)> =
            top.top_regions.iter().map(|(r, &s)| (r, s)).collect();
        regions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        regions.truncate(3);
        if let Some(&(region, share)) = regions.first() {
            if share > 70.0 {
                insights.push(Insight {
                    id: "trend_regional",
                    kind: InsightKind::Trend,
                    priority: Priority::Medium,
                    title: format!("Regional concentration in {region}"),
                    description: format!("{share}% of interest comes from {region}"),
                    action: "Consider geo-segmented campaigns".to_string(),
                    confidence: 0.75,
                    impact_score: 6.0,
                    source: "Google Trends",
                    detail: Some(InsightDetail::Regions(
                        regions
                            .iter()
                            .map(|&(r, s)| RegionScore {
                                region: r.clone(),
                                score: s,
                            })
                            .collect(),
                    )),
                });
            }
        }

        insights
    }

    /// Insights from social-listening data.
    pub fn social_insights(&self, social: &SocialData) -> Vec<Insight> {
        let topics = &social.aggregated_topics;
        if topics.is_empty() {
            return Vec::new();
        }
        let mut insights = Vec::new();

        // Top topic by engagement (first attaining the maximum).
        let top = topics
            .iter()
            .filter(|t| t.engagement_score > 0.0)
            .fold(None::<&SocialTopic>, |best, t| match best {
                Some(b) if b.engagement_score >= t.engagement_score => Some(b),
                _ => Some(t),
            });
        if let Some(top) = top {
            if top.engagement_score > 5.0 {
                insights.push(Insight {
                    id: "social_top_topic",
                    kind: InsightKind::Social,
                    priority: if top.engagement_score > 7.0 {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                    title: format!("\"{}\" drives high engagement", top.topic),
                    description: format!(
                        "Score of {}/10 with {} mentions",
                        top.engagement_score, top.mentions,
                    ),
                    action: "Amplify content related to this topic".to_string(),
                    confidence: 0.75,
                    impact_score: top.engagement_score,
                    source: "Social Listening",
                    detail: top.sentiment.clone().map(InsightDetail::Sentiment),
                });
            }
        }

        let positive = topics
            .iter()
            .filter(|t| is_positive_sentiment(t.sentiment.as_deref()))
            .count();
        let sentiment_ratio = positive as f64 / topics.len() as f64;
        if sentiment_ratio < 0.5 && topics.len() > 3 {
            insights.push(Insight {
                id: "social_sentiment_warning",
                kind: InsightKind::Social,
                priority: Priority::High,
                title: "Social sentiment needs attention".to_string(),
                description: format!(
                    "Only {:.0}% of topics show positive sentiment",
                    sentiment_ratio * 100.0,
                ),
                action: "Investigate drivers of negative perception and activate PR"
                    .to_string(),
                confidence: 0.70,
                impact_score: 8.0,
                source: "Social Listening",
                detail: None,
            });
        } else if sentiment_ratio > 0.7 {
            insights.push(Insight {
                id: "social_sentiment_positive",
                kind: InsightKind::Social,
                priority: Priority::Medium,
                title: "Social sentiment is favorable".to_string(),
                description: format!(
                    "{:.0}% of topics show positive sentiment",
                    sentiment_ratio * 100.0,
                ),
                action: "Capitalize on the moment with testimonials and user content"
                    .to_string(),
                confidence: 0.75,
                impact_score: 6.0,
                source: "Social Listening",
                detail: None,
            });
        }

        if let Some(token) = &self.config.brand_token {
            let needle = token.to_lowercase();
            let brand_topics = topics
                .iter()
                .filter(|t| {
                    t.top_brands
                        .iter()
                        .any(|b| b.to_lowercase().contains(&needle))
                })
                .count();
            if brand_topics > 0 {
                insights.push(Insight {
                    id: "social_brand_presence",
                    kind: InsightKind::Social,
                    priority: Priority::Medium,
                    title: format!(
                        "{token} present in {brand_topics}/{} conversations",
                        topics.len(),
                    ),
                    description: format!(
                        "The brand appears in {:.0}% of monitored topics",
                        brand_topics as f64 / topics.len() as f64 * 100.0,
                    ),
                    action: if brand_topics * 2 < topics.len() {
                        "Grow share of voice in topics where the brand is absent".to_string()
                    } else {
                        "Maintain presence and monitor competitors".to_string()
                    },
                    confidence: 0.80,
                    impact_score: 5.0,
                    source: "Social Listening",
                    detail: None,
                });
            }
        }

        insights
    }

    /// Insights from video-platform trend data.
    pub fn video_insights(&self, video: &VideoData) -> Vec<Insight> {
        let Some(trends) = &video.trends else {
            return Vec::new();
        };

        // A present-but-empty hashtag list is itself a signal.
        let Some(top) = trends.hashtags.first() else {
            return vec![Insight {
                id: "video_no_data",
                kind: InsightKind::Video,
                priority: Priority::Low,
                title: "No video platform trends for the region".to_string(),
                description: "The trends source returned no trending hashtags for the configured region"
                    .to_string(),
                action: "Consider wider regional trend analysis or build on global trends"
                    .to_string(),
                confidence: 0.90,
                impact_score: 3.0,
                source: "Video Trends",
                detail: None,
            }];
        };

        vec![Insight {
            id: "video_top_hashtag",
            kind: InsightKind::Video,
            priority: Priority::Medium,
            title: format!("{} leads on the video platform", top.hashtag),
            description: format!(
                "{} views and {} posts",
                top.views.as_deref().unwrap_or("0"),
                top.posts.as_deref().unwrap_or("0"),
            ),
            action: "Create content using this trending hashtag".to_string(),
            confidence: 0.75,
            impact_score: top.relevance_score.unwrap_or(50.0) / 10.0,
            source: "Video Trends",
            detail: top.growth.clone().map(InsightDetail::Growth),
        }]
    }

    /// Insights from web-analytics data (visitor intent).
    pub fn intent_insights(&self, analytics: &AnalyticsData) -> Vec<Insight> {
        let mut insights = Vec::new();

        if let Some(overview) = &analytics.overview {
            if overview.conversion_rate > 0.0 {
                let rate_pct = overview.conversion_rate * 100.0;
                insights.push(Insight {
                    id: "intent_conversion_rate",
                    kind: InsightKind::Intent,
                    priority: if rate_pct > 5.0 {
                        Priority::Medium
                    } else {
                        Priority::High
                    },
                    title: format!("Conversion rate: {rate_pct:.1}%"),
                    description: format!(
                        "{} conversions from {} users",
                        overview.conversions, overview.total_users,
                    ),
                    action: if rate_pct < 5.0 {
                        "Optimize landing pages and CTAs to lift conversion".to_string()
                    } else {
                        "Keep the current strategy and scale traffic".to_string()
                    },
                    confidence: 0.85,
                    impact_score: if rate_pct > 5.0 { 7.0 } else { 9.0 },
                    source: "Web Analytics",
                    detail: Some(InsightDetail::Metric {
                        value: rate_pct,
                        change: None,
                    }),
                });
            }
        }

        if let Some(top) = analytics.top_pages.first() {
            insights.push(Insight {
                id: "intent_top_page",
                kind: InsightKind::Intent,
                priority: Priority::Medium,
                title: format!("{} is the most visited page", top.page),
                description: format!(
                    "{} views with {:.1}% conversion",
                    top.views,
                    top.conversion_rate * 100.0,
                ),
                action: "Analyze what makes this page successful and replicate it".to_string(),
                confidence: 0.80,
                impact_score: 6.0,
                source: "Web Analytics",
                detail: None,
            });
        }

        insights
    }

    /// Overlap between trend keywords and social topics.
    ///
    /// A keyword overlaps when its first whitespace-delimited token appears
    /// (case-insensitive substring) in any social topic. Any overlap emits
    /// exactly one `multi_source` insight.
    pub fn cross_source_insights(&self, data: &SourceData) -> Vec<Insight> {
        let keywords: Vec<String> = data
            .trends
            .iter()
            .flat_map(|t| t.keywords.iter())
            .map(|k| k.keyword.to_lowercase())
            .collect();
        let topics: Vec<String> = data
            .social
            .iter()
            .flat_map(|s| s.aggregated_topics.iter())
            .map(|t| t.topic.to_lowercase())
            .collect();

        let overlapping: Vec<String> = keywords
            .into_iter()
            .filter(|kw| {
                kw.split_whitespace()
                    .next()
                    .is_some_and(|token| topics.iter().any(|t| t.contains(token)))
            })
            .collect();
        if overlapping.is_empty() {
            return Vec::new();
        }

        vec![Insight {
            id: "cross_source_alignment",
            kind: InsightKind::MultiSource,
            priority: Priority::High,
            title: "Alignment between search and social conversation".to_string(),
            description: format!(
                "{} topics appear both in search trends and in social conversation",
                overlapping.len(),
            ),
            action: "Prioritize these topics in the content strategy".to_string(),
            confidence: 0.85,
            impact_score: 8.0,
            source: "Multi-Source Analysis",
            detail: Some(InsightDetail::Keywords(
                overlapping.into_iter().take(3).collect(),
            )),
        }]
    }

    /// Budget insight from the wrapped optimizer.
    ///
    /// Replays `historical` into the posterior, compares the current split
    /// against the recommended one, and emits one insight for the
    /// top-impact shift (if any clears the significance threshold).
    pub fn budget_insights(&mut self, budget: &BudgetData) -> Vec<Insight> {
        if !budget.historical.is_empty() {
            self.optimizer.batch_update(&budget.historical);
        }

        let current = budget
            .current
            .clone()
            .unwrap_or_else(default_current_split);
        let total = budget.total.unwrap_or(DEFAULT_TOTAL_BUDGET);
        let recommendations = self.optimizer.recommendations(&current, total);

        let Some(top) = recommendations.first() else {
            return Vec::new();
        };

        let verb = match top.direction {
            ShiftDirection::Increase => "Increase",
            ShiftDirection::Decrease => "Reduce",
        };
        vec![Insight {
            id: "budget_optimization",
            kind: InsightKind::Budget,
            priority: if top.change.abs() > 5.0 {
                Priority::High
            } else {
                Priority::Medium
            },
            title: format!("Optimization detected: {}", top.channel),
            description: format!(
                "{verb} share from {:.1}% to {:.1}%",
                top.from_pct, top.to_pct,
            ),
            action: top.reason.clone(),
            confidence: if top.confidence == ConfidenceTier::High {
                0.85
            } else {
                0.70
            },
            impact_score: top.change.abs() / 2.0,
            source: "Budget Optimizer",
            detail: Some(InsightDetail::Recommendations(
                recommendations.iter().take(3).cloned().collect(),
            )),
        }]
    }
}
