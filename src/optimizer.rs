//! Thompson-sampling budget optimizer.
//!
//! Each marketing channel is one arm of a Beta-Bernoulli bandit. The
//! posterior starts at the uniform prior Beta(1, 1); conversions add success
//! pseudo-counts, spend without conversion adds failure pseudo-counts scaled
//! by spend units. Two views come out of the same posterior:
//!
//! - [`BudgetOptimizer::select_channel`]: the stochastic explore/exploit
//!   policy (sample every posterior, take the max).
//! - [`BudgetOptimizer::recommended_allocation`]: the deterministic exploit
//!   view (allocate proportionally to posterior means).
//!
//! The optimizer is **seedable** and deterministic by default (seed 0), so
//! selections and simulations can be replayed exactly in tests.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sampling::{beta_sample, SeededUniform, UniformSource};

/// Spend units assumed when a caller reports a reward without an explicit
/// spend figure.
pub const DEFAULT_SPEND: f64 = 100.0;

/// Minimum percentage-point shift worth recommending; smaller diffs are
/// noise-level churn and are suppressed.
pub const SIGNIFICANT_SHIFT_PCT: f64 = 3.0;

/// How much evidence backs a channel's posterior.
///
/// Tiers are cut on total pseudo-observations (`alpha + beta`): fewer than 5
/// is `Low`, fewer than 20 is `Medium`, anything more is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

/// Beta posterior for one channel's conversion probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaPosterior {
    /// Success pseudo-count. Always `> 0`.
    pub alpha: f64,
    /// Failure pseudo-count. Always `> 0`.
    pub beta: f64,
}

impl BetaPosterior {
    /// The uniform prior Beta(1, 1).
    pub fn uniform_prior() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Posterior mean `alpha / (alpha + beta)`.
    ///
    /// The denominator cannot be zero: both parameters start at 1 and only
    /// increase.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Closed-form Beta variance.
    pub fn variance(&self) -> f64 {
        let n = self.alpha + self.beta;
        (self.alpha * self.beta) / (n * n * (n + 1.0))
    }

    /// Observations beyond the two-unit prior.
    pub fn total_observations(&self) -> f64 {
        self.alpha + self.beta - 2.0
    }

    /// Evidence tier for this posterior.
    pub fn confidence_tier(&self) -> ConfidenceTier {
        let total = self.alpha + self.beta;
        if total < 5.0 {
            ConfidenceTier::Low
        } else if total < 20.0 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::High
        }
    }
}

/// One batch-replay record: aggregated results for a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub channel: String,
    /// Conversions attributed to the channel. Each one is a success.
    pub conversions: u64,
    /// Money spent on the channel over the same window.
    pub spend: f64,
    /// When the window closed, if the upstream source knows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Audit record appended on every [`BudgetOptimizer::update_reward`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub timestamp: DateTime<Utc>,
    pub channel: String,
    pub converted: bool,
    pub spend: f64,
    /// Posterior alpha after this update.
    pub alpha: f64,
    /// Posterior beta after this update.
    pub beta: f64,
}

/// Derived per-channel share of a budget. Not stored; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Share of the total budget, rounded to one decimal.
    pub percentage: f64,
    /// Absolute amount, rounded to whole budget units.
    pub amount: f64,
    /// Posterior mean as a percentage.
    pub expected_roi: f64,
    pub confidence: ConfidenceTier,
}

/// Direction of a recommended budget shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Increase,
    Decrease,
}

/// One explainable reallocation recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub channel: String,
    pub direction: ShiftDirection,
    /// Current share in percent.
    pub from_pct: f64,
    /// Recommended share in percent.
    pub to_pct: f64,
    /// Signed percentage-point shift (`to_pct - from_pct`).
    pub change: f64,
    /// Budget units affected by the shift.
    pub impact: f64,
    pub confidence: ConfidenceTier,
    pub reason: String,
}

/// Monte Carlo probability-of-being-best estimate per channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub simulations: u32,
    /// Percentage of simulations each channel won (posterior argmax).
    pub best_channel_wins: BTreeMap<String, f64>,
}

/// Snapshot of optimizer state for external persistence.
///
/// This is the only on-the-wire/on-disk shape of optimizer state. The
/// history length is informational and is not restored on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerState {
    pub channels: Vec<String>,
    pub alpha: BTreeMap<String, f64>,
    pub beta: BTreeMap<String, f64>,
    #[serde(default)]
    pub history_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

/// Per-channel summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub alpha: f64,
    pub beta: f64,
    /// Posterior mean as a percentage.
    pub expected_roi: f64,
    /// Posterior standard deviation.
    pub uncertainty: f64,
    pub confidence: ConfidenceTier,
    /// Pseudo-observations beyond the prior.
    pub total_observations: f64,
}

/// Seedable Thompson-sampling optimizer over marketing channels.
///
/// Channels are fixed at construction and live for the optimizer's lifetime;
/// updates for unknown channels are silently ignored. Not internally locked:
/// one instance is owned by one caller at a time.
pub struct BudgetOptimizer {
    channels: Vec<String>,
    posteriors: BTreeMap<String, BetaPosterior>,
    history: Vec<RewardEvent>,
    rng: Box<dyn UniformSource>,
}

impl fmt::Debug for BudgetOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BudgetOptimizer")
            .field("channels", &self.channels)
            .field("posteriors", &self.posteriors)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for BudgetOptimizer {
    /// The four channels of the original marketing stack.
    fn default() -> Self {
        Self::new(["google_search", "meta_ads", "youtube", "display"])
    }
}

impl BudgetOptimizer {
    /// Create an optimizer with the deterministic default seed (0).
    pub fn new<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_source(channels, Box::new(SeededUniform::new()))
    }

    /// Create with an explicit RNG seed (reproducible).
    pub fn with_seed<I, S>(channels: I, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_source(channels, Box::new(SeededUniform::with_seed(seed)))
    }

    /// Create with a caller-supplied uniform source.
    pub fn with_source<I, S>(channels: I, rng: Box<dyn UniformSource>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared: Vec<String> = Vec::new();
        let mut posteriors = BTreeMap::new();
        for ch in channels {
            let ch = ch.into();
            if posteriors
                .insert(ch.clone(), BetaPosterior::uniform_prior())
                .is_none()
            {
                declared.push(ch);
            }
        }
        Self {
            channels: declared,
            posteriors,
            history: Vec::new(),
            rng,
        }
    }

    /// Channels in declared order.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Posterior for one channel, if known.
    pub fn posterior(&self, channel: &str) -> Option<&BetaPosterior> {
        self.posteriors.get(channel)
    }

    /// Reward audit history, oldest first. Unbounded; pruning is a caller
    /// concern.
    pub fn history(&self) -> &[RewardEvent] {
        &self.history
    }

    /// Thompson Sampling arm choice: draw one posterior sample per channel
    /// and return the channel with the maximum sample.
    ///
    /// Tie-break: the first channel attaining the maximum in declared order.
    /// Returns `None` when no channels exist.
    pub fn select_channel(&mut self) -> Option<&str> {
        let mut best_idx: Option<usize> = None;
        let mut best_sample = f64::NEG_INFINITY;
        for i in 0..self.channels.len() {
            let p = self.posteriors[&self.channels[i]];
            let x = beta_sample(self.rng.as_mut(), p.alpha, p.beta);
            if x > best_sample {
                best_sample = x;
                best_idx = Some(i);
            }
        }
        best_idx.map(|i| self.channels[i].as_str())
    }

    /// Update one channel's posterior from an observed reward.
    ///
    /// - Conversion: `alpha += 1`.
    /// - No conversion: `beta += spend / 100` — failure evidence scales with
    ///   money spent without result.
    ///
    /// Unknown channels are a silent no-op. Appends a [`RewardEvent`] to the
    /// in-memory history. Callers without a spend figure pass
    /// [`DEFAULT_SPEND`].
    pub fn update_reward(&mut self, channel: &str, converted: bool, spend: f64) {
        let Some(p) = self.posteriors.get_mut(channel) else {
            tracing::debug!(channel, "ignoring reward update for unknown channel");
            return;
        };
        if converted {
            p.alpha += 1.0;
        } else {
            p.beta += spend / 100.0;
        }
        let (alpha, beta) = (p.alpha, p.beta);
        self.history.push(RewardEvent {
            timestamp: Utc::now(),
            channel: channel.to_string(),
            converted,
            spend,
            alpha,
            beta,
        });
    }

    /// Replay a batch of aggregated observations.
    ///
    /// Per observation: `alpha += conversions` and
    /// `beta += max(0, spend/100 - conversions)` — the floor prevents
    /// negative pseudo-counts when conversions exceed modeled spend units.
    /// Unknown channels are skipped.
    pub fn batch_update(&mut self, observations: &[Observation]) {
        for obs in observations {
            let Some(p) = self.posteriors.get_mut(&obs.channel) else {
                tracing::debug!(channel = %obs.channel, "skipping observation for unknown channel");
                continue;
            };
            let conversions = obs.conversions as f64;
            p.alpha += conversions;
            p.beta += (obs.spend / 100.0 - conversions).max(0.0);
        }
        tracing::debug!(count = observations.len(), "replayed observation batch");
    }

    /// Exploit view: allocate `total_budget` proportionally to posterior
    /// means.
    ///
    /// Percentages are rounded to one decimal and sum to 100 up to rounding;
    /// amounts are rounded to whole budget units.
    pub fn recommended_allocation(&self, total_budget: f64) -> BTreeMap<String, Allocation> {
        let mut expected: Vec<(usize, f64)> = Vec::with_capacity(self.channels.len());
        let mut total_expected = 0.0;
        for (i, ch) in self.channels.iter().enumerate() {
            let ev = self.posteriors[ch].mean();
            total_expected += ev;
            expected.push((i, ev));
        }

        let mut out = BTreeMap::new();
        if total_expected <= 0.0 {
            return out;
        }
        for (i, ev) in expected {
            let ch = &self.channels[i];
            let p = &self.posteriors[ch];
            let share = ev / total_expected;
            out.insert(
                ch.clone(),
                Allocation {
                    percentage: (share * 100.0 * 10.0).round() / 10.0,
                    amount: (total_budget * share).round(),
                    expected_roi: ev * 100.0,
                    confidence: p.confidence_tier(),
                },
            );
        }
        out
    }

    /// Compare a current percentage split against the recommended one and
    /// emit shift recommendations.
    ///
    /// Only shifts of at least [`SIGNIFICANT_SHIFT_PCT`] percentage points
    /// are emitted. Channels absent from `current` count as 0%. Sorted
    /// descending by impact (stable in declared channel order on ties).
    pub fn recommendations(
        &self,
        current: &BTreeMap<String, f64>,
        total_budget: f64,
    ) -> Vec<Recommendation> {
        let recommended = self.recommended_allocation(total_budget);
        let mut out = Vec::new();

        for ch in &self.channels {
            let Some(alloc) = recommended.get(ch) else {
                continue;
            };
            let from_pct = current.get(ch).copied().unwrap_or(0.0);
            let diff = alloc.percentage - from_pct;
            if diff.abs() < SIGNIFICANT_SHIFT_PCT {
                continue;
            }
            let direction = if diff > 0.0 {
                ShiftDirection::Increase
            } else {
                ShiftDirection::Decrease
            };
            let reason = match direction {
                ShiftDirection::Increase => format!(
                    "{ch} shows superior ROI ({:.1}%)",
                    alloc.expected_roi
                ),
                ShiftDirection::Decrease => format!("{ch} shows lower effectiveness"),
            };
            out.push(Recommendation {
                channel: ch.clone(),
                direction,
                from_pct,
                to_pct: alloc.percentage,
                change: diff,
                impact: diff.abs() * total_budget / 100.0,
                confidence: alloc.confidence,
                reason,
            });
        }

        out.sort_by(|a, b| b.impact.partial_cmp(&a.impact).unwrap_or(std::cmp::Ordering::Equal));
        tracing::debug!(count = out.len(), "built shift recommendations");
        out
    }

    /// Monte Carlo diagnostic: how often each channel wins the posterior
    /// argmax across `simulations` draws, as percentages.
    pub fn simulate_scenarios(&mut self, simulations: u32) -> ScenarioResults {
        let mut wins: BTreeMap<String, u64> = self
            .channels
            .iter()
            .map(|ch| (ch.clone(), 0u64))
            .collect();

        for _ in 0..simulations {
            let mut best_idx: Option<usize> = None;
            let mut best_sample = f64::NEG_INFINITY;
            for i in 0..self.channels.len() {
                let p = self.posteriors[&self.channels[i]];
                let x = beta_sample(self.rng.as_mut(), p.alpha, p.beta);
                if x > best_sample {
                    best_sample = x;
                    best_idx = Some(i);
                }
            }
            if let Some(w) = best_idx.and_then(|i| wins.get_mut(&self.channels[i])) {
                *w += 1;
            }
        }

        let best_channel_wins = wins
            .into_iter()
            .map(|(ch, w)| {
                let pct = if simulations == 0 {
                    0.0
                } else {
                    (w as f64 / simulations as f64 * 100.0 * 10.0).round() / 10.0
                };
                (ch, pct)
            })
            .collect();

        ScenarioResults {
            simulations,
            best_channel_wins,
        }
    }

    /// Snapshot channels and posteriors for external persistence.
    pub fn export_state(&self) -> OptimizerState {
        let mut alpha = BTreeMap::new();
        let mut beta = BTreeMap::new();
        for (ch, p) in &self.posteriors {
            alpha.insert(ch.clone(), p.alpha);
            beta.insert(ch.clone(), p.beta);
        }
        OptimizerState {
            channels: self.channels.clone(),
            alpha,
            beta,
            history_length: self.history.len(),
            exported_at: Some(Utc::now()),
        }
    }

    /// Restore channels and posteriors from a snapshot.
    ///
    /// Non-finite or non-positive parameters in the snapshot are reset to
    /// the prior value 1.0, so `alpha, beta > 0` holds for every reachable
    /// state. History is not restored.
    pub fn import_state(&mut self, state: &OptimizerState) {
        fn sane(x: Option<&f64>) -> f64 {
            match x {
                Some(&v) if v.is_finite() && v > 0.0 => v,
                _ => 1.0,
            }
        }

        self.channels = state.channels.clone();
        self.posteriors = self
            .channels
            .iter()
            .map(|ch| {
                (
                    ch.clone(),
                    BetaPosterior {
                        alpha: sane(state.alpha.get(ch)),
                        beta: sane(state.beta.get(ch)),
                    },
                )
            })
            .collect();
    }

    /// Per-channel summary: posterior parameters, closed-form mean and
    /// standard deviation, tier, and observation count.
    pub fn summary(&self) -> BTreeMap<String, ChannelSummary> {
        self.channels
            .iter()
            .map(|ch| {
                let p = &self.posteriors[ch];
                (
                    ch.clone(),
                    ChannelSummary {
                        alpha: p.alpha,
                        beta: p.beta,
                        expected_roi: p.mean() * 100.0,
                        uncertainty: p.variance().sqrt(),
                        confidence: p.confidence_tier(),
                        total_observations: p.total_observations(),
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_channel() -> BudgetOptimizer {
        BudgetOptimizer::with_seed(["a", "b"], 7)
    }

    #[test]
    fn starts_at_uniform_prior() {
        let opt = two_channel();
        for ch in ["a", "b"] {
            let p = opt.posterior(ch).unwrap();
            assert_eq!(p.alpha, 1.0);
            assert_eq!(p.beta, 1.0);
        }
    }

    #[test]
    fn scenario_a_posteriors_and_allocation() {
        let mut opt = two_channel();
        for _ in 0..3 {
            opt.update_reward("a", true, DEFAULT_SPEND);
            opt.update_reward("b", false, 100.0);
        }
        let pa = opt.posterior("a").unwrap();
        let pb = opt.posterior("b").unwrap();
        assert_eq!((pa.alpha, pa.beta), (4.0, 1.0));
        assert_eq!((pb.alpha, pb.beta), (1.0, 4.0));

        let alloc = opt.recommended_allocation(1000.0);
        let a = &alloc["a"];
        let b = &alloc["b"];
        assert!((a.amount - 800.0).abs() <= 5.0, "a={}", a.amount);
        assert!((b.amount - 200.0).abs() <= 5.0, "b={}", b.amount);
        assert_eq!(a.percentage, 80.0);
        assert_eq!(b.percentage, 20.0);
    }

    #[test]
    fn unknown_channel_update_is_a_no_op() {
        let mut opt = two_channel();
        opt.update_reward("nope", true, 50.0);
        assert!(opt.history().is_empty());
        assert_eq!(opt.posterior("a").unwrap().alpha, 1.0);
    }

    #[test]
    fn update_reward_records_history() {
        let mut opt = two_channel();
        opt.update_reward("a", true, 40.0);
        opt.update_reward("a", false, 200.0);
        let h = opt.history();
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].channel, "a");
        assert!(h[0].converted);
        assert_eq!(h[1].alpha, 2.0);
        assert_eq!(h[1].beta, 3.0); // 1 + 200/100
    }

    #[test]
    fn batch_update_floors_failure_counts() {
        let mut opt = two_channel();
        // 5 conversions on 100 spend: 1 spend-unit - 5 conversions < 0.
        opt.batch_update(&[Observation {
            channel: "a".into(),
            conversions: 5,
            spend: 100.0,
            timestamp: None,
        }]);
        let p = opt.posterior("a").unwrap();
        assert_eq!(p.alpha, 6.0);
        assert_eq!(p.beta, 1.0, "failure floor must prevent decreases");
    }

    #[test]
    fn batch_update_skips_unknown_channels() {
        let mut opt = two_channel();
        opt.batch_update(&[Observation {
            channel: "ghost".into(),
            conversions: 3,
            spend: 500.0,
            timestamp: None,
        }]);
        assert_eq!(opt.posterior("a").unwrap().alpha, 1.0);
        assert!(opt.posterior("ghost").is_none());
    }

    #[test]
    fn select_channel_is_deterministic_for_a_seed() {
        let mut o1 = BudgetOptimizer::with_seed(["a", "b", "c"], 42);
        let mut o2 = BudgetOptimizer::with_seed(["a", "b", "c"], 42);
        for _ in 0..20 {
            assert_eq!(o1.select_channel(), o2.select_channel());
        }
    }

    #[test]
    fn select_channel_prefers_the_strong_arm() {
        let mut opt = two_channel();
        for _ in 0..50 {
            opt.update_reward("a", true, DEFAULT_SPEND);
            opt.update_reward("b", false, 100.0);
        }
        let mut a_wins = 0;
        for _ in 0..200 {
            if opt.select_channel() == Some("a") {
                a_wins += 1;
            }
        }
        assert!(a_wins > 180, "a_wins={a_wins}");
    }

    #[test]
    fn select_channel_empty_returns_none() {
        let mut opt = BudgetOptimizer::new(Vec::<String>::new());
        assert_eq!(opt.select_channel(), None);
    }

    #[test]
    fn allocation_percentages_sum_to_one_hundred() {
        let mut opt = BudgetOptimizer::with_seed(["a", "b", "c", "d"], 1);
        opt.update_reward("a", true, DEFAULT_SPEND);
        opt.update_reward("b", false, 300.0);
        opt.update_reward("c", true, DEFAULT_SPEND);
        let alloc = opt.recommended_allocation(23_000.0);
        let sum: f64 = alloc.values().map(|a| a.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum={sum}");
    }

    #[test]
    fn recommendations_suppress_insignificant_shifts() {
        let mut opt = two_channel();
        for _ in 0..3 {
            opt.update_reward("a", true, DEFAULT_SPEND);
            opt.update_reward("b", false, 100.0);
        }
        // Recommended is 80/20; current is within the 3pp threshold.
        let current = BTreeMap::from([("a".to_string(), 79.0), ("b".to_string(), 21.0)]);
        assert!(opt.recommendations(&current, 1000.0).is_empty());

        let current = BTreeMap::from([("a".to_string(), 50.0), ("b".to_string(), 50.0)]);
        let recs = opt.recommendations(&current, 1000.0);
        assert_eq!(recs.len(), 2);
        for r in &recs {
            assert!(r.change.abs() >= SIGNIFICANT_SHIFT_PCT);
        }
        // Sorted descending by impact.
        assert!(recs[0].impact >= recs[1].impact);
        assert_eq!(recs[0].direction, ShiftDirection::Increase);
        assert_eq!(recs[0].channel, "a");
        assert!((recs[0].impact - 300.0).abs() < 1e-9);
    }

    #[test]
    fn simulate_scenarios_percentages_cover_all_draws() {
        let mut opt = two_channel();
        for _ in 0..10 {
            opt.update_reward("a", true, DEFAULT_SPEND);
        }
        let results = opt.simulate_scenarios(1000);
        assert_eq!(results.simulations, 1000);
        let sum: f64 = results.best_channel_wins.values().sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum={sum}");
        assert!(results.best_channel_wins["a"] > results.best_channel_wins["b"]);
    }

    #[test]
    fn export_import_round_trips_posteriors_only() {
        let mut opt = two_channel();
        opt.update_reward("a", true, DEFAULT_SPEND);
        opt.update_reward("b", false, 250.0);
        let state = opt.export_state();
        assert_eq!(state.history_length, 2);

        let mut fresh = BudgetOptimizer::with_seed(["x"], 0);
        fresh.import_state(&state);
        assert_eq!(fresh.channels(), vec!["a", "b"]);
        assert_eq!(fresh.posterior("a").unwrap().alpha, 2.0);
        assert_eq!(fresh.posterior("b").unwrap().beta, 3.5);
        assert!(fresh.history().is_empty(), "history is not restored");
    }

    #[test]
    fn import_state_sanitizes_degenerate_parameters() {
        let state = OptimizerState {
            channels: vec!["a".into(), "b".into()],
            alpha: BTreeMap::from([("a".to_string(), -3.0)]),
            beta: BTreeMap::from([("a".to_string(), f64::NAN)]),
            history_length: 0,
            exported_at: None,
        };
        let mut opt = BudgetOptimizer::new(["a"]);
        opt.import_state(&state);
        let pa = opt.posterior("a").unwrap();
        let pb = opt.posterior("b").unwrap();
        assert_eq!((pa.alpha, pa.beta), (1.0, 1.0));
        assert_eq!((pb.alpha, pb.beta), (1.0, 1.0));
    }

    #[test]
    fn summary_reports_closed_form_statistics() {
        let mut opt = two_channel();
        for _ in 0..3 {
            opt.update_reward("a", true, DEFAULT_SPEND);
        }
        let summary = opt.summary();
        let a = &summary["a"];
        assert_eq!(a.alpha, 4.0);
        assert_eq!(a.beta, 1.0);
        assert!((a.expected_roi - 80.0).abs() < 1e-9);
        assert_eq!(a.total_observations, 3.0);
        assert_eq!(a.confidence, ConfidenceTier::Medium);
        // sqrt(4*1 / (25 * 6))
        assert!((a.uncertainty - (4.0 / 150.0f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn state_snapshot_serializes_with_expected_shape() {
        let opt = two_channel();
        let json = serde_json::to_value(opt.export_state()).unwrap();
        assert_eq!(json["channels"], serde_json::json!(["a", "b"]));
        assert_eq!(json["alpha"]["a"], serde_json::json!(1.0));
        assert_eq!(json["beta"]["b"], serde_json::json!(1.0));
    }

    proptest! {
        #[test]
        fn posteriors_stay_positive_under_any_update_sequence(
            ops in proptest::collection::vec(
                (0usize..3, any::<bool>(), 0.0f64..10_000.0, 0u64..50),
                0..200,
            ),
        ) {
            let mut opt = BudgetOptimizer::with_seed(["a", "b", "c"], 11);
            for (idx, converted, spend, conversions) in ops {
                let ch = ["a", "b", "c"][idx];
                if converted {
                    opt.update_reward(ch, true, spend);
                } else {
                    opt.batch_update(&[Observation {
                        channel: ch.to_string(),
                        conversions,
                        spend,
                        timestamp: None,
                    }]);
                }
            }
            for ch in ["a", "b", "c"] {
                let p = opt.posterior(ch).unwrap();
                prop_assert!(p.alpha > 0.0);
                prop_assert!(p.beta > 0.0);
            }
        }

        #[test]
        fn allocation_sums_to_one_hundred_for_any_budget(
            budget in 1.0f64..1_000_000.0,
            rewards in proptest::collection::vec((0usize..4, any::<bool>()), 0..60),
        ) {
            let mut opt = BudgetOptimizer::with_seed(["a", "b", "c", "d"], 5);
            for (idx, converted) in rewards {
                opt.update_reward(["a", "b", "c", "d"][idx], converted, DEFAULT_SPEND);
            }
            let alloc = opt.recommended_allocation(budget);
            let sum: f64 = alloc.values().map(|a| a.percentage).sum();
            prop_assert!((sum - 100.0).abs() <= 0.5, "sum={}", sum);
        }

        #[test]
        fn recommendations_never_emit_sub_threshold_shifts(
            current_a in 0.0f64..100.0,
            rewards in proptest::collection::vec((0usize..2, any::<bool>()), 0..40),
        ) {
            let mut opt = BudgetOptimizer::with_seed(["a", "b"], 9);
            for (idx, converted) in rewards {
                opt.update_reward(["a", "b"][idx], converted, DEFAULT_SPEND);
            }
            let current = BTreeMap::from([
                ("a".to_string(), current_a),
                ("b".to_string(), 100.0 - current_a),
            ]);
            for rec in opt.recommendations(&current, 10_000.0) {
                prop_assert!(rec.change.abs() >= SIGNIFICANT_SHIFT_PCT);
            }
        }
    }
}
