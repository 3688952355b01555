//! `admux`: the budget decision engine of a marketing dashboard.
//!
//! Two cooperating pieces:
//!
//! - [`BudgetOptimizer`]: a Beta-Bernoulli Thompson-sampling bandit over
//!   marketing channels. Conversions and spend feed per-channel Beta
//!   posteriors; the optimizer exposes a stochastic arm choice
//!   ([`BudgetOptimizer::select_channel`]), a deterministic proportional
//!   allocation, explainable shift recommendations, Monte Carlo
//!   probability-of-best diagnostics, and a persistence snapshot.
//! - [`InsightGenerator`]: a deterministic rule engine over per-source JSON
//!   fragments (search trends, social listening, video-platform trends, web
//!   analytics, budget). Six independent sub-generators emit [`Insight`]
//!   records; the pipeline filters by confidence, stable-sorts by impact
//!   score, and truncates to a bound. The budget sub-generator drives the
//!   optimizer.
//!
//! **Goals:**
//! - **Deterministic by default**: every stochastic path runs through an
//!   injectable [`UniformSource`]; default construction uses a fixed seed,
//!   so same state + same seed → same decisions.
//! - **Fail-soft**: a missing or malformed source fragment contributes zero
//!   insights and never blocks the others; unknown channels are silent
//!   no-ops; no panics on library paths.
//! - **Explainable**: allocations, recommendations, and insights carry the
//!   evidence tier and reasoning they were derived from.
//!
//! **Non-goals:** ad-platform auction mechanics, live API integration,
//! scraping, persistence mechanics (only the snapshot shape is defined
//! here), and UI rendering (only the icon/color key contract).
//!
//! # Quick start
//!
//! ```rust
//! use admux::{BudgetOptimizer, DEFAULT_SPEND};
//!
//! let mut opt = BudgetOptimizer::with_seed(["search", "social"], 42);
//! opt.update_reward("search", true, DEFAULT_SPEND);
//! opt.update_reward("social", false, 200.0);
//!
//! let allocation = opt.recommended_allocation(10_000.0);
//! let pct: f64 = allocation.values().map(|a| a.percentage).sum();
//! assert!((pct - 100.0).abs() <= 0.5);
//! ```

#![forbid(unsafe_code)]

mod sampling;
pub use sampling::*;

mod optimizer;
pub use optimizer::*;

mod insights;
pub use insights::*;

mod display;
pub use display::*;
