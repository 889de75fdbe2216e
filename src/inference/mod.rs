// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Blind-Injection Oracle Inference Core
//
// Decides, from a noisy response signal, whether an injected condition
// was TRUE or FALSE (or which of several mapped values it produced)
// without ever seeing the answer directly.
//
// ## Model
//
// Every distinguishable response behavior is a *case*: a bounded window
// of recent signals tagged with the return value the caller associates
// with it. A new signal is matched against the cases by one of three
// strategies:
//
// - Strict: the exact value is already in a case's window
// - Numeric: midpoint boundaries between mean-sorted cases
// - Text similarity: the case holding the most similar stored body
//
// After each numeric update the overlap guard verifies that cases with
// different return values remain separated by more than two pooled
// standard deviations:
//
// ```
// |mean_a - mean_b| > 2 * (stddev_a + stddev_b) / 2
// ```
//
// ## Usage
//
// ```ignore
// let requester = Requester::new(config, transport, template)?;
// requester.make_request_as("1=1", "true", true).await?;
// requester.make_request_as("1=2", "false", false).await?;
//
// let bit = requester.make_request("ascii(substr(user,1,1))>64", false).await?;
// ```

pub mod case_store;
pub mod classifier;
pub mod overlap;
pub mod requester;
pub mod statistics;
pub mod window;

pub use case_store::{Case, CaseLabel, CaseStatistics, CaseStore};
pub use classifier::{
    select_classifier, similarity_ratio, Classifier, NumericClassifier, StrictClassifier,
    TextSimilarityClassifier,
};
pub use overlap::{OverlapGuard, SEPARATION_FACTOR};
pub use requester::{CaseSnapshot, Requester, RequesterSnapshot, RequesterState};
pub use window::{SampleWindow, DEFAULT_WINDOW_CAPACITY};
