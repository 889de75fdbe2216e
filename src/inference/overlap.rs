// Copyright (c) 2026 Bountyy Oy. All rights reserved.
//
// Overlap Guard
//
// After every numeric update, cases that map to different return values
// must stay more than two pooled standard deviations apart. Anything
// closer means the oracle can no longer tell TRUE from FALSE.

use tracing::{debug, error};

use super::case_store::CaseStore;
use crate::errors::{OracleError, OracleResult};

/// Minimum separation in units of the pair's average stddev
pub const SEPARATION_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapGuard;

impl OverlapGuard {
    /// Check every pair of differently-valued cases.
    /// Cases sharing a return value may overlap freely.
    pub fn check<R: PartialEq>(&self, store: &CaseStore<R>) -> OracleResult<()> {
        let cases: Vec<_> = store.iter().collect();

        for (i, a) in cases.iter().enumerate() {
            for b in &cases[i + 1..] {
                if a.return_value() == b.return_value() {
                    continue;
                }
                let (Some(sa), Some(sb)) = (a.statistics(), b.statistics()) else {
                    continue;
                };

                let mean_gap = (sa.mean - sb.mean).abs();
                let avg_stddev = (sa.stddev + sb.stddev) / 2.0;

                if mean_gap <= SEPARATION_FACTOR * avg_stddev {
                    error!(
                        "Cases '{}' and '{}' overlap: |{:.3} - {:.3}| <= {} x {:.3}",
                        a.label(),
                        b.label(),
                        sa.mean,
                        sb.mean,
                        SEPARATION_FACTOR,
                        avg_stddev
                    );
                    return Err(OracleError::TrueFalseRangeOverlap {
                        first: a.label().to_string(),
                        second: b.label().to_string(),
                        mean_gap,
                        avg_stddev,
                    });
                }

                debug!(
                    "Cases '{}' and '{}' separated by {:.3} ({:.1} avg stddevs)",
                    a.label(),
                    b.label(),
                    mean_gap,
                    if avg_stddev > 0.0 { mean_gap / avg_stddev } else { f64::INFINITY }
                );
            }
        }

        Ok(())
    }
}
