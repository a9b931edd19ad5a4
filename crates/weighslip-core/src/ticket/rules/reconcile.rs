//! Weight reconciliation: triple search, heuristic gap filling and
//! arithmetic completion.
//!
//! Each function takes the weights found so far and returns a new set;
//! none of them overwrites a role that is already set.

use tracing::debug;

use crate::models::{WeightRole, Weights};

/// Deduplicated, ascending candidate pool.
pub fn candidate_pool(values: impl IntoIterator<Item = u32>) -> Vec<u32> {
    let mut pool: Vec<u32> = values.into_iter().collect();
    pool.sort_unstable();
    pool.dedup();
    pool
}

fn agrees(pinned: Option<u32>, value: u32) -> bool {
    pinned.is_none_or(|p| p == value)
}

/// Search for `gross = tare + net` among the candidates and known values.
///
/// Gross is tried largest first, tare smallest first; the first triple
/// whose net is also in the pool and that agrees with every pinned role
/// wins. Returns `known` unchanged when no triple exists.
pub fn resolve_triple(known: Weights, candidates: &[u32]) -> Weights {
    let pool = candidate_pool(candidates.iter().copied().chain(known.known_values()));

    for &gross in pool.iter().rev() {
        for &tare in &pool {
            if tare >= gross {
                break;
            }

            let net = gross - tare;
            if pool.binary_search(&net).is_err() {
                continue;
            }

            if !agrees(known.gross, gross) || !agrees(known.tare, tare) || !agrees(known.net, net) {
                continue;
            }

            debug!("Consistent triple: gross={} tare={} net={}", gross, tare, net);
            return known.merge(Weights::new(Some(gross), Some(tare), Some(net)));
        }
    }

    debug!("No consistent triple in pool of {}", pool.len());
    known
}

/// Fill remaining roles from the candidate pool by ordered heuristics.
///
/// The value currently held as net is excluded from `pool` first.
pub fn fill_heuristics(weights: Weights, pool: &[u32]) -> Weights {
    let remaining = candidate_pool(pool.iter().copied().filter(|v| Some(*v) != weights.net));
    let mut weights = weights;

    if weights.gross.is_none() {
        if let Some(&max) = remaining.last() {
            debug!("Gross from largest candidate: {}", max);
            weights = weights.with(WeightRole::Gross, max);
        }
    }

    if weights.tare.is_none() {
        if let (Some(gross), Some(net)) = (weights.gross, weights.net) {
            if let Some(&between) = remaining.iter().find(|&&v| v > net && v < gross) {
                debug!("Tare from candidate between net and gross: {}", between);
                weights = weights.with(WeightRole::Tare, between);
            }
        }
    }

    if weights.tare.is_none() && remaining.len() >= 2 {
        debug!("Tare from smallest candidate: {}", remaining[0]);
        weights = weights.with(WeightRole::Tare, remaining[0]);
    }

    weights
}

/// Derive a missing tare or net by subtraction when the result is positive.
pub fn complete_arithmetic(weights: Weights) -> Weights {
    let mut weights = weights;

    if let (None, Some(gross), Some(net)) = (weights.tare, weights.gross, weights.net) {
        if let Some(tare) = gross.checked_sub(net).filter(|t| *t > 0) {
            debug!("Tare by subtraction: {}", tare);
            weights = weights.with(WeightRole::Tare, tare);
        }
    }

    if let (None, Some(gross), Some(tare)) = (weights.net, weights.gross, weights.tare) {
        if let Some(net) = gross.checked_sub(tare).filter(|n| *n > 0) {
            debug!("Net by subtraction: {}", net);
            weights = weights.with(WeightRole::Net, net);
        }
    }

    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn w(gross: Option<u32>, tare: Option<u32>, net: Option<u32>) -> Weights {
        Weights::new(gross, tare, net)
    }

    #[test]
    fn test_candidate_pool_dedups_and_sorts() {
        assert_eq!(candidate_pool([7470, 12480, 5010, 7470]), vec![5010, 7470, 12480]);
    }

    #[test]
    fn test_resolve_unlabeled_triple() {
        let resolved = resolve_triple(Weights::default(), &[5010, 12480, 7470]);
        // largest gross, then smallest tare
        assert_eq!(resolved, w(Some(12480), Some(5010), Some(7470)));
        assert_eq!(resolved.is_consistent(), Some(true));
    }

    #[test]
    fn test_resolve_respects_pinned_roles() {
        let known = w(None, Some(7470), None);
        let resolved = resolve_triple(known, &[12480, 5010]);
        assert_eq!(resolved, w(Some(12480), Some(7470), Some(5010)));
    }

    #[test]
    fn test_resolve_prefers_largest_gross() {
        // 9000 = 4000 + 5000 also holds, but 12480 is tried first
        let resolved = resolve_triple(Weights::default(), &[4000, 5000, 9000, 7470, 5010, 12480]);
        assert_eq!(resolved.gross, Some(12480));
    }

    #[test]
    fn test_resolve_skips_triples_contradicting_pins() {
        let known = w(Some(9000), None, None);
        let resolved = resolve_triple(known, &[4000, 5000, 7470, 5010, 12480]);
        assert_eq!(resolved, w(Some(9000), Some(4000), Some(5000)));
    }

    #[test]
    fn test_resolve_without_triple_is_identity() {
        let known = w(Some(12480), None, Some(5010));
        assert_eq!(resolve_triple(known, &[5010]), known);
        assert_eq!(resolve_triple(Weights::default(), &[]), Weights::default());
    }

    #[test]
    fn test_fill_gross_from_max() {
        let filled = fill_heuristics(Weights::default(), &[300, 9000, 4100]);
        assert_eq!(filled.gross, Some(9000));
        assert_eq!(filled.tare, Some(300));
    }

    #[test]
    fn test_fill_tare_between_net_and_gross() {
        let filled = fill_heuristics(w(Some(12480), None, Some(5010)), &[100, 5010, 6000, 7000, 12480]);
        assert_eq!(filled.tare, Some(6000));
    }

    #[test]
    fn test_fill_tare_minimum_needs_two_candidates() {
        let filled = fill_heuristics(w(Some(12480), None, None), &[7000]);
        assert_eq!(filled.tare, None);

        let filled = fill_heuristics(w(Some(12480), None, None), &[7000, 9000]);
        assert_eq!(filled.tare, Some(7000));
    }

    #[test]
    fn test_fill_excludes_current_net() {
        let filled = fill_heuristics(w(None, None, Some(9000)), &[9000, 4000]);
        assert_eq!(filled.gross, Some(4000));
        assert_eq!(filled.tare, None);
    }

    #[test]
    fn test_complete_arithmetic() {
        assert_eq!(
            complete_arithmetic(w(Some(12480), None, Some(5010))),
            w(Some(12480), Some(7470), Some(5010))
        );
        assert_eq!(
            complete_arithmetic(w(Some(12480), Some(7470), None)),
            w(Some(12480), Some(7470), Some(5010))
        );
    }

    #[test]
    fn test_complete_arithmetic_rejects_non_positive() {
        let same = w(Some(5000), None, Some(5000));
        assert_eq!(complete_arithmetic(same), same);

        let inverted = w(Some(5000), Some(7000), None);
        assert_eq!(complete_arithmetic(inverted), inverted);
    }

    #[test]
    fn test_filling_complete_record_is_idempotent() {
        let complete = w(Some(12480), Some(7470), Some(5010));
        let pool = [100, 5010, 6000, 7470, 12480, 20000];

        assert_eq!(fill_heuristics(complete, &pool), complete);
        assert_eq!(complete_arithmetic(complete), complete);
        assert_eq!(resolve_triple(complete, &pool), complete);
    }
}
