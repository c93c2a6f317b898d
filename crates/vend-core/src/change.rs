//! # Change Engine
//!
//! Works out which reserve coins to hand back after a sale.
//!
//! ## Strategies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GreedyChange (default)                                                │
//! │  ─────────────────────                                                 │
//! │  Highest denomination first, as many as fit and as many as held.      │
//! │  Never overpays. May underpay when the reserve is lopsided:            │
//! │                                                                         │
//! │    owed 212, reserve {200×1, 50×54, 5×48}                              │
//! │    200×1 → 12 left, 50 too big, 5×2 → 2 left, no 1p coins              │
//! │    returns 210, shortfall 2                                            │
//! │                                                                         │
//! │  ExactChange                                                           │
//! │  ───────────                                                           │
//! │  Bounded search over held counts for the fewest coins summing to       │
//! │  exactly the amount owed. Refuses (ExactChangeUnavailable) instead of  │
//! │  underpaying, leaving the reserve untouched. Work grows with           │
//! │  owed × denominations; amounts over MAX_EXACT_CHANGE are refused.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coins::CoinReserve;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{coins_total, CoinStack, Money};

/// Picks change coins and withdraws them from the reserve.
pub trait ChangeStrategy: Send + Sync {
    /// Returns the coins set aside for `owed`, highest denomination first.
    ///
    /// The returned total never exceeds `owed`. Coins in the result have
    /// already been withdrawn from `reserve`.
    fn make_change(&self, owed: Money, reserve: &mut CoinReserve) -> CoreResult<Vec<CoinStack>>;
}

// =============================================================================
// Greedy
// =============================================================================

/// Highest-denomination-first change, accepting a shortfall.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyChange;

impl ChangeStrategy for GreedyChange {
    fn make_change(&self, owed: Money, reserve: &mut CoinReserve) -> CoreResult<Vec<CoinStack>> {
        let mut remaining = owed.minor();
        let mut change = Vec::new();

        for denomination in reserve.denominations_desc() {
            if remaining <= 0 {
                break;
            }
            let face = i64::from(denomination.minor());
            if remaining < face {
                continue;
            }

            let held = reserve.count(denomination);
            // Bounded by `held`, so it fits in u32.
            let want = (remaining / face).min(i64::from(held)) as u32;
            if want == 0 {
                continue;
            }

            reserve.withdraw(denomination, want)?;
            remaining -= face * i64::from(want);
            change.push(CoinStack::new(denomination, want));
        }

        if remaining > 0 {
            warn!(%owed, shortfall = remaining, "Reserve can't cover full change");
        }
        Ok(change)
    }
}

// =============================================================================
// Exact
// =============================================================================

/// Fewest-coins exact change, or nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactChange;

/// Largest amount, in minor units, the exact strategy will search for.
pub const MAX_EXACT_CHANGE: i64 = 100_000;

impl ExactChange {
    /// Plans exact change without touching the reserve.
    ///
    /// Layer `i` records how many coins of the `i`-th denomination were used
    /// to reach each amount, so the plan can be walked back from `owed`.
    /// Each layer is a single pass over `0..=owed`.
    fn plan(owed: usize, reserve: &CoinReserve) -> Option<Vec<CoinStack>> {
        const UNREACHABLE: u32 = u32::MAX;

        let denominations = reserve.denominations_desc();
        let mut best = vec![UNREACHABLE; owed + 1];
        best[0] = 0;
        let mut layers: Vec<Vec<u32>> = Vec::with_capacity(denominations.len());

        for &denomination in &denominations {
            let face = denomination.minor() as usize;
            let held = reserve.count(denomination) as usize;
            let mut next = vec![UNREACHABLE; owed + 1];
            let mut used = vec![0u32; owed + 1];

            // Amounts with the same remainder mod `face` form a chain. Step
            // `k` is reached from step `j` with `k - j` coins, `k - j <= held`,
            // so the cheapest source is the minimum of `best[j] - j` over a
            // sliding window, kept in a monotonic deque.
            for residue in 0..face.min(owed + 1) {
                let mut window: VecDeque<(usize, i64)> = VecDeque::new();

                for (step, amount) in (residue..=owed).step_by(face).enumerate() {
                    if best[amount] != UNREACHABLE {
                        let key = i64::from(best[amount]) - step as i64;
                        while window.back().is_some_and(|&(_, k)| k >= key) {
                            window.pop_back();
                        }
                        window.push_back((step, key));
                    }
                    while window.front().is_some_and(|&(from, _)| step - from > held) {
                        window.pop_front();
                    }
                    if let Some(&(from, key)) = window.front() {
                        next[amount] = (key + step as i64) as u32;
                        used[amount] = (step - from) as u32;
                    }
                }
            }

            best = next;
            layers.push(used);
        }

        if best[owed] == UNREACHABLE {
            return None;
        }

        let mut amount = owed;
        let mut plan = Vec::new();
        for (denomination, used) in denominations.iter().zip(&layers).rev() {
            let coins = used[amount];
            amount -= coins as usize * denomination.minor() as usize;
            if coins > 0 {
                plan.push(CoinStack::new(*denomination, coins));
            }
        }
        plan.sort_by(|a, b| b.denomination.cmp(&a.denomination));
        Some(plan)
    }
}

impl ChangeStrategy for ExactChange {
    fn make_change(&self, owed: Money, reserve: &mut CoinReserve) -> CoreResult<Vec<CoinStack>> {
        if !owed.is_positive() {
            return Ok(Vec::new());
        }
        if owed.minor() > MAX_EXACT_CHANGE {
            warn!(%owed, limit = MAX_EXACT_CHANGE, "Too much change owed for an exact search");
            return Err(CoreError::ExactChangeUnavailable { owed });
        }
        if owed > reserve.total() {
            return Err(CoreError::ExactChangeUnavailable { owed });
        }
        let target = usize::try_from(owed.minor())
            .map_err(|_| CoreError::ExactChangeUnavailable { owed })?;

        let plan = Self::plan(target, reserve).ok_or(CoreError::ExactChangeUnavailable { owed })?;
        for stack in &plan {
            reserve.withdraw(stack.denomination, stack.count)?;
        }
        debug!(%owed, returned = %coins_total(&plan), "Exact change planned");
        Ok(plan)
    }
}

// =============================================================================
// Change Mode
// =============================================================================

/// Configuration switch between the strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeMode {
    #[default]
    Greedy,
    Exact,
}

impl ChangeMode {
    pub fn strategy(self) -> &'static dyn ChangeStrategy {
        match self {
            ChangeMode::Greedy => &GreedyChange,
            ChangeMode::Exact => &ExactChange,
        }
    }
}

impl fmt::Display for ChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeMode::Greedy => write!(f, "greedy"),
            ChangeMode::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for ChangeMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(ChangeMode::Greedy),
            "exact" => Ok(ChangeMode::Exact),
            _ => Err(ValidationError::NotAllowed {
                field: "change_strategy".to_string(),
                allowed: vec!["greedy".to_string(), "exact".to_string()],
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Denomination;

    fn d(v: u32) -> Denomination {
        Denomination::new(v).unwrap()
    }

    fn reserve(stacks: &[(u32, u32)]) -> CoinReserve {
        let mut reserve = CoinReserve::new();
        let coins: Vec<_> = stacks.iter().map(|&(v, n)| CoinStack::new(d(v), n)).collect();
        reserve.reload(&coins).unwrap();
        reserve
    }

    #[test]
    fn test_greedy_exact_amount() {
        let mut pool = reserve(&[(50, 52), (5, 50)]);
        let change = GreedyChange
            .make_change(Money::from_minor(200), &mut pool)
            .unwrap();

        assert_eq!(change, vec![CoinStack::new(d(50), 4)]);
        assert_eq!(pool.count(d(50)), 48);
        assert_eq!(pool.count(d(5)), 50);
    }

    #[test]
    fn test_greedy_uses_highest_first() {
        let mut pool = reserve(&[(10, 1), (1, 20)]);
        let change = GreedyChange
            .make_change(Money::from_minor(12), &mut pool)
            .unwrap();

        assert_eq!(
            change,
            vec![CoinStack::new(d(10), 1), CoinStack::new(d(1), 2)]
        );
    }

    #[test]
    fn test_greedy_skips_oversized_and_continues() {
        // 200 is too big for 60 but smaller coins must still be tried.
        let mut pool = reserve(&[(200, 3), (50, 1), (10, 5)]);
        let change = GreedyChange
            .make_change(Money::from_minor(60), &mut pool)
            .unwrap();

        assert_eq!(coins_total(&change), Money::from_minor(60));
        assert_eq!(pool.count(d(200)), 3);
    }

    #[test]
    fn test_greedy_clamps_to_held_coins() {
        let mut pool = reserve(&[(50, 1), (20, 10)]);
        let change = GreedyChange
            .make_change(Money::from_minor(150), &mut pool)
            .unwrap();

        assert_eq!(
            change,
            vec![CoinStack::new(d(50), 1), CoinStack::new(d(20), 5)]
        );
        assert_eq!(pool.count(d(50)), 0);
    }

    #[test]
    fn test_greedy_shortfall_is_accepted() {
        let mut pool = reserve(&[(200, 1), (50, 54), (5, 48)]);
        let change = GreedyChange
            .make_change(Money::from_minor(212), &mut pool)
            .unwrap();

        assert_eq!(coins_total(&change), Money::from_minor(210));
        assert_eq!(
            change,
            vec![CoinStack::new(d(200), 1), CoinStack::new(d(5), 2)]
        );
    }

    #[test]
    fn test_greedy_misses_combination_exact_finds() {
        // Greedy takes 50 and is stuck on 10; 3×20 works.
        let mut greedy_pool = reserve(&[(50, 1), (20, 3)]);
        let greedy = GreedyChange
            .make_change(Money::from_minor(60), &mut greedy_pool)
            .unwrap();
        assert_eq!(coins_total(&greedy), Money::from_minor(50));

        let mut exact_pool = reserve(&[(50, 1), (20, 3)]);
        let exact = ExactChange
            .make_change(Money::from_minor(60), &mut exact_pool)
            .unwrap();
        assert_eq!(exact, vec![CoinStack::new(d(20), 3)]);
        assert_eq!(exact_pool.count(d(50)), 1);
        assert_eq!(exact_pool.count(d(20)), 0);
    }

    #[test]
    fn test_exact_prefers_fewest_coins() {
        let mut pool = reserve(&[(50, 4), (20, 10), (10, 10)]);
        let change = ExactChange
            .make_change(Money::from_minor(120), &mut pool)
            .unwrap();
        assert_eq!(
            change,
            vec![CoinStack::new(d(50), 2), CoinStack::new(d(20), 1)]
        );
    }

    #[test]
    fn test_exact_refuses_without_mutating() {
        let mut pool = reserve(&[(200, 1), (50, 54), (5, 48)]);
        let before = pool.clone();

        let err = ExactChange
            .make_change(Money::from_minor(212), &mut pool)
            .unwrap_err();
        assert!(matches!(err, CoreError::ExactChangeUnavailable { .. }));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_exact_respects_held_counts() {
        // Two 50s can't be used three times; 50×2 + 20×1 + 10×3 is the best.
        let mut pool = reserve(&[(50, 2), (20, 1), (10, 5)]);
        let change = ExactChange
            .make_change(Money::from_minor(150), &mut pool)
            .unwrap();
        assert_eq!(
            change,
            vec![
                CoinStack::new(d(50), 2),
                CoinStack::new(d(20), 1),
                CoinStack::new(d(10), 3),
            ]
        );
        assert_eq!(pool.count(d(10)), 2);
    }

    #[test]
    fn test_exact_large_amount_in_pennies() {
        let owed = MAX_EXACT_CHANGE as u32;
        let mut pool = reserve(&[(1, owed), (200, 3)]);
        let change = ExactChange
            .make_change(Money::from_minor(MAX_EXACT_CHANGE), &mut pool)
            .unwrap();

        assert_eq!(coins_total(&change), Money::from_minor(MAX_EXACT_CHANGE));
        assert_eq!(change[0], CoinStack::new(d(200), 3));
        assert_eq!(pool.count(d(1)), 600);
    }

    #[test]
    fn test_exact_refuses_over_limit_without_mutating() {
        let mut pool = reserve(&[(200, 1_000)]);
        let before = pool.clone();

        let err = ExactChange
            .make_change(Money::from_minor(MAX_EXACT_CHANGE + 200), &mut pool)
            .unwrap_err();
        assert!(matches!(err, CoreError::ExactChangeUnavailable { .. }));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_zero_owed_returns_nothing() {
        let mut pool = reserve(&[(1, 5)]);
        for mode in [ChangeMode::Greedy, ChangeMode::Exact] {
            let change = mode
                .strategy()
                .make_change(Money::zero(), &mut pool)
                .unwrap();
            assert!(change.is_empty());
        }
        assert_eq!(pool.count(d(1)), 5);
    }

    #[test]
    fn test_change_mode_parse() {
        assert_eq!("greedy".parse::<ChangeMode>().unwrap(), ChangeMode::Greedy);
        assert_eq!(" EXACT ".parse::<ChangeMode>().unwrap(), ChangeMode::Exact);
        assert!("optimal".parse::<ChangeMode>().is_err());
        assert_eq!(ChangeMode::default(), ChangeMode::Greedy);
    }
}
