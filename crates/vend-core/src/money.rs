//! # Money Module
//!
//! Provides the `Money` type for monetary values and the coin types built on
//! top of it: `Denomination`, `CoinStack` and `DenominationSet`.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every coin the machine handles is a whole number of minor units       │
//! │  (pence). Prices, inserted totals and change are sums of coins, so     │
//! │  integer arithmetic is exact and a shortfall of 2p stays visible as    │
//! │  exactly 2p.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::money::{CoinStack, Denomination, Money};
//!
//! let fifty = Denomination::new(50).unwrap();
//! let stack = CoinStack::new(fifty, 3);
//! assert_eq!(stack.value(), Money::from_minor(150));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;
use crate::validation::validate_denomination;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (pence).
///
/// Signed so that a shortfall (`change_due - change_returned`) and
/// intermediate differences can be expressed without panicking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtraction that floors at zero.
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }
}

/// Debug/log rendering only. Display formatting for customers belongs to
/// whatever front panel drives the machine.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a coin count.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: u32) -> Self {
        Money(self.0 * i64::from(count))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Denomination
// =============================================================================

/// A coin's face value in minor units. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Denomination(u32);

impl Denomination {
    /// Creates a denomination, rejecting zero.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        validate_denomination(value)?;
        Ok(Denomination(value))
    }

    /// Face value in minor units.
    #[inline]
    pub const fn minor(&self) -> u32 {
        self.0
    }

    /// Face value as Money.
    #[inline]
    pub fn value(&self) -> Money {
        Money::from_minor(i64::from(self.0))
    }
}

impl TryFrom<u32> for Denomination {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Denomination::new(value)
    }
}

impl From<Denomination> for u32 {
    fn from(d: Denomination) -> Self {
        d.0
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

// =============================================================================
// Coin Stack
// =============================================================================

/// A number of coins of one denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinStack {
    pub denomination: Denomination,
    pub count: u32,
}

impl CoinStack {
    #[inline]
    pub const fn new(denomination: Denomination, count: u32) -> Self {
        CoinStack {
            denomination,
            count,
        }
    }

    /// Total face value of the stack.
    #[inline]
    pub fn value(&self) -> Money {
        self.denomination.value() * self.count
    }
}

/// Sums the face value of a list of coin stacks.
pub fn coins_total(coins: &[CoinStack]) -> Money {
    coins.iter().map(CoinStack::value).sum()
}

// =============================================================================
// Denomination Set
// =============================================================================

/// Denominations the coin slot recognises, in minor units.
pub const DEFAULT_DENOMINATIONS: [u32; 7] = [1, 5, 10, 20, 50, 100, 200];

/// Immutable allow-list of denominations accepted by the coin slot.
///
/// Only insertion is restricted by this set. The reserve can hold any
/// denomination loaded by an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationSet(BTreeSet<Denomination>);

impl DenominationSet {
    /// Builds an allow-list from raw minor-unit values.
    ///
    /// Duplicates collapse. Zero is rejected.
    pub fn from_values<I>(values: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = u32>,
    {
        let set = values
            .into_iter()
            .map(Denomination::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(DenominationSet(set))
    }

    /// Checks whether a raw coin value is recognised.
    pub fn recognise(&self, value: u32) -> Option<Denomination> {
        self.0.iter().copied().find(|d| d.minor() == value)
    }

    pub fn contains(&self, denomination: Denomination) -> bool {
        self.0.contains(&denomination)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Denominations in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Denomination> + '_ {
        self.0.iter().copied()
    }

    /// Raw values in ascending order, for error messages.
    pub fn values(&self) -> Vec<u32> {
        self.0.iter().map(Denomination::minor).collect()
    }
}

impl Default for DenominationSet {
    fn default() -> Self {
        DenominationSet(DEFAULT_DENOMINATIONS.iter().map(|&v| Denomination(v)).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
