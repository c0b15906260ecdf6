//! Retail price derivation for catalog entries.
//!
//! Every surface that shows a price goes through [`PricingEngine::compute`].
//! The result depends on the album's age, its position in the artist's
//! discography, its track count and a small random jitter drawn from a
//! caller-provided generator, and is always clamped to
//! [`MIN_PRICE`]..=[`MAX_PRICE`].
//!
//! All arithmetic happens in integer cents, so the two-decimal result needs no
//! floating point rounding.

use super::AlbumRecord;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

pub const MIN_PRICE: Price = Price::from_cents(599);
pub const MAX_PRICE: Price = Price::from_cents(2999);

pub const DEFAULT_SPECIAL_EDITION_MODULUS: usize = 5;
pub const DEFAULT_JITTER_DOLLARS: u32 = 3;

const SPECIAL_EDITION_BONUS_CENTS: i64 = 499;
const POSITION_DECAY_START_CENTS: i64 = 300;
const POSITION_DECAY_STEP_CENTS: i64 = 50;
const TRACK_BONUS_STEP_CENTS: i64 = 10;
const TRACK_BONUS_MAX_CENTS: i64 = 300;

/// A price in cents, displayed and serialized as `"12.34"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const fn from_cents(cents: u64) -> Self {
        Price(cents)
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsePriceError(String);

impl fmt::Display for ParsePriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid price {:?}", self.0)
    }
}

impl std::error::Error for ParsePriceError {}

impl FromStr for Price {
    type Err = ParsePriceError;

    /// Accepts `"12"`, `"12.3"` and `"12.34"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePriceError(s.to_owned());
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) || fraction.len() > 2
        {
            return Err(err());
        }
        let whole: u64 = whole.parse().map_err(|_| err())?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| err())? * 10,
            _ => fraction.parse().map_err(|_| err())?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .map(Price)
            .ok_or_else(err)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.parse().map_err(de::Error::custom),
            Raw::Number(n) if n.is_finite() && n >= 0.0 => Ok(Price((n * 100.0).round() as u64)),
            Raw::Number(n) => Err(de::Error::custom(format!("invalid price {}", n))),
        }
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        Price(iter.map(|p| p.0).sum())
    }
}

/// Outcome of pricing one album.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pricing {
    pub price: Price,
    pub is_special_edition: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingConfig {
    /// Positions that are a multiple of this are special editions.
    pub special_edition_modulus: NonZeroUsize,
    /// Jitter is drawn uniformly from `-jitter_dollars..=jitter_dollars`.
    pub jitter_dollars: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            special_edition_modulus: NonZeroUsize::new(DEFAULT_SPECIAL_EDITION_MODULUS)
                .unwrap_or(NonZeroUsize::MIN),
            jitter_dollars: DEFAULT_JITTER_DOLLARS,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        PricingEngine { config }
    }

    pub fn is_special_edition(&self, position: usize) -> bool {
        position % self.config.special_edition_modulus.get() == 0
    }

    /// Prices the album at `position` of its artist's discography.
    ///
    /// Negative positions count as 0. Missing release dates count as released
    /// this year, missing tracks as zero tracks. Two calls with the same
    /// inputs can differ by the jitter, so callers must keep the result
    /// instead of recomputing it.
    pub fn compute<R: Rng + ?Sized>(
        &self,
        album: &AlbumRecord,
        position: i64,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Pricing {
        let position = position.max(0);
        let current_year = now.year();
        let released = album
            .release_date
            .as_deref()
            .and_then(release_year)
            .unwrap_or(current_year);
        let age = current_year.saturating_sub(released).max(0);

        let is_special_edition = self.is_special_edition(position as usize);
        let special_bonus = if is_special_edition {
            SPECIAL_EDITION_BONUS_CENTS
        } else {
            0
        };

        let position_decay = POSITION_DECAY_START_CENTS
            .saturating_sub(position.saturating_mul(POSITION_DECAY_STEP_CENTS))
            .max(0);
        let track_bonus = (album.tracks.len() as i64)
            .saturating_mul(TRACK_BONUS_STEP_CENTS)
            .min(TRACK_BONUS_MAX_CENTS);

        let jitter_range = i64::from(self.config.jitter_dollars);
        let jitter = rng.random_range(-jitter_range..=jitter_range) * 100;

        let total = base_price_cents(age) + jitter + special_bonus + position_decay + track_bonus;
        let clamped = total.clamp(MIN_PRICE.cents() as i64, MAX_PRICE.cents() as i64);

        Pricing {
            price: Price::from_cents(clamped as u64),
            is_special_edition,
        }
    }
}

/// Base price by album age in years.
pub fn base_price_cents(age: i32) -> i64 {
    match age {
        a if a < 2 => 1899,
        a if a < 5 => 1699,
        a if a < 10 => 1499,
        a if a < 20 => 1199,
        _ => 899,
    }
}

/// Year of a `YYYY-MM-DD`, `YYYY-MM` or `YYYY` release date.
pub fn release_year(release_date: &str) -> Option<i32> {
    let release_date = release_date.trim();
    if let Ok(date) = NaiveDate::parse_from_str(release_date, "%Y-%m-%d") {
        return Some(date.year());
    }
    let year = release_date.split('-').next()?;
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}
