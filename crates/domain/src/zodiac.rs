//! Chinese zodiac signs and their gala years.
//!
//! The twelve-year cycle is anchored at 1984, a year of the Rat. Galas started
//! in 1982, so the Dog and the Pig each gain one extra year (1982 and 1983)
//! that falls before the first anchored cycle.

use crate::errors::DomainError;
use crate::gala::{FIRST_GALA_YEAR, LAST_GALA_YEAR};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First year of the anchored cycle (Rat)
const CYCLE_BASE_YEAR: u32 = 1984;

const CYCLE_LENGTH: u32 = 12;

/// The twelve zodiac signs, numbered in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChineseZodiac {
    Rat = 1,
    Ox = 2,
    Tiger = 3,
    Rabbit = 4,
    Dragon = 5,
    Snake = 6,
    Horse = 7,
    Goat = 8,
    Monkey = 9,
    Rooster = 10,
    Dog = 11,
    Pig = 12,
}

impl ChineseZodiac {
    /// All signs in cycle order
    pub const ALL: [ChineseZodiac; 12] = [
        Self::Rat,
        Self::Ox,
        Self::Tiger,
        Self::Rabbit,
        Self::Dragon,
        Self::Snake,
        Self::Horse,
        Self::Goat,
        Self::Monkey,
        Self::Rooster,
        Self::Dog,
        Self::Pig,
    ];

    /// Position in the cycle, starting at 1 for the Rat
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Sign for a 1-based cycle position
    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        Self::ALL.get(ordinal.checked_sub(1)? as usize).copied()
    }

    /// Sign of the given year
    pub fn from_year(year: u32) -> Self {
        let offset = (i64::from(year) - i64::from(CYCLE_BASE_YEAR)).rem_euclid(i64::from(CYCLE_LENGTH));
        Self::ALL[offset as usize]
    }

    /// Gala years belonging to this sign, ascending.
    pub fn years(self) -> Vec<u32> {
        let first_in_cycle = CYCLE_BASE_YEAR + self.ordinal() - 1;
        let leading = match self {
            Self::Dog => Some(1982),
            Self::Pig => Some(1983),
            _ => None,
        };

        leading
            .into_iter()
            .chain((first_in_cycle..=LAST_GALA_YEAR).step_by(CYCLE_LENGTH as usize))
            .filter(|year| *year >= FIRST_GALA_YEAR)
            .collect()
    }

    /// English name of the sign
    pub fn name(self) -> &'static str {
        match self {
            Self::Rat => "Rat",
            Self::Ox => "Ox",
            Self::Tiger => "Tiger",
            Self::Rabbit => "Rabbit",
            Self::Dragon => "Dragon",
            Self::Snake => "Snake",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Monkey => "Monkey",
            Self::Rooster => "Rooster",
            Self::Dog => "Dog",
            Self::Pig => "Pig",
        }
    }
}

impl fmt::Display for ChineseZodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChineseZodiac {
    type Err = DomainError;

    /// Accepts a sign name (any case) or its ordinal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ordinal) = s.parse::<u32>() {
            return Self::from_ordinal(ordinal).ok_or_else(|| DomainError::InvalidZodiac(s.to_string()));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|sign| sign.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::InvalidZodiac(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn years_by_filter(sign: ChineseZodiac) -> Vec<u32> {
        (FIRST_GALA_YEAR..=LAST_GALA_YEAR)
            .filter(|year| ChineseZodiac::from_year(*year) == sign)
            .collect()
    }

    #[test]
    fn test_cycle_anchor() {
        assert_eq!(ChineseZodiac::from_year(1984), ChineseZodiac::Rat);
        assert_eq!(ChineseZodiac::from_year(2020), ChineseZodiac::Rat);
        assert_eq!(ChineseZodiac::from_year(2021), ChineseZodiac::Ox);
        assert_eq!(ChineseZodiac::from_year(1982), ChineseZodiac::Dog);
        assert_eq!(ChineseZodiac::from_year(1983), ChineseZodiac::Pig);
    }

    #[test]
    fn test_boundary_signs_include_leading_years() {
        let dog = ChineseZodiac::Dog.years();
        assert_eq!(dog.first(), Some(&1982));
        assert_eq!(&dog[..3], &[1982, 1994, 2006]);

        let pig = ChineseZodiac::Pig.years();
        assert_eq!(&pig[..3], &[1983, 1995, 2007]);
    }

    #[test]
    fn test_rat_years() {
        assert_eq!(
            ChineseZodiac::Rat.years(),
            vec![1984, 1996, 2008, 2020, 2032, 2044]
        );
    }

    #[test]
    fn test_years_match_filter_for_every_sign() {
        for sign in ChineseZodiac::ALL {
            assert_eq!(sign.years(), years_by_filter(sign), "{}", sign);
        }
    }

    #[test]
    fn test_every_gala_year_has_one_sign() {
        let total: usize = ChineseZodiac::ALL.iter().map(|z| z.years().len()).sum();
        assert_eq!(total, (LAST_GALA_YEAR - FIRST_GALA_YEAR + 1) as usize);
    }

    #[test]
    fn test_parse() {
        assert_eq!("dragon".parse::<ChineseZodiac>().unwrap(), ChineseZodiac::Dragon);
        assert_eq!("PIG".parse::<ChineseZodiac>().unwrap(), ChineseZodiac::Pig);
        assert_eq!("5".parse::<ChineseZodiac>().unwrap(), ChineseZodiac::Dragon);
        assert!("0".parse::<ChineseZodiac>().is_err());
        assert!("13".parse::<ChineseZodiac>().is_err());
        assert!("cat".parse::<ChineseZodiac>().is_err());
    }

    proptest! {
        #[test]
        fn prop_from_year_round_trips_through_years(year in FIRST_GALA_YEAR..=LAST_GALA_YEAR) {
            let sign = ChineseZodiac::from_year(year);
            prop_assert!(sign.years().contains(&year));
        }

        #[test]
        fn prop_cycle_repeats_every_twelve_years(year in 0u32..5000) {
            prop_assert_eq!(
                ChineseZodiac::from_year(year),
                ChineseZodiac::from_year(year + 12)
            );
        }
    }
}
