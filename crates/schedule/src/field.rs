//! Per-field allowed-value sets.
//!
//! Every calendar field gets a zero-sized marker type implementing
//! [`CronField`]; [`ConstraintSet`] is a fixed-size bitmask over that
//! field's domain. An unconstrained field is the full domain, so every
//! membership test is the same [`ConstraintSet::contains`] call.

use std::fmt;
use std::marker::PhantomData;

use serde::{Serialize, Serializer};

use cs_domain::{Error, Result};

/// Earliest year a schedule may name.
pub const YEAR_MIN: u32 = 1970;
/// Latest year a schedule may name. Searches stop once they pass it.
pub const YEAR_MAX: u32 = 2099;

const WORDS: usize = 3;

/// Static description of one calendar field's domain.
pub trait CronField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Field name used in error messages.
    const NAME: &'static str;
    const MIN: u32;
    const MAX: u32;
    /// Largest value accepted in an expression before [`CronField::alias`].
    const MAX_INPUT: u32 = Self::MAX;
    /// Symbolic names, `NAMES[i]` standing for `MIN + i`.
    const NAMES: &'static [&'static str] = &[];

    /// Map an accepted input value onto the domain.
    fn alias(value: u32) -> u32 {
        value
    }
}

macro_rules! cron_field {
    ($(#[$doc:meta])* $ty:ident, $name:literal, $min:expr, $max:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $ty;

        impl CronField for $ty {
            const NAME: &'static str = $name;
            const MIN: u32 = $min;
            const MAX: u32 = $max;
        }
    };
}

cron_field!(Second, "second", 0, 59);
cron_field!(Minute, "minute", 0, 59);
cron_field!(Hour, "hour", 0, 23);
cron_field!(
    /// Day of month. With a reversed index, 1 is the last day of the month.
    DayOfMonth,
    "day-of-month",
    1,
    31
);
cron_field!(
    /// Occurrence of a weekday within its month (1 = first, or last when reversed).
    WeekdayIndex,
    "weekday-index",
    1,
    5
);
cron_field!(Year, "year", YEAR_MIN, YEAR_MAX);

/// Month of year, 1 = January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Month;

impl CronField for Month {
    const NAME: &'static str = "month";
    const MIN: u32 = 1;
    const MAX: u32 = 12;
    const NAMES: &'static [&'static str] = &[
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
}

/// Weekday identity, 0 = Sunday. `7` is accepted as a second spelling of Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek;

impl CronField for DayOfWeek {
    const NAME: &'static str = "day-of-week";
    const MIN: u32 = 0;
    const MAX: u32 = 6;
    const MAX_INPUT: u32 = 7;
    const NAMES: &'static [&'static str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

    fn alias(value: u32) -> u32 {
        value % 7
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ConstraintSet
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Immutable, never-empty set of allowed values for field `F`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintSet<F: CronField> {
    bits: [u64; WORDS],
    field: PhantomData<F>,
}

impl<F: CronField> ConstraintSet<F> {
    /// The whole domain of `F`, i.e. an unconstrained field.
    pub fn full() -> Self {
        let mut bits = [0u64; WORDS];
        for value in F::MIN..=F::MAX {
            let (word, bit) = Self::slot(value);
            bits[word] |= 1u64 << bit;
        }
        Self {
            bits,
            field: PhantomData,
        }
    }

    /// Build a set from explicit values.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidField`] for a value outside `F::MIN..=F::MAX`,
    /// [`Error::EmptyField`] when `values` yields nothing.
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut bits = [0u64; WORDS];
        for value in values {
            if !(F::MIN..=F::MAX).contains(&value) {
                return Err(Error::field(
                    F::NAME,
                    format!("value {value} out of range {}..={}", F::MIN, F::MAX),
                ));
            }
            let (word, bit) = Self::slot(value);
            bits[word] |= 1u64 << bit;
        }
        if bits.iter().all(|w| *w == 0) {
            return Err(Error::EmptyField { field: F::NAME });
        }
        Ok(Self {
            bits,
            field: PhantomData,
        })
    }

    /// Membership test; values outside the domain are never contained.
    pub fn contains(&self, value: u32) -> bool {
        if !(F::MIN..=F::MAX).contains(&value) {
            return false;
        }
        let (word, bit) = Self::slot(value);
        self.bits[word] & (1u64 << bit) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every value of the domain is allowed.
    pub fn is_full(&self) -> bool {
        self.len() == (F::MAX - F::MIN + 1) as usize
    }

    /// Allowed values in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (F::MIN..=F::MAX).filter(move |v| self.contains(*v))
    }

    /// Compact rendering: `*` for the full domain, otherwise runs such as `1-5,10`.
    pub fn describe(&self) -> String {
        if self.is_full() {
            return "*".into();
        }
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for value in self.iter() {
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == value => *end = value,
                _ => runs.push((value, value)),
            }
        }
        runs.iter()
            .map(|&(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{start}-{end}")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn slot(value: u32) -> (usize, u32) {
        let offset = value - F::MIN;
        ((offset / 64) as usize, offset % 64)
    }
}

impl<F: CronField> Default for ConstraintSet<F> {
    fn default() -> Self {
        Self::full()
    }
}

impl<F: CronField> fmt::Debug for ConstraintSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", F::NAME)?;
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: CronField> Serialize for ConstraintSet<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Field matcher: is `value` one of the allowed values in `set`?
pub fn matches<F: CronField>(value: u32, set: &ConstraintSet<F>) -> bool {
    set.contains(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_covers_domain_exactly() {
        let months = ConstraintSet::<Month>::full();
        assert_eq!(months.len(), 12);
        assert!(months.is_full());
        assert!(!months.contains(0));
        assert!(months.contains(1));
        assert!(months.contains(12));
        assert!(!months.contains(13));
    }

    #[test]
    fn year_domain_spans_multiple_words() {
        let years = ConstraintSet::<Year>::full();
        assert_eq!(years.len(), (YEAR_MAX - YEAR_MIN + 1) as usize);
        assert!(years.contains(YEAR_MIN));
        assert!(years.contains(2033));
        assert!(years.contains(YEAR_MAX));
        assert!(!years.contains(YEAR_MAX + 1));
        assert!(!years.contains(1969));
    }

    #[test]
    fn from_values_rejects_out_of_range() {
        let err = ConstraintSet::<Hour>::from_values([3, 24]).unwrap_err();
        assert_eq!(err.to_string(), "hour: value 24 out of range 0..=23");
    }

    #[test]
    fn from_values_rejects_empty() {
        let err = ConstraintSet::<Minute>::from_values([]).unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "minute" }));
    }

    #[test]
    fn iter_is_sorted_and_deduplicated() {
        let set = ConstraintSet::<Second>::from_values([30, 0, 15, 30]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 15, 30]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn matcher_uses_domain_values() {
        let set = ConstraintSet::<Month>::from_values([2]).unwrap();
        assert!(matches(2, &set));
        assert!(!matches(1, &set));
    }

    #[test]
    fn describe_collapses_runs() {
        let set = ConstraintSet::<DayOfMonth>::from_values([1, 2, 3, 4, 5, 10, 20, 21]).unwrap();
        assert_eq!(set.describe(), "1-5,10,20-21");
        assert_eq!(ConstraintSet::<DayOfMonth>::full().describe(), "*");
    }

    #[test]
    fn serializes_as_value_list() {
        let set = ConstraintSet::<WeekdayIndex>::from_values([1, 3]).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,3]");
    }

    #[test]
    fn sunday_alias() {
        assert_eq!(DayOfWeek::alias(7), 0);
        assert_eq!(DayOfWeek::alias(3), 3);
    }
}
