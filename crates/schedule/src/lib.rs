//! Next-occurrence search for cron-style schedules.
//!
//! A schedule compiles to an immutable [`ScheduleConstraints`]: one
//! allowed-value set per calendar field plus two index-direction flags.
//! [`calculate_next`] finds the earliest whole second at or after a
//! reference instant that satisfies every field, or reports the schedule
//! as unsatisfiable once its iteration budget is spent.
//!
//! ```ignore
//! use chrono::{TimeZone, Utc};
//! use cs_schedule::{calculate_next, ScheduleConstraints};
//!
//! let last_friday: ScheduleConstraints = "0 0 9 ? * FRIL".parse()?;
//! let from = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! assert_eq!(
//!     calculate_next(from, &last_friday)?,
//!     Utc.with_ymd_and_hms(2024, 6, 28, 9, 0, 0).unwrap(),
//! );
//! ```
//!
//! Submodules:
//! - [`field`]: per-field value sets and matchers
//! - [`calendar`]: Gregorian decomposition helpers
//! - [`constraints`]: the constraint aggregate and its builder
//! - [`next`]: field rules and the correction loop
//! - [`occurrences`]: iterating successive results
//! - [`expression`]: text to constraints

pub mod calendar;
pub mod constraints;
pub mod expression;
pub mod field;
pub mod next;
pub mod occurrences;

pub use calendar::CalendarView;
pub use constraints::{ScheduleConstraints, ScheduleConstraintsBuilder};
pub use expression::parse;
pub use field::{ConstraintSet, CronField, YEAR_MAX, YEAR_MIN};
pub use next::{calculate_next, matches_instant as matches, MAX_ITERATIONS};
pub use occurrences::{occurrences, upcoming, Occurrences};
