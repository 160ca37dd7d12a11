use std::ops::RangeInclusive;

use super::types::Gender;

/// Sparse step function keyed by calendar year.
///
/// Breakpoints must be sorted by year. A query resolves to the value of the
/// latest breakpoint at or before the year; years before the first breakpoint
/// take the first value and years after the last keep the last value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearTable {
    breakpoints: &'static [(i32, f64)],
}

impl YearTable {
    pub const fn new(breakpoints: &'static [(i32, f64)]) -> Self {
        Self { breakpoints }
    }

    pub fn breakpoints(&self) -> &'static [(i32, f64)] {
        self.breakpoints
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }
}

pub const WAGE_GROWTH: YearTable = YearTable::new(&[
    (2022, 0.980),
    (2023, 1.000),
    (2024, 1.034),
    (2025, 1.025),
    (2026, 1.022),
    (2030, 1.021),
    (2040, 1.020),
    (2050, 1.019),
    (2060, 1.019),
    (2070, 1.019),
    (2080, 1.020),
]);

pub const CONTRIBUTION_RATE: YearTable = YearTable::new(&[
    (1999, 0.1952),
    (2040, 0.1950),
    (2060, 0.1940),
    (2080, 0.1920),
]);

/// Calendar years accepted for user-supplied years and the clock.
pub const INPUT_YEARS: RangeInclusive<i32> = 1900..=2200;

// Leaves room for deferring retirement past the last input year.
pub const PROJECTION_YEARS: RangeInclusive<i32> = 1900..=2400;

pub const WORKING_DAYS_PER_YEAR: f64 = 250.0;

pub const SICK_LEAVE_REPLACEMENT_RATE: f64 = 0.8;

/// Years of remaining life expectancy lost per year of retirement past the
/// statutory age (gained per year before it).
pub const LIFE_EXPECTANCY_SHIFT_PER_YEAR: f64 = 0.3;

pub const MIN_LIFE_EXPECTANCY_YEARS: f64 = 1.0;

pub fn sick_leave_days(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 12.0,
        Gender::Female => 16.0,
    }
}

pub fn life_expectancy_at_retirement(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 17.5,
        Gender::Female => 22.0,
    }
}

pub fn statutory_retirement_age(gender: Gender) -> u32 {
    match gender {
        Gender::Male => 65,
        Gender::Female => 60,
    }
}

pub fn lookup(table: &YearTable, year: i32) -> f64 {
    let points = table.breakpoints;
    let Some(&(_, first)) = points.first() else {
        return 0.0;
    };
    let idx = points.partition_point(|&(breakpoint, _)| breakpoint <= year);
    if idx == 0 { first } else { points[idx - 1].1 }
}

// Non-finite years resolve to 0.
pub fn lookup_f64(table: &YearTable, year: f64) -> f64 {
    if !year.is_finite() {
        return 0.0;
    }
    lookup(table, year.floor() as i32)
}
