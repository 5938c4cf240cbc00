// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! NYSE trading calendar.
//!
//! Full-day closures only: weekends, the standing exchange holidays computed
//! per year, and a short table of one-off closures. Early closes are regular
//! trading days for daily bars.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeMap, BTreeSet};

/// Source of valid trading dates
pub trait TradingCalendar {
    /// Trading days in `[from, to]`, ascending
    fn trading_days(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate>;
}

/// Unscheduled full-day closures (national days of mourning, weather)
const SPECIAL_CLOSURES: &[(i32, u32, u32)] = &[
    (2012, 10, 29),
    (2012, 10, 30),
    (2018, 12, 5),
    (2025, 1, 9),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct NyseCalendar;

impl NyseCalendar {
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        is_open(date, &holidays(date.year()))
    }
}

impl TradingCalendar for NyseCalendar {
    fn trading_days(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let mut by_year: BTreeMap<i32, BTreeSet<NaiveDate>> = BTreeMap::new();

        from.iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| {
                let closed = by_year.entry(d.year()).or_insert_with(|| holidays(d.year()));
                is_open(*d, closed)
            })
            .collect()
    }
}

fn is_open(date: NaiveDate, holidays: &BTreeSet<NaiveDate>) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        && !holidays.contains(&date)
        && !is_special_closure(date)
}

fn is_special_closure(date: NaiveDate) -> bool {
    SPECIAL_CLOSURES
        .iter()
        .any(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d) == Some(date))
}

/// Standing NYSE holidays observed in `year`
pub fn holidays(year: i32) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();

    // New Year's Day: a Saturday holiday is not moved back into December
    if let Some(new_year) = NaiveDate::from_ymd_opt(year, 1, 1) {
        match new_year.weekday() {
            Weekday::Sat => {}
            Weekday::Sun => {
                days.insert(new_year + Duration::days(1));
            }
            _ => {
                days.insert(new_year);
            }
        }
    }

    let nth = |month: u32, weekday: Weekday, n: u8| {
        NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
    };

    days.extend(nth(1, Weekday::Mon, 3)); // Martin Luther King Jr. Day
    days.extend(nth(2, Weekday::Mon, 3)); // Washington's Birthday
    days.extend(easter_sunday(year).map(|e| e - Duration::days(2))); // Good Friday
    days.extend(last_weekday_of_month(year, 5, Weekday::Mon)); // Memorial Day
    if year >= 2022 {
        days.extend(observed(year, 6, 19)); // Juneteenth
    }
    days.extend(observed(year, 7, 4));
    days.extend(nth(9, Weekday::Mon, 1)); // Labor Day
    days.extend(nth(11, Weekday::Thu, 4)); // Thanksgiving
    days.extend(observed(year, 12, 25));

    days
}

/// Fixed-date holiday moved to Friday/Monday when it lands on a weekend
fn observed(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    })
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = first_of_next - Duration::days(1);
    while date.weekday() != weekday {
        date -= Duration::days(1);
    }
    Some(date)
}

/// Gregorian Easter Sunday (anonymous Gregorian algorithm)
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
