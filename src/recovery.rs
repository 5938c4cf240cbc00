// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::models::{DropEvent, PriceBar, RecoveryOutcome, RecoveryQuality};

/// Share of the open-to-close decline regained by `later_close`.
///
/// `None` for a zero-magnitude move, where the fraction is undefined.
pub fn recovered_fraction(open: f64, close: f64, later_close: f64) -> Option<f64> {
    let decline = open - close;
    if decline == 0.0 {
        return None;
    }
    Some((later_close - close) / decline)
}

/// Scan up to `lookahead` bars dated strictly after the drop.
///
/// Milestones are only ever set once, on the first day that reaches them. The
/// whole window is always scanned so `best_recovery` is the true maximum.
pub fn scan_recovery(event: &DropEvent, bars: &[PriceBar], lookahead: usize) -> RecoveryOutcome {
    let mut recovery_date_50 = None;
    let mut recovery_date_75 = None;
    let mut recovery_date_90 = None;
    let mut best_recovery = 0.0_f64;

    let window = bars.iter().filter(|b| b.date > event.date).take(lookahead);

    for bar in window {
        let Some(fraction) = recovered_fraction(event.open, event.close, bar.close) else {
            continue;
        };

        if fraction > best_recovery {
            best_recovery = fraction;
        }

        if recovery_date_50.is_none() && fraction >= 0.50 {
            recovery_date_50 = Some(bar.date);
        }
        if recovery_date_75.is_none() && fraction >= 0.75 {
            recovery_date_75 = Some(bar.date);
        }
        if recovery_date_90.is_none() && fraction >= 0.90 {
            recovery_date_90 = Some(bar.date);
        }
    }

    RecoveryOutcome {
        recovery_date_50,
        recovery_date_75,
        recovery_date_90,
        best_recovery,
        quality: RecoveryQuality::from_best(best_recovery),
    }
}
