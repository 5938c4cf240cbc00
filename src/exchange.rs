// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

/// Known listings keyed by base symbol
const KNOWN_EXCHANGES: &[(&str, &str)] = &[
    ("BP", "LSE"),
    ("BHP", "ASX"),
    ("SHOP", "TSX"),
    ("0700", "HKEX"),
];

/// Best-effort exchange label for display. No correctness guarantee.
pub fn infer_exchange(ticker: &str) -> String {
    let ticker = ticker.trim().to_uppercase();
    let base = ticker.split('.').next().unwrap_or_default();

    if let Some((_, exchange)) = KNOWN_EXCHANGES.iter().find(|(symbol, _)| *symbol == base) {
        return exchange.to_string();
    }

    if let Some((_, suffix)) = ticker.rsplit_once('.') {
        return match suffix {
            "L" => "LSE".to_string(),
            "TO" => "TSX".to_string(),
            "AX" => "ASX".to_string(),
            "HK" => "HKEX".to_string(),
            other => other.to_string(),
        };
    }

    if !ticker.is_empty() && ticker.chars().all(|c| c.is_alphabetic()) && ticker.chars().count() <= 4 {
        "NASDAQ".to_string()
    } else {
        "NYSE".to_string()
    }
}
