// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::path::PathBuf;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    /// Table written by the backfill, re-read on every request
    pub table_path: PathBuf,
}

impl AppState {
    pub fn new(table_path: PathBuf) -> Self {
        Self { table_path }
    }
}
