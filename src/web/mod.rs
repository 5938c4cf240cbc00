// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod routes;
pub mod server;
pub mod state;
pub mod utils;

// Export commonly used items
pub use state::AppState;
