// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod analyzer;
pub mod api;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod drops;
pub mod drops_csv;
pub mod exchange;
pub mod models;
pub mod news;
pub mod recovery;
pub mod web;
