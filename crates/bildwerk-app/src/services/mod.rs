// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the Dioxus UI to the bildwerk backend crates.
//
// Each handler takes file paths and parameters straight from a tab, runs one
// transform, and writes the result to its fixed file in the output directory.

pub mod app_services;
pub mod data_dir;
pub mod preview;
