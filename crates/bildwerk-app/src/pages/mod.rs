// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod background;
pub mod brightness;
pub mod gray;
pub mod object_remover;
pub mod rotate;
pub mod settings;
pub mod skew;
pub mod upscale;
pub mod widgets;
