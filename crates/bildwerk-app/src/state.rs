// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use bildwerk_core::AppConfig;

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
///
/// Each tab keeps its own picked input; only settings are shared.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Application settings, edited on the Settings tab.
    pub config: AppConfig,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            config: svc.config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_starts_from_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(dir.path().to_path_buf()).unwrap();
        let mut config = svc.config();
        config.upscale.height = Some(512);
        svc.save_config(&config).unwrap();

        assert_eq!(AppState::new(&svc).config, config);
    }
}
