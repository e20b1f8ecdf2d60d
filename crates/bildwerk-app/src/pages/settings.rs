// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use std::path::PathBuf;

use dioxus::prelude::*;

use super::widgets::{SettingRow, Status};
use crate::services::app_services::AppServices;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<Status>::None);

    let output_dir = state
        .read()
        .config
        .output_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let width = optional_number(state.read().config.upscale.width);
    let height = optional_number(state.read().config.upscale.height);
    let model_path = state.read().config.matting.model_path.display().to_string();

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Output" }
                TextRow {
                    label: "Output folder (blank for default)",
                    value: output_dir,
                    on_change: move |v: String| {
                        let v = v.trim().to_string();
                        state.write().config.output_dir = (!v.is_empty()).then(|| PathBuf::from(v));
                    },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Upscaling" }
                TextRow {
                    label: "API host",
                    value: state.read().config.upscale.api_host.clone(),
                    on_change: move |v: String| { state.write().config.upscale.api_host = v.trim().to_string(); },
                }
                TextRow {
                    label: "Engine",
                    value: state.read().config.upscale.engine_id.clone(),
                    on_change: move |v: String| { state.write().config.upscale.engine_id = v.trim().to_string(); },
                }
                TextRow {
                    label: "Target width (blank for none)",
                    value: width,
                    on_change: move |v: String| {
                        match parse_optional_number(&v) {
                            Ok(w) => state.write().config.upscale.width = w,
                            Err(msg) => save_msg.set(Some(Status { text: msg, color: "#ff3b30" })),
                        }
                    },
                }
                TextRow {
                    label: "Target height (blank for none)",
                    value: height,
                    on_change: move |v: String| {
                        match parse_optional_number(&v) {
                            Ok(h) => state.write().config.upscale.height = h,
                            Err(msg) => save_msg.set(Some(Status { text: msg, color: "#ff3b30" })),
                        }
                    },
                }
                TextRow {
                    label: "API key environment variable",
                    value: state.read().config.upscale.api_key_env.clone(),
                    on_change: move |v: String| { state.write().config.upscale.api_key_env = v.trim().to_string(); },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Background removal" }
                TextRow {
                    label: "Segmentation model (.rten)",
                    value: model_path,
                    on_change: move |v: String| { state.write().config.matting.model_path = PathBuf::from(v.trim()); },
                }
                SettingRow {
                    label: "Alpha matting",
                    checked: state.read().config.matting.alpha_matting,
                    on_toggle: move |v: bool| { state.write().config.matting.alpha_matting = v; },
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                save_msg.set(Some(Status::ok("Settings saved.")));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(Status::error(&e)));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(msg) = save_msg.read().clone() {
                p { style: "color: {msg.color}; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg.text}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Bildwerk v{VERSION}"
                    br {}
                    "Tabbed image editor"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn TextRow(label: &'static str, value: String, on_change: EventHandler<String>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; gap: 8px; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "text",
                style: "flex: 1; max-width: 60%; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                value: "{value}",
                onchange: move |evt| on_change.call(evt.value()),
            }
        }
    }
}

fn optional_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Blank means unset; anything else must be a positive whole number.
fn parse_optional_number(input: &str) -> Result<Option<u32>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("\"{trimmed}\" is not a size in pixels.")),
        Ok(n) => Ok(Some(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_size_is_unset() {
        assert_eq!(parse_optional_number("  "), Ok(None));
    }

    #[test]
    fn sizes_must_be_positive_integers() {
        assert_eq!(parse_optional_number("2048"), Ok(Some(2048)));
        assert!(parse_optional_number("0").is_err());
        assert!(parse_optional_number("12.5").is_err());
    }
}
