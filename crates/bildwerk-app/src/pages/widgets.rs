// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Building blocks shared by the editor tabs.

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;
use bildwerk_core::human_errors::{Severity, humanize_error};

use crate::services::preview;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"];

/// Status line shown under a tab's Submit button.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub color: &'static str,
}

impl Status {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: "#34c759",
        }
    }

    pub fn error(err: &BildwerkError) -> Self {
        let human = humanize_error(err);
        let color = match human.severity {
            Severity::Transient => "#ff9500",
            Severity::ActionRequired => "#007aff",
            Severity::Permanent => "#ff3b30",
        };
        Self {
            text: format!("{} {}", human.message, human.suggestion),
            color,
        }
    }
}

/// Open a native file dialog for an image.
pub fn pick_image(title: &str) -> Option<PathBuf> {
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
    }
    #[cfg(any(target_os = "ios", target_os = "android"))]
    {
        tracing::info!(title, "file picker not available on mobile");
        None
    }
}

/// Show a handler's outcome: the written file as a preview, or the error.
pub fn show_output(
    operation: &'static str,
    result: bildwerk_core::error::Result<PathBuf>,
    mut preview: Signal<Option<String>>,
    mut status: Signal<Option<Status>>,
) {
    let shown = result.and_then(|out| {
        let src = preview::file_data_url(&out)?;
        Ok((out, src))
    });
    match shown {
        Ok((out, src)) => {
            tracing::info!(operation, output = %out.display(), "output written");
            preview.set(Some(src));
            status.set(Some(Status::ok(format!("Saved {}", out.display()))));
        }
        Err(e) => {
            tracing::error!(operation, error = %e, "operation failed");
            status.set(Some(Status::error(&e)));
        }
    }
}

/// Button that picks an image and stores the path in `selected`.
#[component]
pub fn ImagePicker(label: &'static str, mut selected: Signal<Option<PathBuf>>) -> Element {
    let name = selected
        .read()
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string());

    rsx! {
        div { style: "margin: 12px 0;",
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: 1px solid #007aff; color: #007aff; background: white; font-size: 16px;",
                onclick: move |_| {
                    if let Some(path) = pick_image(label) {
                        tracing::info!(path = %path.display(), "image picked");
                        selected.set(Some(path));
                    }
                },
                "{label}"
            }
            if let Some(name) = name {
                p { style: "color: #666; font-size: 14px; margin: 4px 0;", "{name}" }
            }
        }
    }
}

#[component]
pub fn SliderRow(
    label: &'static str,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
    on_change: EventHandler<f64>,
) -> Element {
    rsx! {
        div { style: "padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            div { style: "display: flex; justify-content: space-between;",
                span { "{label}" }
                span { style: "color: #666;", "{value}" }
            }
            input {
                r#type: "range",
                style: "width: 100%;",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                oninput: move |evt| {
                    if let Ok(v) = evt.value().parse::<f64>() {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}

#[component]
pub fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}

#[component]
pub fn SubmitButton(busy: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let opacity = if busy { "0.5" } else { "1" };
    rsx! {
        button {
            style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 16px; opacity: {opacity};",
            disabled: busy,
            onclick: move |evt| onclick.call(evt),
            if busy { "Working..." } else { "Submit" }
        }
    }
}

/// Result image plus status line.
#[component]
pub fn ResultView(preview: Option<String>, status: Option<Status>) -> Element {
    rsx! {
        if let Some(status) = status {
            p { style: "margin-top: 8px; color: {status.color}; font-size: 14px; text-align: center;",
                "{status.text}"
            }
        }
        if let Some(src) = preview {
            img {
                style: "display: block; max-width: 100%; margin: 16px auto; border: 1px solid #e0e0e0; border-radius: 4px;",
                src: "{src}",
            }
        }
    }
}
