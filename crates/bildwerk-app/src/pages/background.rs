// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background page — cut the subject out, optionally over a colour or a blurred
// background image.

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;
use bildwerk_core::types::{BackgroundOptions, RgbaColor};

use super::widgets::{ImagePicker, ResultView, SettingRow, SliderRow, Status, SubmitButton, show_output};
use crate::services::app_services::AppServices;

#[component]
pub fn Background() -> Element {
    let svc = use_context::<AppServices>();

    let subject = use_signal(|| Option::<PathBuf>::None);
    let background = use_signal(|| Option::<PathBuf>::None);
    let mut replace = use_signal(|| false);
    let mut use_color = use_signal(|| false);
    let mut color = use_signal(|| RgbaColor::WHITE);
    let mut blur = use_signal(|| 0.0f64);

    let mut busy = use_signal(|| false);
    let preview = use_signal(|| Option::<String>::None);
    let mut status = use_signal(|| Option::<Status>::None);

    rsx! {
        div {
            h1 { "Background" }
            p { style: "color: #666;", "Remove the background of a photo, or replace it." }

            ImagePicker { label: "Choose subject image", selected: subject }

            SettingRow {
                label: "Replace background",
                checked: *replace.read(),
                on_toggle: move |v: bool| replace.set(v),
            }

            if *replace.read() {
                SettingRow {
                    label: "Use colour instead of an image",
                    checked: *use_color.read(),
                    on_toggle: move |v: bool| use_color.set(v),
                }

                if *use_color.read() {
                    div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                        span { "Background colour" }
                        input {
                            r#type: "color",
                            value: "{color.read().to_hex()}",
                            onchange: move |evt| {
                                match RgbaColor::from_hex(&evt.value()) {
                                    Ok(c) => color.set(c),
                                    Err(e) => status.set(Some(Status::error(&e))),
                                }
                            },
                        }
                    }
                } else {
                    ImagePicker { label: "Choose background image", selected: background }
                    SliderRow {
                        label: "Background blur",
                        min: 0.0,
                        max: 100.0,
                        step: 1.0,
                        value: *blur.read(),
                        on_change: move |v: f64| blur.set(v),
                    }
                }
            }

            SubmitButton {
                busy: *busy.read(),
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let Some(path) = subject.read().clone() else {
                            status.set(Some(Status::error(&BildwerkError::MissingInput("subject image"))));
                            return;
                        };
                        let options = BackgroundOptions {
                            replace_background: *replace.read(),
                            use_color_picker: *use_color.read(),
                            color: *color.read(),
                            background_path: background.read().clone(),
                            blur_radius: *blur.read() as f32,
                        };
                        let svc = svc.clone();
                        busy.set(true);
                        status.set(None);
                        spawn(async move {
                            let result = tokio::task::spawn_blocking(move || {
                                svc.remove_and_replace_background(&path, &options)
                            })
                            .await
                            .unwrap_or_else(|e| {
                                Err(BildwerkError::Segmentation(format!("background task failed: {e}")))
                            });
                            show_output("background", result, preview, status);
                            busy.set(false);
                        });
                    }
                },
            }

            ResultView { preview: preview.read().clone(), status: status.read().clone() }
        }
    }
}
