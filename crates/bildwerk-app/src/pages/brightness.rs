// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Brightness page — lift and/or lower every colour channel.

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;
use bildwerk_core::types::BrightnessAdjustment;

use super::widgets::{ImagePicker, ResultView, SettingRow, SliderRow, Status, SubmitButton, show_output};
use crate::services::app_services::AppServices;

#[component]
pub fn Brightness() -> Element {
    let svc = use_context::<AppServices>();
    let input = use_signal(|| Option::<PathBuf>::None);
    let mut adjustment = use_signal(BrightnessAdjustment::default);
    let preview = use_signal(|| Option::<String>::None);
    let mut status = use_signal(|| Option::<Status>::None);

    let current = *adjustment.read();

    rsx! {
        div {
            h1 { "Brightness" }
            p { style: "color: #666;", "Brightness is added first, then darkness is subtracted." }

            ImagePicker { label: "Choose image", selected: input }

            SettingRow {
                label: "Enable brightness",
                checked: current.brightness_enabled,
                on_toggle: move |v: bool| adjustment.write().brightness_enabled = v,
            }
            if current.brightness_enabled {
                SliderRow {
                    label: "Brightness",
                    min: 0.0,
                    max: 255.0,
                    step: 1.0,
                    value: current.brightness as f64,
                    on_change: move |v: f64| adjustment.write().brightness = v.clamp(0.0, 255.0) as u8,
                }
            }

            SettingRow {
                label: "Enable darkness",
                checked: current.darkness_enabled,
                on_toggle: move |v: bool| adjustment.write().darkness_enabled = v,
            }
            if current.darkness_enabled {
                SliderRow {
                    label: "Darkness",
                    min: 0.0,
                    max: 255.0,
                    step: 1.0,
                    value: current.darkness as f64,
                    on_change: move |v: f64| adjustment.write().darkness = v.clamp(0.0, 255.0) as u8,
                }
            }

            SubmitButton {
                busy: false,
                onclick: move |_| {
                    let Some(path) = input.read().clone() else {
                        status.set(Some(Status::error(&BildwerkError::MissingInput("image"))));
                        return;
                    };
                    let result = svc.adjust_brightness_and_darkness(&path, &adjustment.read());
                    show_output("brightness", result, preview, status);
                },
            }

            ResultView { preview: preview.read().clone(), status: status.read().clone() }
        }
    }
}
