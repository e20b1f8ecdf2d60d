// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew page — horizontal shear followed by vertical shear.

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;
use bildwerk_core::types::{OutputFile, SkewFactors};

use super::widgets::{ImagePicker, ResultView, SliderRow, Status, SubmitButton};
use crate::services::app_services::AppServices;
use crate::services::preview;

#[component]
pub fn Skew() -> Element {
    let svc = use_context::<AppServices>();
    let input = use_signal(|| Option::<PathBuf>::None);
    let mut horizontal = use_signal(|| 0.0f64);
    let mut vertical = use_signal(|| 0.0f64);
    let mut shown = use_signal(|| Option::<String>::None);
    let mut status = use_signal(|| Option::<Status>::None);

    rsx! {
        div {
            h1 { "Skew" }

            ImagePicker { label: "Choose image", selected: input }

            SliderRow {
                label: "Horizontal skew (%)",
                min: -100.0,
                max: 100.0,
                step: 1.0,
                value: *horizontal.read(),
                on_change: move |v: f64| horizontal.set(v),
            }
            SliderRow {
                label: "Vertical skew (%)",
                min: -100.0,
                max: 100.0,
                step: 1.0,
                value: *vertical.read(),
                on_change: move |v: f64| vertical.set(v),
            }

            SubmitButton {
                busy: false,
                onclick: move |_| {
                    let Some(path) = input.read().clone() else {
                        status.set(Some(Status::error(&BildwerkError::MissingInput("image"))));
                        return;
                    };
                    let factors = SkewFactors::new(*horizontal.read() as f32, *vertical.read() as f32);
                    let result = svc
                        .skew_image(&path, factors)
                        .and_then(|img| preview::image_data_url(&img));
                    match result {
                        Ok(src) => {
                            tracing::info!(h = factors.horizontal_percent, v = factors.vertical_percent, "skew applied");
                            shown.set(Some(src));
                            status.set(Some(Status::ok(format!("Saved {}", OutputFile::Skewed.file_name()))));
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "skew failed");
                            status.set(Some(Status::error(&e)));
                        }
                    }
                },
            }

            ResultView { preview: shown.read().clone(), status: status.read().clone() }
        }
    }
}
