// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;

use super::widgets::{ImagePicker, ResultView, SliderRow, Status, SubmitButton, show_output};
use crate::services::app_services::AppServices;

/// Rotate about the centre, counter-clockwise, keeping the canvas size.
#[component]
pub fn Rotate() -> Element {
    let svc = use_context::<AppServices>();
    let input = use_signal(|| Option::<PathBuf>::None);
    let mut degrees = use_signal(|| 0.0f64);
    let preview = use_signal(|| Option::<String>::None);
    let mut status = use_signal(|| Option::<Status>::None);

    rsx! {
        div {
            h1 { "Rotate" }

            ImagePicker { label: "Choose image", selected: input }

            SliderRow {
                label: "Degrees",
                min: 0.0,
                max: 360.0,
                step: 1.0,
                value: *degrees.read(),
                on_change: move |v: f64| degrees.set(v),
            }

            SubmitButton {
                busy: false,
                onclick: move |_| {
                    let Some(path) = input.read().clone() else {
                        status.set(Some(Status::error(&BildwerkError::MissingInput("image"))));
                        return;
                    };
                    let result = svc.rotate_image(&path, *degrees.read() as f32);
                    show_output("rotate", result, preview, status);
                },
            }

            ResultView { preview: preview.read().clone(), status: status.read().clone() }
        }
    }
}
