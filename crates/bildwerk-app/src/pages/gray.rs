// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;

use super::widgets::{ImagePicker, ResultView, Status, SubmitButton, show_output};
use crate::services::app_services::AppServices;

#[component]
pub fn Gray() -> Element {
    let svc = use_context::<AppServices>();
    let input = use_signal(|| Option::<PathBuf>::None);
    let preview = use_signal(|| Option::<String>::None);
    let mut status = use_signal(|| Option::<Status>::None);

    rsx! {
        div {
            h1 { "Gray" }
            p { style: "color: #666;", "Convert a colour image to grayscale." }

            ImagePicker { label: "Choose image", selected: input }

            SubmitButton {
                busy: false,
                onclick: move |_| {
                    let Some(path) = input.read().clone() else {
                        status.set(Some(Status::error(&BildwerkError::MissingInput("image"))));
                        return;
                    };
                    show_output("gray", svc.gray(&path), preview, status);
                },
            }

            ResultView { preview: preview.read().clone(), status: status.read().clone() }
        }
    }
}
