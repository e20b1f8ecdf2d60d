// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upscale page — send an image to the remote upscaling API.

use std::path::PathBuf;

use dioxus::prelude::*;

use bildwerk_core::BildwerkError;

use super::widgets::{ImagePicker, ResultView, Status, SubmitButton, show_output};
use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Upscale() -> Element {
    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let input = use_signal(|| Option::<PathBuf>::None);
    let mut busy = use_signal(|| false);
    let preview = use_signal(|| Option::<String>::None);
    let mut status = use_signal(|| Option::<Status>::None);

    let engine = state.read().config.upscale.engine_id.clone();
    let target = match (state.read().config.upscale.width, state.read().config.upscale.height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        (Some(w), None) => format!("{w} px wide"),
        (None, Some(h)) => format!("{h} px tall"),
        (None, None) => "engine default size".into(),
    };

    rsx! {
        div {
            h1 { "Upscale" }
            p { style: "color: #666;", "Engine {engine}, {target}. The API key is read from the environment." }

            ImagePicker { label: "Choose image", selected: input }

            SubmitButton {
                busy: *busy.read(),
                onclick: move |_| {
                    let Some(path) = input.read().clone() else {
                        status.set(Some(Status::error(&BildwerkError::MissingInput("image"))));
                        return;
                    };
                    let svc = svc.clone();
                    busy.set(true);
                    status.set(None);
                    spawn(async move {
                        let result = svc.upscale_image(&path).await;
                        show_output("upscale", result, preview, status);
                        busy.set(false);
                    });
                },
            }

            ResultView { preview: preview.read().clone(), status: status.read().clone() }
        }
    }
}
