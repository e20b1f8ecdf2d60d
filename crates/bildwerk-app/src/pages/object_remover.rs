// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Object remover page — links out to the hosted IOPaint tool.

use dioxus::prelude::*;

use crate::services::app_services::{AppServices, ExternalLink};

#[component]
pub fn ObjectRemover() -> Element {
    let svc = use_context::<AppServices>();
    let mut link = use_signal(|| Option::<ExternalLink>::None);

    rsx! {
        div {
            h1 { "Object Remover" }
            p { style: "color: #666;", "Object removal runs in an external web app." }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 16px;",
                onclick: move |_| {
                    let generated = svc.object_remover_link();
                    tracing::info!(link = %generated.markdown(), "object remover link generated");
                    link.set(Some(generated));
                },
                "Generate link"
            }

            if let Some(link) = link.read().clone() {
                p { style: "margin-top: 16px; text-align: center;",
                    a { href: "{link.url}", target: "_blank", "{link.label}" }
                }
                p { style: "color: #888; font-size: 12px; text-align: center; word-break: break-all;",
                    "{link.url}"
                }
            }
        }
    }
}
