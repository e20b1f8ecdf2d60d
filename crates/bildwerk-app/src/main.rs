// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — tabbed desktop image editor
//
// Entry point. Initialises logging, backend services, app state, and launches
// the Dioxus UI.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::background::Background;
use pages::brightness::Brightness;
use pages::gray::Gray;
use pages::object_remover::ObjectRemover;
use pages::rotate::Rotate;
use pages::settings::Settings;
use pages::skew::Skew;
use pages::upscale::Upscale;

use services::app_services::AppServices;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Bildwerk starting");

    dioxus::launch(app);
}

/// Top-level route enum, one route per tab.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(TabLayout)]
    #[route("/")]
    Background {},
    #[route("/upscale")]
    Upscale {},
    #[route("/gray")]
    Gray {},
    #[route("/brightness")]
    Brightness {},
    #[route("/rotate")]
    Rotate {},
    #[route("/skew")]
    Skew {},
    #[route("/object-remover")]
    ObjectRemover {},
    #[route("/settings")]
    Settings {},
}

/// Root component.
fn app() -> Element {
    let svc = use_hook(|| match AppServices::init() {
        Ok(s) => {
            tracing::info!("backend services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "data directory unavailable — using a temporary one");
            AppServices::with_data_dir(std::env::temp_dir().join("bildwerk"))
                .expect("even fallback init failed")
        }
    });

    // Provide services and state as context for all pages
    use_context_provider(|| svc.clone());
    use_context_provider(|| Signal::new(state::AppState::new(&svc)));

    rsx! {
        Router::<Route> {}
    }
}

/// Persistent tab layout wrapping all pages.
#[component]
fn TabLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            // Tab bar
            nav { class: "tab-bar",
                style: "display: flex; justify-content: space-around; flex-wrap: wrap; padding: 8px 0; border-bottom: 1px solid #e0e0e0; background: #fafafa;",
                TabButton { to: Route::Background {}, label: "Background", icon: "B" }
                TabButton { to: Route::Upscale {}, label: "Upscale", icon: "U" }
                TabButton { to: Route::Gray {}, label: "Gray", icon: "G" }
                TabButton { to: Route::Brightness {}, label: "Brightness", icon: "L" }
                TabButton { to: Route::Rotate {}, label: "Rotate", icon: "R" }
                TabButton { to: Route::Skew {}, label: "Skew", icon: "K" }
                TabButton { to: Route::ObjectRemover {}, label: "Object Remover", icon: "O" }
                TabButton { to: Route::Settings {}, label: "Settings", icon: "S" }
            }

            // Page content
            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px; max-width: 720px; width: 100%; margin: 0 auto; box-sizing: border-box;",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TabButton(to: Route, label: &'static str, icon: &'static str) -> Element {
    rsx! {
        Link { to: to,
            style: "display: flex; flex-direction: column; align-items: center; text-decoration: none; color: #333; font-size: 12px; padding: 0 6px;",
            span { style: "font-size: 20px;", "{icon}" }
            span { "{label}" }
        }
    }
}
