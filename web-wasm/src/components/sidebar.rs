//! サイドバー（画面切り替え・食事制限）

use leptos::prelude::*;

use crate::app::Controller;
use culina_common::gemini::DEFAULT_MODEL;
use culina_common::{DietaryFilter, ViewState};

const NAV_ITEMS: [(ViewState, &str, &str); 3] = [
    (ViewState::Upload, "📷", "Scan Fridge"),
    (ViewState::Recipes, "📖", "Recipes"),
    (ViewState::Shopping, "🛒", "Shopping List"),
];

#[component]
pub fn Sidebar(
    controller: Controller,
    is_mobile_open: ReadSignal<bool>,
    set_is_mobile_open: WriteSignal<bool>,
) -> impl IntoView {
    let shopping_count = move || controller.with(|c| c.shopping_count());

    view! {
        <aside class=move || if is_mobile_open.get() { "sidebar open" } else { "sidebar" }>
            <div class="sidebar-brand">
                <h1>"CulinaVision"</h1>
            </div>

            <nav class="sidebar-nav">
                <p class="sidebar-heading">"Menu"</p>
                {NAV_ITEMS
                    .into_iter()
                    .map(|(target, icon, label)| {
                        let is_active = move || controller.with(|c| c.view() == target);
                        view! {
                            <button
                                class=move || if is_active() { "nav-item active" } else { "nav-item" }
                                on:click=move |_| {
                                    controller.update(|c| c.set_view(target));
                                    set_is_mobile_open.set(false);
                                }
                            >
                                <span class="nav-icon">{icon}</span>
                                <span class="nav-label">{label}</span>
                                <Show when=move || (target == ViewState::Shopping && shopping_count() > 0)>
                                    <span class="badge">{shopping_count}</span>
                                </Show>
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>

            <div class="sidebar-diet">
                <p class="sidebar-heading">"Dietary Preference"</p>
                {DietaryFilter::ALL
                    .into_iter()
                    .map(|filter| {
                        let is_selected = move || controller.with(|c| c.dietary_filter() == filter);
                        view! {
                            <button
                                class=move || if is_selected() { "diet-item active" } else { "diet-item" }
                                on:click=move |_| controller.update(|c| c.set_dietary_filter(filter))
                            >
                                {filter.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="sidebar-footer">
                <p>"AI Powered"</p>
                <p class="text-muted">{DEFAULT_MODEL}</p>
            </div>
        </aside>
    }
}
