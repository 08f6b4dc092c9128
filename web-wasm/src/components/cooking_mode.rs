//! 調理モード（ステップ表示・読み上げ）

use leptos::prelude::*;

use crate::app::Controller;

#[component]
pub fn CookingMode(controller: Controller) -> impl IntoView {
    let title = move || {
        controller.with(|c| c.selected_recipe().map(|r| r.title.clone()).unwrap_or_default())
    };
    let step_label = move || {
        controller.with(|c| c.navigator().map(|n| n.step_label()).unwrap_or_default())
    };
    let progress = move || {
        controller.with(|c| c.navigator().map(|n| n.progress_percent()).unwrap_or(0.0))
    };
    let step_text = move || {
        controller.with(|c| {
            c.navigator()
                .and_then(|n| n.current_text())
                .map(String::from)
                .unwrap_or_default()
        })
    };
    let is_first = move || controller.with(|c| c.navigator().map_or(true, |n| n.is_first()));
    let is_last = move || controller.with(|c| c.navigator().map_or(true, |n| n.is_last()));
    let is_speaking = move || controller.with(|c| c.navigator().is_some_and(|n| n.is_speaking()));
    let can_narrate = move || controller.with(|c| c.narration_available());
    let missing = move || {
        controller.with(|c| {
            c.missing_prompt()
                .map(|p| (p.items.to_vec(), p.all_added, p.button_label()))
        })
    };

    view! {
        <div class="cooking-mode">
            <div class="cooking-header">
                <button class="icon-button" on:click=move |_| controller.update(|c| c.leave_cooking())>
                    "←"
                </button>
                <div class="cooking-title">
                    <h2>{title}</h2>
                    <p class="text-muted">{step_label}</p>
                </div>
            </div>

            <div class="progress-bar">
                <div class="progress-fill" style=move || format!("width: {}%", progress())></div>
            </div>

            {move || missing().map(|(items, all_added, label)| view! {
                <div class="missing-alert">
                    <h3>"Missing Essentials"</h3>
                    <p>"Looks like you need a few things before starting."</p>
                    <div class="ingredient-chips">
                        {items.into_iter().map(|i| view! { <span class="chip">{i}</span> }).collect_view()}
                    </div>
                    <button
                        class="btn btn-warning"
                        disabled=all_added
                        on:click=move |_| {
                            controller.update(|c| {
                                c.add_missing_to_shopping_list();
                            })
                        }
                    >
                        "🛍 " {label}
                    </button>
                </div>
            })}

            <div class="step-content">
                <p class="step-text">{step_text}</p>
            </div>

            <div class="cooking-controls">
                <button
                    class="icon-button"
                    disabled=is_first
                    on:click=move |_| {
                        controller.update(|c| {
                            c.prev_step();
                        })
                    }
                >
                    "◀"
                </button>

                <Show when=can_narrate>
                    <button
                        class=move || if is_speaking() { "read-button speaking" } else { "read-button" }
                        on:click=move |_| controller.update(|c| c.toggle_read_aloud())
                    >
                        {move || if is_speaking() { "⏸ Pause" } else { "🔊 Read Step" }}
                    </button>
                </Show>

                <button
                    class="icon-button"
                    disabled=is_last
                    on:click=move |_| {
                        controller.update(|c| {
                            c.next_step();
                        })
                    }
                >
                    "▶"
                </button>
            </div>
        </div>
    }
}
