//! 買い物リスト

use leptos::prelude::*;

use crate::app::Controller;

#[component]
pub fn ShoppingList(controller: Controller) -> impl IntoView {
    let items = move || controller.with(|c| c.shopping_list().items().to_vec());
    let is_empty = move || controller.with(|c| c.shopping_list().is_empty());

    view! {
        <div class="shopping-list">
            <div class="shopping-header">
                <h2>"Shopping List"</h2>
                <Show when=move || !is_empty()>
                    <button
                        class="btn btn-tertiary"
                        on:click=move |_| controller.update(|c| c.clear_shopping_list())
                    >
                        "Clear All"
                    </button>
                </Show>
            </div>

            <Show
                when=move || !is_empty()
                fallback=|| view! {
                    <div class="empty-state">
                        <p>"Your list is empty"</p>
                        <p class="text-muted">"Add ingredients from recipe suggestions"</p>
                    </div>
                }
            >
                <ul class="shopping-items">
                    {move || items()
                        .into_iter()
                        .map(|item| {
                            let target = item.clone();
                            view! {
                                <li class="shopping-item">
                                    <span>{item}</span>
                                    <button
                                        class="icon-button"
                                        on:click=move |_| controller.update(|c| c.remove_from_shopping_list(&target))
                                    >
                                        "✕"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </Show>
        </div>
    }
}
