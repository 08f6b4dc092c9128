//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::gemini::{build_time_api_key, GeminiWebGateway};
use crate::components::{
    cooking_mode::CookingMode, recipe_list::RecipeList, shopping_list::ShoppingList,
    sidebar::Sidebar, upload_view::UploadView,
};
use crate::speech::WebSpeech;
use culina_common::{AppController, ImageData, RecipeGateway, ViewState};

/// 画面状態コントローラ（UIスレッド専用のシグナル）
pub type Controller = RwSignal<AppController<WebSpeech>, LocalStorage>;

/// URLハッシュ（`#recipes` など）
pub fn route_hash(view: ViewState) -> String {
    format!("#{}", view.as_str())
}

fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let controller: Controller = RwSignal::new_local(AppController::new(WebSpeech::new()));
    let (api_key, set_api_key) = signal(build_time_api_key().unwrap_or_default().to_string());
    let (is_mobile_open, set_is_mobile_open) = signal(false);

    // 読み上げ通知は現在の更新が終わってから反映する
    controller.with_untracked(|c| {
        c.speech().set_listener(move |event| {
            spawn_local(async move {
                controller.try_update(|c| c.handle_speech_event(event));
            });
        })
    });

    // 起動時のハッシュから画面を復元
    let initial = ViewState::from_route(&current_hash());
    controller.update(|c| c.set_view(initial));

    let current_view = Memo::new(move |_| controller.with(|c| c.view()));

    // 画面 → ハッシュ
    Effect::new(move |_| {
        let hash = route_hash(current_view.get());
        if current_hash() != hash {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_hash(&hash);
            }
        }
    });

    // ハッシュ → 画面（戻る・進む）
    let _ = window_event_listener(leptos::ev::hashchange, move |_| {
        let view = ViewState::from_route(&current_hash());
        if controller.with_untracked(|c| c.view()) != view {
            controller.update(|c| c.set_view(view));
        }
    });

    let on_image = move |image: ImageData| {
        let key = api_key.get_untracked();
        if key.trim().is_empty() {
            return;
        }
        let filter = match controller.try_update(|c| c.begin_analysis()) {
            Some(Ok(filter)) => filter,
            Some(Err(e)) => {
                gloo::console::warn!(format!("{}", e));
                return;
            }
            None => return,
        };

        spawn_local(async move {
            let gateway = GeminiWebGateway::new(key);
            let result = gateway.analyze(&image, filter).await;
            if let Err(e) = &result {
                gloo::console::error!(format!("analysis failed: {}", e));
            }
            controller.try_update(|c| c.finish_analysis(result));
        });
    };

    view! {
        <div class="app">
            <button
                class="mobile-menu-button"
                on:click=move |_| set_is_mobile_open.update(|open| *open = !*open)
            >
                "☰"
            </button>

            <Sidebar
                controller=controller
                is_mobile_open=is_mobile_open
                set_is_mobile_open=set_is_mobile_open
            />

            <main class="main">
                {move || match current_view.get() {
                    ViewState::Upload => view! {
                        <UploadView
                            controller=controller
                            api_key=api_key
                            set_api_key=set_api_key
                            on_image=on_image
                        />
                    }.into_any(),
                    ViewState::Recipes => view! { <RecipeList controller=controller /> }.into_any(),
                    ViewState::Cooking => view! { <CookingMode controller=controller /> }.into_any(),
                    ViewState::Shopping => view! { <ShoppingList controller=controller /> }.into_any(),
                }}
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_hash_round_trip() {
        for view in [ViewState::Upload, ViewState::Recipes, ViewState::Cooking, ViewState::Shopping] {
            assert_eq!(ViewState::from_route(&route_hash(view)), view);
        }
        assert_eq!(route_hash(ViewState::Shopping), "#shopping");
    }
}
