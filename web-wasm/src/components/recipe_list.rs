//! レシピ一覧

use leptos::prelude::*;

use crate::app::Controller;
use culina_common::{Difficulty, Recipe};

const MISSING_PREVIEW_LIMIT: usize = 3;

pub fn difficulty_class(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "badge badge-easy",
        Difficulty::Medium => "badge badge-medium",
        Difficulty::Hard => "badge badge-hard",
    }
}

#[component]
pub fn RecipeList(controller: Controller) -> impl IntoView {
    let recipes = move || controller.with(|c| c.recipes().to_vec());
    let ingredients = move || controller.with(|c| c.detected_ingredients().to_vec());

    view! {
        <div class="recipe-list">
            <Show
                when=move || !recipes().is_empty()
                fallback=|| view! {
                    <div class="empty-state">
                        <h2>"No recipes yet"</h2>
                        <p class="text-muted">"Upload a photo of your fridge to get started!"</p>
                    </div>
                }
            >
                <h2>"Recommended for You"</h2>
                <div class="ingredient-chips">
                    <span class="text-muted">"Found ingredients:"</span>
                    {move || ingredients()
                        .into_iter()
                        .map(|i| view! { <span class="chip">{i}</span> })
                        .collect_view()}
                </div>
                <div class="recipe-grid">
                    {move || recipes()
                        .into_iter()
                        .map(|recipe| view! { <RecipeCard controller=controller recipe=recipe /> })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn RecipeCard(controller: Controller, recipe: Recipe) -> impl IntoView {
    let (shown, rest) = recipe.missing_preview(MISSING_PREVIEW_LIMIT);
    let missing = if recipe.has_all_ingredients() {
        view! { <p class="all-ingredients">"You have all ingredients!"</p> }.into_any()
    } else {
        let shown = shown.join(", ");
        view! {
            <p class="missing">
                <span>"Missing: "</span>
                {shown}
                {(rest > 0).then(|| format!(" +{} more", rest))}
            </p>
        }
            .into_any()
    };
    let badge = difficulty_class(recipe.difficulty);
    let difficulty = recipe.difficulty.as_str();
    let title = recipe.title.clone();
    let description = recipe.description.clone();
    let meta = format!("⏱ {} · {} kcal", recipe.prep_time, recipe.calories);

    view! {
        <div class="recipe-card">
            <span class=badge>{difficulty}</span>
            <h3>{title}</h3>
            <p class="text-muted">{description}</p>
            <p class="recipe-meta">{meta}</p>
            {missing}
            <button
                class="btn btn-primary"
                on:click=move |_| {
                    let recipe = recipe.clone();
                    controller.update(|c| c.select_recipe(recipe));
                }
            >
                "View Recipe"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_class() {
        assert_eq!(difficulty_class(Difficulty::Easy), "badge badge-easy");
        assert_eq!(difficulty_class(Difficulty::Hard), "badge badge-hard");
    }
}
