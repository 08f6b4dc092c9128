//! 端末向けの表示整形（純粋関数のみ）

use culina_common::{DietaryFilter, MissingPrompt, Recipe, StepNavigator};

const MISSING_PREVIEW_LIMIT: usize = 3;
const PROGRESS_WIDTH: usize = 24;

/// 不足食材の短い表示。全て揃っている場合はその旨
pub fn missing_summary(recipe: &Recipe) -> String {
    if recipe.has_all_ingredients() {
        return "You have all ingredients!".to_string();
    }
    let (shown, rest) = recipe.missing_preview(MISSING_PREVIEW_LIMIT);
    let mut text = format!("Missing: {}", shown.join(", "));
    if rest > 0 {
        text.push_str(&format!(" +{} more", rest));
    }
    text
}

/// レシピ一覧の1行ラベル
pub fn recipe_label(recipe: &Recipe) -> String {
    format!(
        "{} [{}] {} · {} kcal",
        recipe.title, recipe.difficulty, recipe.prep_time, recipe.calories
    )
}

/// レシピカード（複数行）
pub fn recipe_card(index: usize, recipe: &Recipe) -> String {
    let mut lines = vec![format!("{}. {}", index + 1, recipe_label(recipe))];
    lines.push(format!("   {}", recipe.description));
    if !recipe.tags.is_empty() {
        lines.push(format!("   #{}", recipe.tags.join(" #")));
    }
    lines.push(format!("   {}", missing_summary(recipe)));
    lines.join("\n")
}

pub fn ingredient_chips(ingredients: &[String]) -> String {
    if ingredients.is_empty() {
        return "(none)".to_string();
    }
    ingredients
        .iter()
        .map(|i| format!("[{}]", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `[#######.......] 50%`
pub fn progress_bar(fraction: f32, width: usize) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = (fraction * width as f32).round() as usize;
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        fraction * 100.0
    )
}

/// 調理モードの本文
pub fn cooking_panel(recipe: &Recipe, navigator: &StepNavigator, missing: Option<&MissingPrompt<'_>>) -> String {
    let mut lines = vec![
        format!("🍳 {}", recipe.title),
        format!(
            "{}  {}",
            navigator.step_label(),
            progress_bar(navigator.progress(), PROGRESS_WIDTH)
        ),
    ];
    if let Some(prompt) = missing {
        lines.push(format!(
            "🛒 Missing: {} ({})",
            prompt.items.join(", "),
            prompt.button_label()
        ));
    }
    lines.push(String::new());
    lines.push(navigator.current_text().unwrap_or_default().to_string());
    if navigator.is_speaking() {
        lines.push("🔊 Reading aloud...".to_string());
    }
    lines.join("\n")
}

/// サイドバー相当の見出し
pub fn sidebar_header(filter: DietaryFilter, shopping_count: usize, model: &str) -> String {
    let badge = if shopping_count > 0 {
        format!(" ({})", shopping_count)
    } else {
        String::new()
    };
    format!(
        "CulinaVision · Diet: {} · Shopping List{} · AI Powered by {}",
        filter.label(),
        badge,
        model
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// 不足食材を買い物リストへ追加した結果
pub fn added_to_list(added: usize) -> String {
    match added {
        0 => "✔ Everything is already on your shopping list".to_string(),
        n => format!("✔ Added {} to your shopping list", plural(n, "item")),
    }
}

/// 解析完了時の件数表示
pub fn recipes_found(count: usize) -> String {
    format!("✔ Found {}", plural(count, "recipe"))
}
