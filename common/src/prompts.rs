//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有されるプロンプトとレスポンススキーマ:
//! - RECIPE_COUNT: 提案させるレシピ数
//! - build_analysis_prompt: 冷蔵庫画像の解析用プロンプト
//! - response_schema: Geminiの構造化出力スキーマ

use serde_json::{json, Value};

use crate::types::{DietaryFilter, Difficulty};

/// 1回の解析で提案させるレシピ数
pub const RECIPE_COUNT: usize = 5;

/// 冷蔵庫画像の解析プロンプト生成
///
/// 食事制限はテキストとして埋め込むだけで、遵守はモデル側の責任。
pub fn build_analysis_prompt(filter: DietaryFilter) -> String {
    let restriction = if filter.is_restricted() {
        format!(
            "The user has selected a dietary restriction ({}); strictly adhere to it.",
            filter
        )
    } else {
        "The user has no dietary restriction (None).".to_string()
    };

    format!(
        r#"Analyze this image of a refrigerator or food items.
1. Identify the visible ingredients.
2. Suggest exactly {count} diverse, delicious recipes that use these ingredients.
3. {restriction}
4. For each recipe, list which ingredients are in the fridge ("ingredients") and which essential ingredients are missing ("missingIngredients") so the user can add them to a shopping list.
5. Provide step-by-step cooking instructions ("steps").

Every recipe needs a unique non-empty "id".
Return the response in strict JSON format."#,
        count = RECIPE_COUNT,
        restriction = restriction,
    )
}

fn string_array(description: Option<&str>) -> Value {
    let mut schema = json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    });
    if let Some(text) = description {
        schema["description"] = Value::String(text.to_string());
    }
    schema
}

/// Gemini `responseSchema`（全フィールド必須）
pub fn response_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "identifiedIngredients": string_array(Some("List of ingredients detected in the image")),
            "recipes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "difficulty": { "type": "STRING", "enum": difficulties },
                        "prepTime": { "type": "STRING" },
                        "calories": { "type": "INTEGER" },
                        "ingredients": string_array(Some("Ingredients available in the fridge")),
                        "missingIngredients": string_array(Some("Essential ingredients not seen in the fridge")),
                        "steps": string_array(Some("Step by step cooking instructions")),
                        "tags": string_array(Some("Tags like 'Breakfast', 'Healthy', 'Spicy'"))
                    },
                    "required": [
                        "id", "title", "description", "difficulty", "prepTime",
                        "calories", "ingredients", "missingIngredients", "steps", "tags"
                    ]
                }
            }
        },
        "required": ["identifiedIngredients", "recipes"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_restriction() {
        let prompt = build_analysis_prompt(DietaryFilter::Vegan);
        assert!(prompt.contains("(Vegan)"));
        assert!(prompt.contains("strictly adhere"));
        assert!(prompt.contains("exactly 5"));
        assert!(prompt.contains("missingIngredients"));
    }

    #[test]
    fn test_prompt_without_restriction() {
        let prompt = build_analysis_prompt(DietaryFilter::None);
        assert!(prompt.contains("no dietary restriction"));
        assert!(!prompt.contains("strictly adhere"));
    }

    #[test]
    fn test_prompt_gluten_free_text() {
        let prompt = build_analysis_prompt(DietaryFilter::GlutenFree);
        assert!(prompt.contains("Gluten-Free"));
    }

    #[test]
    fn test_schema_requires_all_recipe_fields() {
        let schema = response_schema();
        let required = schema["properties"]["recipes"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 10);
        assert!(required.iter().any(|v| v == "missingIngredients"));
        assert_eq!(schema["required"], json!(["identifiedIngredients", "recipes"]));
    }

    #[test]
    fn test_schema_difficulty_enum() {
        let schema = response_schema();
        let difficulty = &schema["properties"]["recipes"]["items"]["properties"]["difficulty"];
        assert_eq!(difficulty["enum"], json!(["Easy", "Medium", "Hard"]));
        assert_eq!(
            schema["properties"]["recipes"]["items"]["properties"]["calories"]["type"],
            "INTEGER"
        );
    }
}
