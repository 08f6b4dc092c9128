//! APIレスポンスパーサー
//!
//! モデルの出力テキストからJSONを抽出し、解析結果として厳密に検証する。
//! 必須項目の欠落や不正値はデフォルトで埋めずにエラーとする。

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::prompts::RECIPE_COUNT;
use crate::types::{AnalysisResult, Recipe};

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use culina_common::extract_json;
///
/// let response = "Result: {\"key\": \"value\"} done";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"key\": \"value\"}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSON object not found".into()))
}

/// 解析レスポンスをパースして検証
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json(response)?;
    let result: AnalysisResult = serde_json::from_str(json_str)
        .map_err(|e| Error::Schema(format!("response does not match schema: {}", e)))?;
    validate_analysis(&result)?;

    if result.recipes.len() != RECIPE_COUNT {
        tracing::warn!(
            expected = RECIPE_COUNT,
            actual = result.recipes.len(),
            "unexpected number of recipes"
        );
    }

    Ok(result)
}

/// 型では表現できない制約の検証
pub fn validate_analysis(result: &AnalysisResult) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, recipe) in result.recipes.iter().enumerate() {
        validate_recipe(index, recipe)?;
        if !seen.insert(recipe.id.as_str()) {
            return Err(Error::Schema(format!(
                "recipes[{}].id is duplicated: {}",
                index, recipe.id
            )));
        }
    }
    Ok(())
}

fn validate_recipe(index: usize, recipe: &Recipe) -> Result<()> {
    let required_text = [
        ("id", &recipe.id),
        ("title", &recipe.title),
        ("description", &recipe.description),
        ("prepTime", &recipe.prep_time),
    ];
    for (field, value) in required_text {
        if value.trim().is_empty() {
            return Err(Error::Schema(format!("recipes[{}].{} is empty", index, field)));
        }
    }

    if recipe.steps.is_empty() {
        return Err(Error::Schema(format!("recipes[{}].steps is empty", index)));
    }

    Ok(())
}
