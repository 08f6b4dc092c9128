//! レシピ解析ゲートウェイ
//!
//! 外部モデル呼び出しの境界。実装はネイティブ(reqwest)とWeb(fetch)にある。

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AnalysisResult, DietaryFilter, ImageData};

/// 解析失敗時にユーザーへ表示する汎用メッセージ（詳細はログのみ）
pub const GENERIC_ANALYSIS_ERROR: &str = "Failed to analyze image. Please try again.";

/// 画像と食事制限から食材・レシピを得る
///
/// 結果は全か無か。部分的な結果は返さない。
#[async_trait(?Send)]
pub trait RecipeGateway {
    async fn analyze(&self, image: &ImageData, filter: DietaryFilter) -> Result<AnalysisResult>;
}

