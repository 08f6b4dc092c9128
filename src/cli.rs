use clap::{Parser, Subcommand};
use culina_common::DietaryFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "culina")]
#[command(about = "冷蔵庫の写真からレシピを提案・音声ガイド付き調理モード", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 冷蔵庫の写真を解析してレシピJSONを出力
    Analyze {
        /// 冷蔵庫の写真
        #[arg(required = true)]
        image: PathBuf,

        /// 食事制限 (none/vegetarian/vegan/keto/gluten-free/paleo)
        #[arg(short, long, default_value = "none")]
        diet: DietaryFilter,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話モードで解析・レシピ選択・調理ガイド
    Cook {
        /// 起動直後に解析する写真
        image: Option<PathBuf>,

        /// 保存済みの解析結果JSONから開始
        #[arg(long, conflicts_with = "image")]
        from: Option<PathBuf>,

        /// 食事制限
        #[arg(short, long, default_value = "none")]
        diet: DietaryFilter,

        /// 読み上げを無効化
        #[arg(long)]
        no_voice: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
