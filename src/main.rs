use clap::Parser;
use culina_common::{parse_analysis_response, AppController, RecipeGateway, GENERIC_ANALYSIS_ERROR};
use culina_vision::{cli, config, error, gateway, image_loader, render, session, speech};
use cli::{Cli, Commands};
use config::Config;
use error::{CulinaError, Result};
use gateway::GeminiGateway;
use speech::{CommandSpeech, SpeechCommand};
use std::sync::mpsc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, diet, output } => {
            println!("🥕 culina - 冷蔵庫解析\n");

            println!("[1/3] 画像を読み込み中...");
            let image = image_loader::load_image(&image, config.max_image_size)?;
            println!("✔ {} ({} KB)\n", image.mime_type, image.bytes.len() / 1024);

            println!("[2/3] AI解析中... (食事制限: {})", diet.label());
            let gateway = build_gateway(&config)?;
            let spinner = session::analyzing_spinner();
            let result = gateway.analyze(&image, diet).await;
            spinner.finish_and_clear();
            let analysis = result.map_err(|e| {
                tracing::error!(error = %e, "analysis failed");
                CulinaError::ApiCall(GENERIC_ANALYSIS_ERROR.to_string())
            })?;
            println!("✔ 解析完了\n");

            println!("Found ingredients: {}\n", render::ingredient_chips(&analysis.identified_ingredients));
            for (i, recipe) in analysis.recipes.iter().enumerate() {
                println!("{}\n", render::recipe_card(i, recipe));
            }

            if let Some(output) = output {
                println!("[3/3] 結果を保存中...");
                let json = serde_json::to_string_pretty(&analysis)?;
                std::fs::write(&output, json)?;
                println!("✔ 結果を保存: {}", output.display());
            }

            println!("\n✅ 解析完了");
        }

        Commands::Cook { image, from, diet, no_voice } => {
            println!("🍳 culina - 調理モード\n");

            let (tx, rx) = mpsc::channel();
            let command = if no_voice {
                None
            } else {
                config
                    .speech_command
                    .as_deref()
                    .and_then(SpeechCommand::parse)
                    .or_else(SpeechCommand::detect)
            };
            if command.is_none() && !no_voice {
                println!("- 読み上げコマンドが見つかりません（読み上げ無効）");
            }

            let mut controller = AppController::new(CommandSpeech::new(command, tx));
            controller.set_dietary_filter(diet);

            let gateway: Option<Box<dyn RecipeGateway>> = match build_gateway(&config) {
                Ok(gateway) => Some(Box::new(gateway)),
                Err(CulinaError::MissingApiKey) => {
                    tracing::warn!("no API key configured; photo analysis disabled");
                    None
                }
                Err(e) => return Err(e),
            };

            if let Some(path) = from {
                let content = std::fs::read_to_string(&path)?;
                let analysis = parse_analysis_response(&content)?;
                println!("✔ {}件のレシピを読み込み: {}", analysis.recipes.len(), path.display());
                controller.load_analysis(analysis);
            }

            let mut session = session::Session::new(
                controller,
                gateway,
                rx,
                config.max_image_size,
                config.model.clone(),
            );
            if let Some(image) = image {
                session.analyze(image).await?;
            }
            session.run().await?;
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  最大画像サイズ: {}px", config.max_image_size);
                println!(
                    "  タイムアウト: {}",
                    config
                        .timeout_seconds
                        .map(|s| format!("{}秒", s))
                        .unwrap_or_else(|| "なし".into())
                );
                println!(
                    "  読み上げコマンド: {}",
                    config.speech_command.as_deref().unwrap_or("自動検出")
                );
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "culina_vision=debug,culina_common=debug"
    } else {
        "culina_vision=info,culina_common=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_gateway(config: &Config) -> Result<GeminiGateway> {
    let api_key = config.get_api_key()?;
    Ok(GeminiGateway::new(api_key, config.model.clone())
        .with_timeout(config.timeout_seconds.map(Duration::from_secs)))
}
