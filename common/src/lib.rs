//! CulinaVision Common Library
//!
//! CLIとWeb(WASM)で共有される型・画面状態コントローラ・解析ゲートウェイの契約

pub mod types;
pub mod error;
pub mod prompts;
pub mod parser;
pub mod gemini;
pub mod gateway;
pub mod shopping;
pub mod speech;
pub mod cooking;
pub mod controller;

pub use types::{AnalysisResult, DietaryFilter, Difficulty, ImageData, Recipe, ViewState};
pub use error::{Error, Result};
pub use prompts::{build_analysis_prompt, response_schema, RECIPE_COUNT};
pub use parser::{extract_json, parse_analysis_response};
pub use gateway::{RecipeGateway, GENERIC_ANALYSIS_ERROR};
pub use shopping::ShoppingList;
pub use speech::{NoopSpeech, SpeechEngine, SpeechEvent, UtteranceId};
pub use cooking::{NarrationState, StepNavigator};
pub use controller::{AppController, MissingPrompt, Screen};
