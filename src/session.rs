//! 対話モード
//!
//! 画面ごとにメニューを表示し、選ばれた `Intent` を `AppController` に適用する。

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use culina_common::{AppController, DietaryFilter, RecipeGateway, Screen, SpeechEngine, SpeechEvent, ViewState};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{CulinaError, Result};
use crate::image_loader;
use crate::render;

/// メニュー選択の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ScanFridge,
    ChooseDiet,
    Go(ViewState),
    SelectRecipe(String),
    NextStep,
    PrevStep,
    ToggleReadAloud,
    AddMissing,
    LeaveCooking,
    RemoveItem(String),
    ClearList,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub intent: Intent,
}

impl MenuItem {
    fn new(label: impl Into<String>, intent: Intent) -> Self {
        Self {
            label: label.into(),
            intent,
        }
    }
}

/// 全画面共通のナビゲーション
fn sidebar_items<S: SpeechEngine>(controller: &AppController<S>) -> Vec<MenuItem> {
    let shopping = match controller.shopping_count() {
        0 => "Shopping List".to_string(),
        n => format!("Shopping List ({})", n),
    };
    let mut items = Vec::new();
    if controller.view() != ViewState::Upload {
        items.push(MenuItem::new("📷 Scan Fridge", Intent::Go(ViewState::Upload)));
    }
    if !matches!(controller.view(), ViewState::Recipes | ViewState::Cooking) {
        items.push(MenuItem::new("📖 Recipes", Intent::Go(ViewState::Recipes)));
    }
    if controller.view() != ViewState::Shopping {
        items.push(MenuItem::new(format!("🛒 {}", shopping), Intent::Go(ViewState::Shopping)));
    }
    items.push(MenuItem::new(
        format!("🥗 Diet: {}", controller.dietary_filter().label()),
        Intent::ChooseDiet,
    ));
    items.push(MenuItem::new("Quit", Intent::Quit));
    items
}

/// 現在の画面のメニュー
pub fn menu<S: SpeechEngine>(controller: &AppController<S>) -> Vec<MenuItem> {
    let mut items = Vec::new();
    match controller.screen() {
        Screen::Upload { is_analyzing, .. } => {
            if !is_analyzing {
                items.push(MenuItem::new("Scan fridge photo...", Intent::ScanFridge));
            }
        }
        Screen::Recipes { recipes, .. } => {
            items.extend(
                recipes
                    .iter()
                    .map(|r| MenuItem::new(render::recipe_label(r), Intent::SelectRecipe(r.id.clone()))),
            );
        }
        Screen::Cooking { navigator, .. } => {
            if !navigator.is_last() {
                items.push(MenuItem::new("Next ▶", Intent::NextStep));
            }
            if !navigator.is_first() {
                items.push(MenuItem::new("◀ Previous", Intent::PrevStep));
            }
            if let Some(prompt) = controller.missing_prompt() {
                if !prompt.all_added {
                    items.push(MenuItem::new(prompt.button_label(), Intent::AddMissing));
                }
            }
            if controller.narration_available() {
                let label = if navigator.is_speaking() { "⏸ Pause" } else { "🔊 Read Aloud" };
                items.push(MenuItem::new(label, Intent::ToggleReadAloud));
            }
            items.push(MenuItem::new("← Back to Recipes", Intent::LeaveCooking));
        }
        Screen::Shopping { items: list } => {
            items.extend(
                list.iter()
                    .map(|item| MenuItem::new(format!("✕ Remove {}", item), Intent::RemoveItem(item.clone()))),
            );
            if !list.is_empty() {
                items.push(MenuItem::new("Clear All", Intent::ClearList));
            }
        }
    }
    items.extend(sidebar_items(controller));
    items
}

pub struct Session<S: SpeechEngine> {
    controller: AppController<S>,
    gateway: Option<Box<dyn RecipeGateway>>,
    events: Receiver<SpeechEvent>,
    max_image_size: u32,
    model: String,
}

impl<S: SpeechEngine> Session<S> {
    pub fn new(
        controller: AppController<S>,
        gateway: Option<Box<dyn RecipeGateway>>,
        events: Receiver<SpeechEvent>,
        max_image_size: u32,
        model: impl Into<String>,
    ) -> Self {
        Self {
            controller,
            gateway,
            events,
            max_image_size,
            model: model.into(),
        }
    }

    /// 読み上げエンジンからの通知をコントローラへ渡す
    pub fn drain_speech_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle_speech_event(event);
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.drain_speech_events();
            self.print_screen();

            let items = menu(&self.controller);
            let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
            let choice = Select::new()
                .with_prompt(self.controller.view().as_str())
                .items(&labels)
                .default(0)
                .interact()?;

            // 選択中に届いた読み上げ通知を先に反映
            self.drain_speech_events();
            let intent = items[choice].intent.clone();
            if !self.apply(intent).await? {
                break;
            }
        }
        println!("👋 Bye");
        Ok(())
    }

    fn print_screen(&self) {
        println!(
            "\n{}",
            render::sidebar_header(
                self.controller.dietary_filter(),
                self.controller.shopping_count(),
                &self.model
            )
        );
        println!("{}", "─".repeat(60));

        match self.controller.screen() {
            Screen::Upload { error, .. } => {
                println!("📷 Scan your fridge");
                println!("Take a photo of your open fridge and get recipe ideas.");
                if let Some(error) = error {
                    println!("❌ {}", error);
                }
            }
            Screen::Recipes {
                recipes,
                detected_ingredients,
            } => {
                if recipes.is_empty() {
                    println!("No recipes yet. Scan your fridge to get started.");
                } else {
                    println!("Found ingredients: {}", render::ingredient_chips(detected_ingredients));
                    for (i, recipe) in recipes.iter().enumerate() {
                        println!("{}", render::recipe_card(i, recipe));
                    }
                }
            }
            Screen::Cooking { recipe, navigator } => {
                let missing = self.controller.missing_prompt();
                println!("{}", render::cooking_panel(recipe, navigator, missing.as_ref()));
            }
            Screen::Shopping { items } => {
                if items.is_empty() {
                    println!("Your shopping list is empty.");
                } else {
                    println!("🛒 Shopping List");
                    for item in items {
                        println!("  • {}", item);
                    }
                }
            }
        }
        println!();
    }

    /// `false` で終了
    pub async fn apply(&mut self, intent: Intent) -> Result<bool> {
        match intent {
            Intent::ScanFridge => {
                let path: String = Input::new().with_prompt("Photo path").interact_text()?;
                self.analyze(PathBuf::from(path.trim())).await?;
            }
            Intent::ChooseDiet => {
                let labels: Vec<&str> = DietaryFilter::ALL.iter().map(|f| f.label()).collect();
                let current = DietaryFilter::ALL
                    .iter()
                    .position(|f| *f == self.controller.dietary_filter())
                    .unwrap_or(0);
                let choice = Select::new()
                    .with_prompt("Dietary preference")
                    .items(&labels)
                    .default(current)
                    .interact()?;
                self.controller.set_dietary_filter(DietaryFilter::ALL[choice]);
            }
            Intent::Go(view) => self.controller.set_view(view),
            Intent::SelectRecipe(id) => {
                self.controller.select_recipe_by_id(&id);
            }
            Intent::NextStep => {
                self.controller.next_step();
            }
            Intent::PrevStep => {
                self.controller.prev_step();
            }
            Intent::ToggleReadAloud => self.controller.toggle_read_aloud(),
            Intent::AddMissing => {
                let added = self.controller.add_missing_to_shopping_list();
                println!("{}", render::added_to_list(added));
            }
            Intent::LeaveCooking => self.controller.leave_cooking(),
            Intent::RemoveItem(item) => self.controller.remove_from_shopping_list(&item),
            Intent::ClearList => self.controller.clear_shopping_list(),
            Intent::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// 画像を読み込んで解析する。読み込み失敗はメッセージのみで継続
    pub async fn analyze(&mut self, path: PathBuf) -> Result<()> {
        let Some(gateway) = self.gateway.as_deref() else {
            println!("❌ {}", CulinaError::MissingApiKey);
            return Ok(());
        };

        let image = match image_loader::load_image(&path, self.max_image_size) {
            Ok(image) => image,
            Err(e) => {
                println!("❌ {}", e);
                return Ok(());
            }
        };

        let spinner = analyzing_spinner();
        let result = self.controller.select_image(gateway, &image).await;
        spinner.finish_and_clear();
        result?;

        if let Some(error) = self.controller.error() {
            println!("❌ {}", error);
        } else {
            println!("{}", render::recipes_found(self.controller.recipes().len()));
        }
        Ok(())
    }
}

pub fn analyzing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Analyzing your fridge...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
