//! アプリケーションの画面状態コントローラ
//!
//! 画面・食事制限・解析結果・買い物リスト・選択中レシピ・調理モードを1つの構造体で所有し、
//! ユーザー操作を状態遷移に変換する。UIスレッド専用でロックは持たない。

use crate::cooking::StepNavigator;
use crate::error::{Error, Result};
use crate::gateway::{RecipeGateway, GENERIC_ANALYSIS_ERROR};
use crate::shopping::ShoppingList;
use crate::speech::{SpeechEngine, SpeechEvent};
use crate::types::{AnalysisResult, DietaryFilter, ImageData, Recipe, ViewState};

/// 描画対象の画面（状態の借用ビュー）
#[derive(Debug)]
pub enum Screen<'a> {
    Upload {
        is_analyzing: bool,
        error: Option<&'a str>,
    },
    Recipes {
        recipes: &'a [Recipe],
        detected_ingredients: &'a [String],
    },
    Cooking {
        recipe: &'a Recipe,
        navigator: &'a StepNavigator,
    },
    Shopping {
        items: &'a [String],
    },
}

/// 1ステップ目に表示する「不足食材をまとめて追加」
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPrompt<'a> {
    pub items: &'a [String],
    /// 全て買い物リストにある場合はボタンを無効にする
    pub all_added: bool,
}

impl MissingPrompt<'_> {
    pub fn button_label(&self) -> &'static str {
        if self.all_added {
            "Added to List"
        } else {
            "Add All to Shopping List"
        }
    }
}

pub struct AppController<S: SpeechEngine> {
    view: ViewState,
    dietary_filter: DietaryFilter,
    recipes: Vec<Recipe>,
    detected_ingredients: Vec<String>,
    shopping_list: ShoppingList,
    selected_recipe: Option<Recipe>,
    cooking: Option<StepNavigator>,
    is_analyzing: bool,
    error: Option<String>,
    speech: S,
}

impl<S: SpeechEngine> AppController<S> {
    pub fn new(speech: S) -> Self {
        Self {
            view: ViewState::Upload,
            dietary_filter: DietaryFilter::None,
            recipes: Vec::new(),
            detected_ingredients: Vec::new(),
            shopping_list: ShoppingList::new(),
            selected_recipe: None,
            cooking: None,
            is_analyzing: false,
            error: None,
            speech,
        }
    }

    // =============================================
    // 読み取り
    // =============================================

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn dietary_filter(&self) -> DietaryFilter {
        self.dietary_filter
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn detected_ingredients(&self) -> &[String] {
        &self.detected_ingredients
    }

    pub fn shopping_list(&self) -> &ShoppingList {
        &self.shopping_list
    }

    pub fn shopping_count(&self) -> usize {
        self.shopping_list.len()
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.selected_recipe.as_ref()
    }

    pub fn navigator(&self) -> Option<&StepNavigator> {
        self.cooking.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn narration_available(&self) -> bool {
        self.speech.is_available()
    }

    /// 現在の画面。調理中なのにレシピが無い場合はレシピ一覧として扱う
    pub fn screen(&self) -> Screen<'_> {
        match self.view {
            ViewState::Upload => Screen::Upload {
                is_analyzing: self.is_analyzing,
                error: self.error(),
            },
            ViewState::Cooking => match (&self.selected_recipe, &self.cooking) {
                (Some(recipe), Some(navigator)) => Screen::Cooking { recipe, navigator },
                _ => self.recipes_screen(),
            },
            ViewState::Recipes => self.recipes_screen(),
            ViewState::Shopping => Screen::Shopping {
                items: self.shopping_list.items(),
            },
        }
    }

    fn recipes_screen(&self) -> Screen<'_> {
        Screen::Recipes {
            recipes: &self.recipes,
            detected_ingredients: &self.detected_ingredients,
        }
    }

    // =============================================
    // 画像解析
    // =============================================

    /// 解析開始。実行中なら拒否し、送信時点の食事制限を返す
    pub fn begin_analysis(&mut self) -> Result<DietaryFilter> {
        if self.is_analyzing {
            tracing::warn!("image submitted while another analysis is in flight");
            return Err(Error::AnalysisInProgress);
        }
        self.is_analyzing = true;
        self.error = None;
        Ok(self.dietary_filter)
    }

    /// 解析完了。失敗時は汎用メッセージのみ保持し、画面は移動しない
    pub fn finish_analysis(&mut self, result: Result<AnalysisResult>) {
        self.is_analyzing = false;
        match result {
            Ok(analysis) => {
                tracing::info!(
                    ingredients = analysis.identified_ingredients.len(),
                    recipes = analysis.recipes.len(),
                    "analysis complete"
                );
                self.detected_ingredients = analysis.identified_ingredients;
                self.recipes = analysis.recipes;
                self.set_view(ViewState::Recipes);
            }
            Err(e) => {
                tracing::error!(error = %e, "analysis failed");
                self.error = Some(GENERIC_ANALYSIS_ERROR.to_string());
            }
        }
    }

    /// 画像を解析してレシピ一覧へ進む
    ///
    /// 解析の失敗は `error()` に反映され、`Err` になるのは実行中の再送信のみ。
    pub async fn select_image<G>(&mut self, gateway: &G, image: &ImageData) -> Result<()>
    where
        G: RecipeGateway + ?Sized,
    {
        let filter = self.begin_analysis()?;
        let result = gateway.analyze(image, filter).await;
        self.finish_analysis(result);
        Ok(())
    }

    /// 直接結果を読み込む（保存済みJSONなど）
    pub fn load_analysis(&mut self, analysis: AnalysisResult) {
        self.error = None;
        self.finish_analysis(Ok(analysis));
    }

    // =============================================
    // レシピ選択・画面遷移
    // =============================================

    pub fn select_recipe(&mut self, recipe: Recipe) {
        self.stop_narration();
        self.cooking = Some(StepNavigator::new(recipe.steps.clone()));
        self.selected_recipe = Some(recipe);
        self.view = ViewState::Cooking;
        tracing::debug!(view = self.view.as_str(), "recipe selected");
    }

    pub fn select_recipe_by_id(&mut self, id: &str) -> bool {
        let Some(recipe) = self.recipes.iter().find(|r| r.id == id).cloned() else {
            return false;
        };
        self.select_recipe(recipe);
        true
    }

    pub fn set_view(&mut self, view: ViewState) {
        if self.view == ViewState::Cooking && view != ViewState::Cooking {
            self.stop_narration();
            self.cooking = None;
        }

        self.view = match view {
            ViewState::Cooking => match &self.selected_recipe {
                Some(recipe) => {
                    if self.cooking.is_none() {
                        self.cooking = Some(StepNavigator::new(recipe.steps.clone()));
                    }
                    ViewState::Cooking
                }
                None => ViewState::Recipes,
            },
            other => other,
        };
        tracing::debug!(view = self.view.as_str(), "view changed");
    }

    /// 調理モードの「戻る」
    pub fn leave_cooking(&mut self) {
        self.set_view(ViewState::Recipes);
    }

    pub fn set_dietary_filter(&mut self, filter: DietaryFilter) {
        self.dietary_filter = filter;
    }

    // =============================================
    // 買い物リスト
    // =============================================

    pub fn add_to_shopping_list<I, T>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.shopping_list.add_all(items)
    }

    pub fn remove_from_shopping_list(&mut self, item: &str) {
        self.shopping_list.remove(item);
    }

    pub fn clear_shopping_list(&mut self) {
        self.shopping_list.clear();
    }

    // =============================================
    // 調理モード
    // =============================================

    pub fn toggle_read_aloud(&mut self) {
        if let Some(nav) = self.cooking.as_mut() {
            nav.toggle_read_aloud(&mut self.speech);
        }
    }

    pub fn next_step(&mut self) -> bool {
        match self.cooking.as_mut() {
            Some(nav) => nav.next_step(&mut self.speech),
            None => false,
        }
    }

    pub fn prev_step(&mut self) -> bool {
        match self.cooking.as_mut() {
            Some(nav) => nav.prev_step(&mut self.speech),
            None => false,
        }
    }

    pub fn handle_speech_event(&mut self, event: SpeechEvent) {
        if let Some(nav) = self.cooking.as_mut() {
            nav.handle_speech_event(event);
        }
    }

    /// 1ステップ目かつ不足食材がある場合のみ
    pub fn missing_prompt(&self) -> Option<MissingPrompt<'_>> {
        let nav = self.cooking.as_ref()?;
        let recipe = self.selected_recipe.as_ref()?;
        if !nav.is_first() || recipe.missing_ingredients.is_empty() {
            return None;
        }
        Some(MissingPrompt {
            items: &recipe.missing_ingredients,
            all_added: self.shopping_list.contains_all(&recipe.missing_ingredients),
        })
    }

    pub fn add_missing_to_shopping_list(&mut self) -> usize {
        match &self.selected_recipe {
            Some(recipe) => self.shopping_list.add_all(recipe.missing_ingredients.iter().cloned()),
            None => 0,
        }
    }

    fn stop_narration(&mut self) {
        if let Some(nav) = self.cooking.as_mut() {
            nav.stop(&mut self.speech);
        }
    }
}

impl<S: SpeechEngine> Drop for AppController<S> {
    fn drop(&mut self) {
        self.stop_narration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooking::NarrationState;
    use crate::speech::{NoopSpeech, UtteranceId};
    use crate::types::Difficulty;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// 呼び出しを共有ログに記録する読み上げエンジン
    #[derive(Default)]
    struct RecordingSpeech {
        log: Rc<RefCell<Vec<String>>>,
        active: Rc<Cell<Option<UtteranceId>>>,
        next: u64,
    }

    impl SpeechEngine for RecordingSpeech {
        fn is_available(&self) -> bool {
            true
        }

        fn speak(&mut self, text: &str) -> Result<UtteranceId> {
            self.next += 1;
            let id = UtteranceId(self.next);
            self.log.borrow_mut().push(format!("speak {}", text));
            self.active.set(Some(id));
            Ok(id)
        }

        fn cancel(&mut self, utterance: UtteranceId) {
            self.log.borrow_mut().push(format!("cancel {}", utterance.0));
            if self.active.get() == Some(utterance) {
                self.active.set(None);
            }
        }
    }

    struct StubGateway {
        result: fn() -> Result<AnalysisResult>,
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl RecipeGateway for StubGateway {
        async fn analyze(&self, _image: &ImageData, _filter: DietaryFilter) -> Result<AnalysisResult> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    fn omelette() -> Recipe {
        Recipe {
            id: "r1".into(),
            title: "Omelette".into(),
            description: "Eggs".into(),
            difficulty: Difficulty::Easy,
            prep_time: "10 min".into(),
            calories: 250,
            ingredients: vec!["egg".into(), "milk".into()],
            missing_ingredients: vec!["cheese".into()],
            steps: vec!["Crack eggs".into(), "Whisk".into(), "Cook".into()],
            tags: vec![],
        }
    }

    fn fridge() -> Result<AnalysisResult> {
        Ok(AnalysisResult {
            identified_ingredients: vec!["egg".into(), "milk".into()],
            recipes: vec![omelette()],
        })
    }

    fn network_down() -> Result<AnalysisResult> {
        Err(Error::Gateway("connection refused".into()))
    }

    fn image() -> ImageData {
        ImageData::new("image/jpeg", vec![0xff, 0xd8])
    }

    #[test]
    fn test_initial_state() {
        let controller = AppController::new(NoopSpeech);
        assert_eq!(controller.view(), ViewState::Upload);
        assert_eq!(controller.dietary_filter(), DietaryFilter::None);
        assert!(!controller.is_analyzing());
        assert!(controller.error().is_none());
        assert!(matches!(controller.screen(), Screen::Upload { is_analyzing: false, error: None }));
    }

    #[test]
    fn test_select_image_success_moves_to_recipes() {
        let mut controller = AppController::new(NoopSpeech);
        let gateway = StubGateway { result: fridge, calls: Cell::new(0) };

        block_on(controller.select_image(&gateway, &image())).unwrap();

        assert_eq!(controller.view(), ViewState::Recipes);
        assert_eq!(controller.detected_ingredients(), &["egg", "milk"]);
        assert_eq!(controller.recipes().len(), 1);
        assert!(!controller.is_analyzing());
        assert_eq!(gateway.calls.get(), 1);
    }

    #[test]
    fn test_select_image_failure_stays_on_upload() {
        let mut controller = AppController::new(NoopSpeech);
        let gateway = StubGateway { result: network_down, calls: Cell::new(0) };

        block_on(controller.select_image(&gateway, &image())).unwrap();

        assert_eq!(controller.view(), ViewState::Upload);
        assert_eq!(controller.error(), Some(GENERIC_ANALYSIS_ERROR));
        assert!(!controller.is_analyzing());
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let mut controller = AppController::new(NoopSpeech);
        controller.load_analysis(fridge().unwrap());
        controller.set_view(ViewState::Upload);

        let gateway = StubGateway { result: network_down, calls: Cell::new(0) };
        block_on(controller.select_image(&gateway, &image())).unwrap();

        assert_eq!(controller.recipes().len(), 1);
        assert_eq!(controller.view(), ViewState::Upload);
    }

    #[test]
    fn test_new_submission_clears_error() {
        let mut controller = AppController::new(NoopSpeech);
        controller.finish_analysis(network_down());
        assert!(controller.error().is_some());

        controller.begin_analysis().unwrap();
        assert!(controller.error().is_none());
        assert!(controller.is_analyzing());
    }

    #[test]
    fn test_in_flight_guard_rejects_second_submission() {
        let mut controller = AppController::new(NoopSpeech);
        controller.set_dietary_filter(DietaryFilter::Vegan);
        assert_eq!(controller.begin_analysis().unwrap(), DietaryFilter::Vegan);
        assert!(matches!(controller.begin_analysis(), Err(Error::AnalysisInProgress)));

        let gateway = StubGateway { result: fridge, calls: Cell::new(0) };
        let result = block_on(controller.select_image(&gateway, &image()));
        assert!(matches!(result, Err(Error::AnalysisInProgress)));
        assert_eq!(gateway.calls.get(), 0);
        assert!(controller.is_analyzing());
    }

    #[test]
    fn test_select_recipe_enters_cooking_at_step_zero() {
        let mut controller = AppController::new(NoopSpeech);
        controller.load_analysis(fridge().unwrap());
        assert!(controller.select_recipe_by_id("r1"));

        assert_eq!(controller.view(), ViewState::Cooking);
        let nav = controller.navigator().unwrap();
        assert_eq!(nav.current_step(), 0);
        assert_eq!(nav.narration(), NarrationState::Idle);
        assert!(matches!(controller.screen(), Screen::Cooking { .. }));
    }

    #[test]
    fn test_select_unknown_recipe_is_noop() {
        let mut controller = AppController::new(NoopSpeech);
        controller.load_analysis(fridge().unwrap());
        assert!(!controller.select_recipe_by_id("nope"));
        assert_eq!(controller.view(), ViewState::Recipes);
    }

    #[test]
    fn test_reselect_resets_cursor() {
        let mut controller = AppController::new(NoopSpeech);
        controller.select_recipe(omelette());
        controller.next_step();
        controller.next_step();
        assert_eq!(controller.navigator().unwrap().current_step(), 2);

        controller.leave_cooking();
        controller.select_recipe(omelette());
        assert_eq!(controller.navigator().unwrap().current_step(), 0);
    }

    #[test]
    fn test_cooking_without_selection_redirects_to_recipes() {
        let mut controller = AppController::new(NoopSpeech);
        controller.set_view(ViewState::Cooking);
        assert_eq!(controller.view(), ViewState::Recipes);
        assert!(matches!(controller.screen(), Screen::Recipes { .. }));
    }

    #[test]
    fn test_leaving_cooking_discards_navigator() {
        let mut controller = AppController::new(NoopSpeech);
        controller.select_recipe(omelette());
        controller.next_step();
        controller.set_view(ViewState::Shopping);
        assert!(controller.navigator().is_none());

        // 選択は残るので再入場はステップ0から
        controller.set_view(ViewState::Cooking);
        assert_eq!(controller.view(), ViewState::Cooking);
        assert_eq!(controller.navigator().unwrap().current_step(), 0);
    }

    #[test]
    fn test_missing_prompt_lifecycle() {
        let mut controller = AppController::new(NoopSpeech);
        controller.select_recipe(omelette());

        let prompt = controller.missing_prompt().unwrap();
        assert_eq!(prompt.items, &["cheese"]);
        assert!(!prompt.all_added);
        assert_eq!(prompt.button_label(), "Add All to Shopping List");

        assert_eq!(controller.add_missing_to_shopping_list(), 1);
        assert_eq!(controller.shopping_list().items(), &["cheese"]);
        let prompt = controller.missing_prompt().unwrap();
        assert!(prompt.all_added);
        assert_eq!(prompt.button_label(), "Added to List");

        controller.next_step();
        assert!(controller.missing_prompt().is_none());
    }

    #[test]
    fn test_missing_prompt_hidden_when_nothing_missing() {
        let mut controller = AppController::new(NoopSpeech);
        let mut recipe = omelette();
        recipe.missing_ingredients.clear();
        controller.select_recipe(recipe);
        assert!(controller.missing_prompt().is_none());
    }

    #[test]
    fn test_shopping_list_operations() {
        let mut controller = AppController::new(NoopSpeech);
        controller.add_to_shopping_list(["a", "b"]);
        controller.add_to_shopping_list(["b", "c"]);
        assert_eq!(controller.shopping_list().items(), &["a", "b", "c"]);
        assert_eq!(controller.shopping_count(), 3);

        controller.remove_from_shopping_list("b");
        assert!(!controller.shopping_list().contains("b"));

        controller.clear_shopping_list();
        assert_eq!(controller.shopping_count(), 0);
    }

    #[test]
    fn test_shopping_list_survives_navigation() {
        let mut controller = AppController::new(NoopSpeech);
        controller.add_to_shopping_list(["flour"]);
        for view in [ViewState::Recipes, ViewState::Shopping, ViewState::Upload] {
            controller.set_view(view);
        }
        assert_eq!(controller.shopping_list().items(), &["flour"]);
        assert!(matches!(controller.screen(), Screen::Upload { .. }));
    }

    #[test]
    fn test_filter_does_not_touch_existing_recipes() {
        let mut controller = AppController::new(NoopSpeech);
        controller.load_analysis(fridge().unwrap());
        controller.set_dietary_filter(DietaryFilter::Paleo);
        assert_eq!(controller.recipes().len(), 1);
    }

    #[test]
    fn test_speech_events_without_cooking_are_ignored() {
        let mut controller = AppController::new(NoopSpeech);
        controller.handle_speech_event(SpeechEvent::Ended(UtteranceId(9)));
        assert!(!controller.next_step());
        assert!(!controller.prev_step());
    }

    #[test]
    fn test_leaving_cooking_for_any_view_cancels_narration() {
        let speech = RecordingSpeech::default();
        let log = Rc::clone(&speech.log);
        let active = Rc::clone(&speech.active);
        let mut controller = AppController::new(speech);
        controller.select_recipe(omelette());

        controller.toggle_read_aloud();
        controller.set_view(ViewState::Shopping);
        assert!(active.get().is_none());

        controller.set_view(ViewState::Cooking);
        controller.toggle_read_aloud();
        controller.set_view(ViewState::Upload);
        assert!(active.get().is_none());

        assert_eq!(
            *log.borrow(),
            vec!["speak Crack eggs", "cancel 1", "speak Crack eggs", "cancel 2"]
        );
    }

    #[test]
    fn test_drop_cancels_narration() {
        let speech = RecordingSpeech::default();
        let log = Rc::clone(&speech.log);
        let active = Rc::clone(&speech.active);
        let mut controller = AppController::new(speech);
        controller.select_recipe(omelette());
        controller.toggle_read_aloud();
        assert_eq!(active.get(), Some(UtteranceId(1)));

        drop(controller);

        assert_eq!(*log.borrow(), vec!["speak Crack eggs", "cancel 1"]);
        assert!(active.get().is_none());
    }

    #[test]
    fn test_drop_without_narration_is_silent() {
        let speech = RecordingSpeech::default();
        let log = Rc::clone(&speech.log);
        let mut controller = AppController::new(speech);
        controller.select_recipe(omelette());

        drop(controller);

        assert!(log.borrow().is_empty());
    }
}
