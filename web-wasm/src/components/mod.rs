pub mod cooking_mode;
pub mod recipe_list;
pub mod shopping_list;
pub mod sidebar;
pub mod upload_view;
