//! CulinaVision CLI
//!
//! 冷蔵庫の写真をGeminiで解析し、レシピ提案と音声ガイド付きの調理モードを端末で提供する。

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod image_loader;
pub mod render;
pub mod session;
pub mod speech;
