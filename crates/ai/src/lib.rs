//! `resale-ai`
//!
//! **Responsibility:** optional image-enhancement boundary (attribute guessing
//! and marketing scene generation by an external AI service).
//!
//! This crate is **not** part of the storage path:
//! - It never calls the inventory repository.
//! - Its failures never block inventory CRUD; callers go through the
//!   `best_effort_*` helpers, which degrade to "nothing happened".

pub mod enhancer;
pub mod result;

pub use enhancer::{
    EncodedImage, ImageEnhancer, best_effort_analyze, best_effort_scene, fallback_scene_prompt,
};
pub use result::{AiError, AttributeGuess};
