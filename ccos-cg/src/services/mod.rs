//! Content generation services

pub mod decision_engine;
pub mod genai_client;
pub mod keyword_planner;
pub mod pipeline;
pub mod policies;
pub mod prompt_composer;
pub mod rule_auditor;
pub mod stages;
pub mod structured_data;
pub mod tracking_link;
pub mod wordpress_publisher;

pub use genai_client::{GeminiClient, GenerativeService};
pub use pipeline::ContentPipeline;
pub use wordpress_publisher::WordPressPublisher;
