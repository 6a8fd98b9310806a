//! Per-model settings and well-known model ids.

use std::collections::HashMap;

/// Well-known Qwen model ids. Any other id string is accepted as well.
pub mod models {
    pub const QWEN_MAX: &str = "qwen-max";
    pub const QWEN_MAX_LATEST: &str = "qwen-max-latest";
    pub const QWEN_MAX_2025_01_25: &str = "qwen-max-2025-01-25";
    pub const QWEN_PLUS: &str = "qwen-plus";
    pub const QWEN_PLUS_LATEST: &str = "qwen-plus-latest";
    pub const QWEN_PLUS_2025_01_25: &str = "qwen-plus-2025-01-25";
    pub const QWEN_TURBO: &str = "qwen-turbo";
    pub const QWEN_TURBO_LATEST: &str = "qwen-turbo-latest";
    pub const QWEN_TURBO_2024_11_01: &str = "qwen-turbo-2024-11-01";
    pub const QWEN2_5_14B_INSTRUCT_1M: &str = "qwen2.5-14b-instruct-1m";
    pub const QWEN2_5_7B_INSTRUCT_1M: &str = "qwen2.5-7b-instruct-1m";
    pub const QWEN2_5_72B_INSTRUCT: &str = "qwen2.5-72b-instruct";
    pub const QWEN2_5_32B_INSTRUCT: &str = "qwen2.5-32b-instruct";
    pub const QWEN2_5_14B_INSTRUCT: &str = "qwen2.5-14b-instruct";
    pub const QWEN2_5_7B_INSTRUCT: &str = "qwen2.5-7b-instruct";
    pub const QWEN2_57B_A14B_INSTRUCT: &str = "qwen2-57b-a14b-instruct";

    // Vision
    pub const QWEN_VL_MAX: &str = "qwen-vl-max";
    pub const QWEN_VL_PLUS: &str = "qwen-vl-plus";
    pub const QWEN2_5_VL_72B_INSTRUCT: &str = "qwen2.5-vl-72b-instruct";
    pub const QWEN2_5_VL_7B_INSTRUCT: &str = "qwen2.5-vl-7b-instruct";
    pub const QWEN2_5_VL_3B_INSTRUCT: &str = "qwen2.5-vl-3b-instruct";

    // Embeddings
    pub const TEXT_EMBEDDING_V3: &str = "text-embedding-v3";
}

/// Chat model settings
#[derive(Debug, Clone, Default)]
pub struct QwenChatSettings {
    /// End-user identifier for abuse monitoring
    pub user: Option<String>,
}

/// Completion model settings
#[derive(Debug, Clone, Default)]
pub struct QwenCompletionSettings {
    /// Echo back the prompt in addition to the completion
    pub echo: Option<bool>,
    /// Token id to bias (-100..=100)
    pub logit_bias: Option<HashMap<String, f64>>,
    /// Suffix that comes after a completion of inserted text
    pub suffix: Option<String>,
    pub user: Option<String>,
}

/// Embedding model settings
#[derive(Debug, Clone, Default)]
pub struct QwenEmbeddingSettings {
    pub user: Option<String>,
    /// `query` or `document` (backend default)
    pub text_type: Option<String>,
    /// Vector dimension: 1024 (backend default), 768 or 512
    pub dimensions: Option<u32>,
    /// `dense` (backend default), `sparse` or `dense&sparse`
    pub output_type: Option<String>,
}
