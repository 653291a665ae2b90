use crate::config::ProviderKind;

pub struct ProviderInfo {
    pub kind: ProviderKind,
    pub env_var: &'static str,
    pub default_endpoint: &'static str,
    pub models: &'static [ModelInfo],
}

pub struct ModelInfo {
    pub id: &'static str,
    pub recommended: bool,
}

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        kind: ProviderKind::Gemini,
        env_var: "GEMINI_API_KEY",
        default_endpoint: "https://generativelanguage.googleapis.com/v1beta",
        models: &[
            ModelInfo { id: "gemini-2.5-flash", recommended: true },
            ModelInfo { id: "gemini-2.5-pro", recommended: false },
        ],
    },
    ProviderInfo {
        kind: ProviderKind::OpenRouter,
        env_var: "OPENROUTER_API_KEY",
        default_endpoint: "https://openrouter.ai/api/v1",
        models: &[
            ModelInfo { id: "openrouter/auto", recommended: true },
            ModelInfo { id: "google/gemini-2.5-flash", recommended: false },
            ModelInfo { id: "deepseek/deepseek-chat-v3", recommended: false },
        ],
    },
];

pub fn provider_info(kind: ProviderKind) -> &'static ProviderInfo {
    // Every ProviderKind has exactly one entry
    match kind {
        ProviderKind::Gemini => &PROVIDERS[0],
        ProviderKind::OpenRouter => &PROVIDERS[1],
    }
}

pub fn default_model(kind: ProviderKind) -> &'static str {
    let provider = provider_info(kind);
    provider.models.iter()
        .find(|m| m.recommended)
        .map(|m| m.id)
        .unwrap_or(provider.models[0].id)
}
