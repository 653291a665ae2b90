pub mod provider;
pub mod gemini;
pub mod openrouter;
pub mod upstream;
pub mod factory;
pub mod router;
pub mod types;
pub mod catalog;

pub use provider::LLMProvider;
pub use factory::create_provider;
pub use router::{FallbackRouter, ProviderSlot};
pub use types::{AskRequest, LLMResponse, ProviderResult, RoutedResponse};
