//! Language negotiation and translation fallback.

pub mod negotiator;
pub mod resolver;

pub use negotiator::LanguageNegotiator;
pub use resolver::{ResolvedTranslation, TranslationResolver};
