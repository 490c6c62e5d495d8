pub mod entities;
pub mod error;
pub mod language;
pub mod resolved;
pub mod time;

pub use entities::{Configuration, DomainRecord, Translation};
pub use error::{CoreError, Result};
pub use language::LanguageCode;
pub use resolved::{ResolvedConfiguration, merge};
pub use time::now_utc;
