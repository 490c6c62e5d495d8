//! Cache key scheme.
//!
//! The key format is stable: entries written by one process version
//! must be readable and invalidatable by another.

use polyconf_core::LanguageCode;

/// Key prefix for domain-name lookups.
pub const DOMAIN_PREFIX: &str = "domain:config:";

/// Key prefix for configuration-id lookups.
pub const CONFIG_PREFIX: &str = "config:";

/// Key for a resolved configuration looked up by domain name.
pub fn domain_key(name: &str) -> String {
    format!("{DOMAIN_PREFIX}{name}")
}

/// Key for a resolved configuration looked up by configuration id and
/// language.
pub fn config_lang_key(config_id: i64, language: &LanguageCode) -> String {
    format!("{CONFIG_PREFIX}{config_id}:lang:{}", language.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format_is_stable() {
        assert_eq!(domain_key("example.com"), "domain:config:example.com");

        let zh = LanguageCode::parse("zh-CN").unwrap();
        assert_eq!(config_lang_key(42, &zh), "config:42:lang:zh-cn");
    }
}
