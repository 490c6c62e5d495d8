//! Quality-value language negotiation.

use std::cmp::Ordering;
use std::collections::HashSet;

use polyconf_core::LanguageCode;

/// Negotiates the language to serve from an explicit override and a
/// ranked preference header.
///
/// The output is always a member of the supported set, falling back to
/// the configured default when nothing matches. The supported set and
/// the default come from configuration, never from code.
#[derive(Debug, Clone)]
pub struct LanguageNegotiator {
    supported: HashSet<LanguageCode>,
    default: LanguageCode,
}

impl LanguageNegotiator {
    /// Creates a negotiator. The default language is always treated as
    /// supported.
    pub fn new(supported: impl IntoIterator<Item = LanguageCode>, default: LanguageCode) -> Self {
        let mut supported: HashSet<LanguageCode> = supported.into_iter().collect();
        supported.insert(default.clone());
        Self { supported, default }
    }

    /// The configured default language.
    pub fn default_language(&self) -> &LanguageCode {
        &self.default
    }

    /// Whether a code is in the supported set.
    pub fn is_supported(&self, code: &LanguageCode) -> bool {
        self.supported.contains(code)
    }

    /// Picks the language to serve.
    ///
    /// An explicit override that normalizes to a supported code wins
    /// outright. Otherwise the header is parsed into `(tag, q)` pairs,
    /// ranked descending by `q` with header order breaking ties, and
    /// the first supported tag wins. If nothing parses or nothing
    /// matches, the configured default is returned.
    pub fn negotiate(&self, explicit: Option<&str>, header: Option<&str>) -> LanguageCode {
        if let Some(tag) = explicit
            && let Ok(code) = LanguageCode::parse(tag)
            && self.supported.contains(&code)
        {
            return code;
        }

        if let Some(header) = header {
            for (code, _) in parse_preferences(header) {
                if self.supported.contains(&code) {
                    return code;
                }
            }
        }

        self.default.clone()
    }
}

/// Parses a ranked preference header (`tag1;q=w1, tag2;q=w2, ...`)
/// into `(code, q)` pairs sorted descending by `q`.
///
/// A missing `q` defaults to 1.0. A malformed or out-of-range `q`
/// drops the pair, as does a malformed tag. Duplicate tags keep their
/// first occurrence. The sort is stable, so header order breaks ties.
pub fn parse_preferences(header: &str) -> Vec<(LanguageCode, f64)> {
    let mut seen = HashSet::new();
    let mut pairs: Vec<(LanguageCode, f64)> = Vec::new();

    for part in header.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let mut sections = part.split(';');
        let tag = sections.next().unwrap_or_default().trim();
        let Ok(code) = LanguageCode::parse(tag) else {
            continue;
        };

        let mut weight = 1.0f64;
        let mut valid = true;
        for param in sections {
            let param = param.trim();
            if let Some(raw) = param.strip_prefix("q=") {
                match raw.trim().parse::<f64>() {
                    Ok(q) if (0.0..=1.0).contains(&q) => weight = q,
                    _ => {
                        valid = false;
                        break;
                    }
                }
            }
        }
        if !valid || !seen.insert(code.clone()) {
            continue;
        }

        pairs.push((code, weight));
    }

    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(tag: &str) -> LanguageCode {
        LanguageCode::parse(tag).unwrap()
    }

    fn negotiator(supported: &[&str], default: &str) -> LanguageNegotiator {
        LanguageNegotiator::new(supported.iter().map(|t| language(t)), language(default))
    }

    #[test]
    fn explicit_override_outranks_the_header() {
        let n = negotiator(&["zh-cn", "en-us"], "zh-cn");
        let picked = n.negotiate(Some("en_US"), Some("zh-CN;q=1.0"));
        assert_eq!(picked.as_str(), "en-us");
    }

    #[test]
    fn unsupported_override_falls_through_to_the_header() {
        let n = negotiator(&["zh-cn", "en-us"], "zh-cn");
        let picked = n.negotiate(Some("ko-kr"), Some("en-US;q=0.9"));
        assert_eq!(picked.as_str(), "en-us");
    }

    #[test]
    fn highest_ranked_supported_tag_wins() {
        let n = negotiator(&["zh-cn"], "en-us");
        let picked = n.negotiate(None, Some("fr-FR;q=0.9,zh-CN;q=0.8,en-US;q=0.7"));
        assert_eq!(picked.as_str(), "zh-cn");
    }

    #[test]
    fn missing_q_defaults_to_one() {
        let n = negotiator(&["ja-jp", "en-us"], "en-us");
        let picked = n.negotiate(None, Some("ja-JP, en-US;q=0.9"));
        assert_eq!(picked.as_str(), "ja-jp");
    }

    #[test]
    fn ties_are_broken_by_header_order() {
        let pairs = parse_preferences("en-us;q=0.8, ja-jp;q=0.8, zh-cn;q=0.9");
        let tags: Vec<&str> = pairs.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(tags, ["zh-cn", "en-us", "ja-jp"]);
    }

    #[test]
    fn malformed_q_drops_the_pair() {
        let pairs = parse_preferences("en-us;q=abc, zh-cn;q=0.5, ja-jp;q=1.5");
        let tags: Vec<&str> = pairs.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(tags, ["zh-cn"]);
    }

    #[test]
    fn malformed_tags_are_dropped() {
        let pairs = parse_preferences(" , en us;q=0.9, zh_CN;q=0.8");
        let tags: Vec<&str> = pairs.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(tags, ["zh-cn"]);
    }

    #[test]
    fn duplicate_tags_keep_the_first_occurrence() {
        let pairs = parse_preferences("en-us;q=0.5, en-US;q=0.9");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, 0.5);
    }

    #[test]
    fn empty_or_unmatched_header_yields_the_default() {
        let n = negotiator(&["zh-cn", "en-us"], "zh-cn");
        assert_eq!(n.negotiate(None, None).as_str(), "zh-cn");
        assert_eq!(n.negotiate(None, Some("")).as_str(), "zh-cn");
        assert_eq!(n.negotiate(None, Some("ko-KR;q=0.9")).as_str(), "zh-cn");
    }

    #[test]
    fn default_is_always_supported() {
        let n = LanguageNegotiator::new([], language("zh-cn"));
        assert!(n.is_supported(&language("zh-cn")));
    }
}
