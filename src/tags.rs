//! Language-tag parsing and building contract.
//!
//! Tag grammar is owned by an external identity service; this crate treats
//! tags as opaque validated strings. [`TagService`] is the seam the real
//! parser/builder is injected through. [`BasicTags`] is a minimal reference
//! implementation used by the in-memory store and the tests; it joins
//! subtags and compares case-insensitively without grammar validation.

/// The subtag components of a parsed language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// Language subtag code
    pub language: String,
    /// Script subtag, if present
    pub script: Option<String>,
    /// Region subtag, if present
    pub region: Option<String>,
    /// Variant subtags in order; private-use runs are kept as one
    /// `x-`-prefixed variant
    pub variants: Vec<String>,
}

/// External language-tag parser/builder.
pub trait TagService {
    /// Splits a tag into its subtag components, or `None` if the text is not
    /// a usable tag.
    fn try_parse(&self, text: &str) -> Option<ParsedTag>;

    /// Builds the canonical tag for the given subtag components.
    fn build(
        &self,
        language: &str,
        script: Option<&str>,
        region: Option<&str>,
        variants: &[String],
    ) -> String;

    /// Whether two tags name the same writing system (case- and
    /// structure-insensitive).
    fn equivalent(&self, a: &str, b: &str) -> bool;
}

/// Minimal reference tag service: hyphen-joined subtags, ASCII
/// case-insensitive equivalence, heuristic parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTags;

impl BasicTags {
    fn looks_like_script(part: &str) -> bool {
        part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic())
    }

    fn looks_like_region(part: &str) -> bool {
        (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
            || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
    }
}

impl TagService for BasicTags {
    fn try_parse(&self, text: &str) -> Option<ParsedTag> {
        let mut parts = text.split('-');
        let language = parts.next()?.to_string();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let mut script = None;
        let mut region = None;
        let mut variants = Vec::new();
        let mut private_use: Option<String> = None;
        for part in parts {
            if part.is_empty() {
                return None;
            }
            if let Some(private) = private_use.as_mut() {
                private.push('-');
                private.push_str(part);
            } else if part.eq_ignore_ascii_case("x") {
                private_use = Some("x".to_string());
            } else if script.is_none() && region.is_none() && variants.is_empty()
                && Self::looks_like_script(part)
            {
                script = Some(part.to_string());
            } else if region.is_none() && variants.is_empty() && Self::looks_like_region(part) {
                region = Some(part.to_string());
            } else {
                variants.push(part.to_string());
            }
        }
        if let Some(private) = private_use {
            variants.push(private);
        }

        Some(ParsedTag {
            language,
            script,
            region,
            variants,
        })
    }

    fn build(
        &self,
        language: &str,
        script: Option<&str>,
        region: Option<&str>,
        variants: &[String],
    ) -> String {
        let mut tag = language.to_string();
        if let Some(script) = script {
            tag.push('-');
            tag.push_str(script);
        }
        if let Some(region) = region {
            tag.push('-');
            tag.push_str(region);
        }
        for variant in variants {
            tag.push('-');
            tag.push_str(variant);
        }
        tag
    }

    fn equivalent(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}
