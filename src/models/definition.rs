//! Writing system definition entity.
//!
//! A `WritingSystemDefinition` is the identity-bearing record edited by the
//! working list: a language identity (language/script/region/variants) plus
//! the per-writing-system editing settings (fonts, keyboard, spell checker,
//! legacy encoding converter). The language tag itself is always derived from
//! the subtag components through the injected [`TagService`]; it is never
//! stored.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::tags::TagService;

/// Script subtag used for audio writing systems (unwritten content).
pub const AUDIO_SCRIPT: &str = "Zxxx";
/// Private-use variant marking an audio writing system.
pub const AUDIO_VARIANT: &str = "x-audio";
/// Registered variant marking an IPA transcription writing system.
pub const IPA_VARIANT: &str = "fonipa";

/// Language subtag: an ISO 639 code paired with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSubtag {
    /// Language code (e.g., "en", "fr", "seh")
    pub code: String,
    /// Human-readable language name (e.g., "English", "Sena")
    pub name: String,
}

impl LanguageSubtag {
    /// Creates a language subtag from a code and display name.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A single writing system: language identity plus editing settings.
///
/// Two definitions are identity-equivalent iff their derived language tags
/// are tag-equivalent, never by reference or by store id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingSystemDefinition {
    /// Stable store key. `None` until the definition is first committed.
    pub id: Option<String>,
    /// Language subtag (code plus display name)
    pub language: LanguageSubtag,
    /// Optional script subtag (e.g., "Latn", "Zxxx")
    pub script: Option<String>,
    /// Optional region subtag (e.g., "US", "MZ")
    pub region: Option<String>,
    /// Ordered variant subtags (e.g., "fonipa", "x-audio")
    pub variants: Vec<String>,
    /// Short display abbreviation (e.g., "Eng", "ipa")
    pub abbreviation: String,
    /// Fonts known to this writing system
    pub fonts: Vec<String>,
    /// Default font, normally one of `fonts`
    pub default_font: Option<String>,
    /// Keyboard identifier
    pub keyboard: Option<String>,
    /// Spell-check dictionary identifier
    pub spell_check_id: Option<String>,
    /// Legacy encoding converter identifier
    pub legacy_converter: Option<String>,
    /// Whether this writing system holds audio rather than text
    pub is_voice: bool,
    /// Whether Graphite font rendering is enabled
    pub is_graphite_enabled: bool,
}

impl WritingSystemDefinition {
    /// Creates a minimal definition for the given language.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let language = LanguageSubtag::new(code, name);
        let abbreviation = language.code.clone();
        Self {
            id: None,
            language,
            script: None,
            region: None,
            variants: Vec::new(),
            abbreviation,
            fonts: Vec::new(),
            default_font: None,
            keyboard: None,
            spell_check_id: None,
            legacy_converter: None,
            is_voice: false,
            is_graphite_enabled: false,
        }
    }

    /// Builds a fresh definition from a language tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag service cannot parse the text.
    pub fn from_tag(text: &str, tags: &dyn TagService) -> Result<Self> {
        let Some(parsed) = tags.try_parse(text) else {
            anyhow::bail!("'{text}' is not a usable language tag");
        };
        let mut ws = Self::new(parsed.language.clone(), parsed.language);
        ws.script = parsed.script;
        ws.region = parsed.region;
        ws.variants = parsed.variants;
        Ok(ws)
    }

    /// Derives the language tag from the subtag components.
    #[must_use]
    pub fn language_tag(&self, tags: &dyn TagService) -> String {
        tags.build(
            &self.language.code,
            self.script.as_deref(),
            self.region.as_deref(),
            &self.variants,
        )
    }

    /// Label shown to the user for this writing system: name plus tag.
    #[must_use]
    pub fn display_label(&self, tags: &dyn TagService) -> String {
        format!("{} ({})", self.language.name, self.language_tag(tags))
    }

    /// Compares every field except the store id.
    ///
    /// The id is a store concern; a working copy differs from its original
    /// only when the user actually edited something.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.language == other.language
            && self.script == other.script
            && self.region == other.region
            && self.variants == other.variants
            && self.abbreviation == other.abbreviation
            && self.fonts == other.fonts
            && self.default_font == other.default_font
            && self.keyboard == other.keyboard
            && self.spell_check_id == other.spell_check_id
            && self.legacy_converter == other.legacy_converter
            && self.is_voice == other.is_voice
            && self.is_graphite_enabled == other.is_graphite_enabled
    }

    /// Whether two definitions denote the same store writing system: by
    /// store id when both are committed, by tag equivalence otherwise.
    #[must_use]
    pub fn same_identity(&self, other: &Self, tags: &dyn TagService) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => tags.equivalent(&self.language_tag(tags), &other.language_tag(tags)),
        }
    }

    /// Clones this definition as a not-yet-created dialect.
    ///
    /// The copy keeps the identity unchanged (the user edits it afterwards)
    /// and carries no store id.
    #[must_use]
    pub fn dialect_of(base: &Self) -> Self {
        let mut ws = base.clone();
        ws.id = None;
        ws
    }

    /// Derives an audio counterpart of `base`: script `Zxxx`, the `x-audio`
    /// variant, and the voice flag set.
    #[must_use]
    pub fn audio_of(base: &Self) -> Self {
        let mut ws = base.clone();
        ws.id = None;
        ws.script = Some(AUDIO_SCRIPT.to_string());
        ws.variants = vec![AUDIO_VARIANT.to_string()];
        ws.is_voice = true;
        ws
    }

    /// Derives an IPA counterpart of `base`: the `fonipa` variant first,
    /// remaining variants minus `x-audio`, no script (scripts are not
    /// meaningful for phonetic transcription), and the "ipa" abbreviation.
    #[must_use]
    pub fn ipa_of(base: &Self) -> Self {
        let mut ws = base.clone();
        ws.id = None;
        ws.script = None;
        let mut variants = vec![IPA_VARIANT.to_string()];
        variants.extend(
            base.variants
                .iter()
                .filter(|v| *v != AUDIO_VARIANT && *v != IPA_VARIANT)
                .cloned(),
        );
        ws.variants = variants;
        ws.abbreviation = "ipa".to_string();
        ws.is_voice = false;
        ws
    }

    /// Serializes this definition to JSON for snapshots and diagnostics.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a definition from JSON produced by [`Self::to_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
