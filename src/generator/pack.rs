use icu_normalizer::ComposingNormalizerBorrowed;
use rust_embed::Embed;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::generator::Language;

#[derive(Embed)]
#[folder = "assets/packs/"]
struct PackAssets;

#[derive(Deserialize)]
struct RawPack {
    language: Language,
    #[serde(default)]
    words: Vec<String>,
    #[serde(default)]
    sentences: Vec<String>,
}

/// Word and sentence pools for one language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguagePack {
    pub language: Language,
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

impl LanguagePack {
    /// Load the pack bundled for `language`.
    pub fn load(language: Language) -> Result<Self> {
        let filename = format!("{}.json", language.code());
        let file = PackAssets::get(&filename).ok_or_else(|| Error::InvalidPack {
            language: language.code().to_string(),
            reason: "no bundled pack".to_string(),
        })?;
        let content = std::str::from_utf8(file.data.as_ref()).map_err(|e| Error::InvalidPack {
            language: language.code().to_string(),
            reason: e.to_string(),
        })?;
        let pack = Self::from_json(content)?;
        if pack.language != language {
            return Err(Error::InvalidPack {
                language: language.code().to_string(),
                reason: format!("file declares language {:?}", pack.language.code()),
            });
        }
        Ok(pack)
    }

    /// Parse a pack, normalise every entry to NFC and drop blank entries.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawPack = serde_json::from_str(content)?;
        let code = raw.language.code();
        let normalizer = ComposingNormalizerBorrowed::new_nfc();
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| normalizer.normalize(s.trim()).into_owned())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let words = clean(raw.words);
        let sentences = clean(raw.sentences);
        if words.is_empty() || sentences.is_empty() {
            return Err(Error::InvalidPack {
                language: code.to_string(),
                reason: "words and sentences must both be non-empty".to_string(),
            });
        }
        if let Some(bad) = words.iter().find(|w| w.contains(char::is_whitespace)) {
            return Err(Error::InvalidPack {
                language: code.to_string(),
                reason: format!("word {bad:?} contains whitespace"),
            });
        }

        Ok(Self {
            language: raw.language,
            words,
            sentences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hangul::is_hangul_syllable;

    #[test]
    fn test_bundled_packs_load() {
        for language in Language::ALL {
            let pack = LanguagePack::load(language).unwrap();
            assert_eq!(pack.language, language);
            assert!(pack.words.len() >= 50);
            assert!(pack.sentences.len() >= 20);
        }
    }

    #[test]
    fn test_korean_pack_is_hangul() {
        let pack = LanguagePack::load(Language::Korean).unwrap();
        assert!(pack.words.iter().all(|w| w.chars().any(is_hangul_syllable)));
    }

    #[test]
    fn test_decomposed_input_is_composed() {
        // 한 written as conjoining jamo
        let json = r#"{"language":"ko","words":["\u1112\u1161\u11ab"],"sentences":["가"]}"#;
        let pack = LanguagePack::from_json(json).unwrap();
        assert_eq!(pack.words, vec!["한".to_string()]);
    }

    #[test]
    fn test_empty_pack_is_rejected() {
        let json = r#"{"language":"en","words":[],"sentences":["A line."]}"#;
        let err = LanguagePack::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidPack { .. }));
    }

    #[test]
    fn test_malformed_pack_is_rejected() {
        assert!(matches!(
            LanguagePack::from_json("{not json"),
            Err(Error::Json(_))
        ));
        let json = r#"{"language":"en","words":["two words"],"sentences":["x"]}"#;
        assert!(LanguagePack::from_json(json).is_err());
    }
}
