//! Category keyword lists and their JSON persistence.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::LexiconError;
use crate::types::Category;

/// Keywords of one category, either as one list or split by language tag.
///
/// Language partitions only exist for editing; scoring pools every
/// partition into a single list, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryKeywords {
    Flat(Vec<String>),
    ByLanguage(LanguagePartitions),
}

impl CategoryKeywords {
    /// All keywords lower-cased, partitions concatenated in file order.
    pub fn flatten(&self) -> Vec<String> {
        let words: Box<dyn Iterator<Item = &String>> = match self {
            CategoryKeywords::Flat(words) => Box::new(words.iter()),
            CategoryKeywords::ByLanguage(partitions) => {
                Box::new(partitions.iter().flat_map(|(_, words)| words))
            }
        };
        words.map(|word| word.to_lowercase()).collect()
    }

    pub fn len(&self) -> usize {
        match self {
            CategoryKeywords::Flat(words) => words.len(),
            CategoryKeywords::ByLanguage(partitions) => {
                partitions.iter().map(|(_, words)| words.len()).sum()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        CategoryKeywords::Flat(Vec::new())
    }
}

/// Keyword lists keyed by language tag, kept in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguagePartitions(Vec<(String, Vec<String>)>);

impl LanguagePartitions {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(language, words)| (language.as_str(), words.as_slice()))
    }

    pub fn get(&self, language: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(tag, _)| tag == language)
            .map(|(_, words)| words.as_slice())
    }

    /// Replaces an existing partition in place, or appends a new one.
    pub fn insert(&mut self, language: String, words: Vec<String>) {
        match self.0.iter_mut().find(|(tag, _)| *tag == language) {
            Some((_, current)) => *current = words,
            None => self.0.push((language, words)),
        }
    }
}

impl FromIterator<(String, Vec<String>)> for LanguagePartitions {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut partitions = Self::default();
        for (language, words) in iter {
            partitions.insert(language, words);
        }
        partitions
    }
}

impl Serialize for LanguagePartitions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(language, words)| (language, words)))
    }
}

impl<'de> Deserialize<'de> for LanguagePartitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PartitionVisitor;

        impl<'de> Visitor<'de> for PartitionVisitor {
            type Value = LanguagePartitions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of language tag to keyword list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut partitions = LanguagePartitions::default();
                while let Some((language, words)) = map.next_entry::<String, Vec<String>>()? {
                    partitions.insert(language, words);
                }
                Ok(partitions)
            }
        }

        deserializer.deserialize_map(PartitionVisitor)
    }
}

/// The category to keyword mapping driving classification.
///
/// All three categories are required fields, so a deserialized lexicon is
/// always total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLexicon {
    pub kids: CategoryKeywords,
    pub teen: CategoryKeywords,
    pub serious: CategoryKeywords,
}

impl KeywordLexicon {
    /// Builds an unpartitioned lexicon.
    pub fn flat(kids: &[&str], teen: &[&str], serious: &[&str]) -> Self {
        let list = |words: &[&str]| {
            CategoryKeywords::Flat(words.iter().map(|word| word.to_string()).collect())
        };
        Self {
            kids: list(kids),
            teen: list(teen),
            serious: list(serious),
        }
    }

    pub fn category(&self, category: Category) -> &CategoryKeywords {
        match category {
            Category::Kids => &self.kids,
            Category::Teen => &self.teen,
            Category::Serious => &self.serious,
        }
    }

    pub fn category_mut(&mut self, category: Category) -> &mut CategoryKeywords {
        match category {
            Category::Kids => &mut self.kids,
            Category::Teen => &mut self.teen,
            Category::Serious => &mut self.serious,
        }
    }

    pub fn flatten(&self, category: Category) -> Vec<String> {
        self.category(category).flatten()
    }

    /// Replaces the keywords of one category, or of one language partition of it.
    pub fn set_keywords(
        &mut self,
        category: Category,
        language: Option<&str>,
        words: Vec<String>,
    ) -> Result<(), LexiconError> {
        let keywords = self.category_mut(category);
        match (keywords, language) {
            (CategoryKeywords::Flat(current), None) => {
                *current = words;
            }
            (CategoryKeywords::ByLanguage(partitions), Some(language)) => {
                partitions.insert(language.trim().to_lowercase(), words);
            }
            (CategoryKeywords::Flat(_), Some(_)) => {
                return Err(LexiconError::NotPartitioned {
                    category: category.key().to_string(),
                });
            }
            (CategoryKeywords::ByLanguage(_), None) => {
                return Err(LexiconError::LanguageRequired {
                    category: category.key().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        fn partitioned(languages: &[(&str, &[&str])]) -> CategoryKeywords {
            CategoryKeywords::ByLanguage(
                languages
                    .iter()
                    .map(|(language, words)| {
                        (
                            language.to_string(),
                            words.iter().map(|word| word.to_string()).collect(),
                        )
                    })
                    .collect(),
            )
        }

        Self {
            kids: partitioned(&[
                ("en", &["kids", "children", "toy", "cartoon", "animation", "disney"]),
                ("cs", &["děti", "dětský", "dětská", "hračky", "pohádka"]),
                ("sk", &["deti", "detský", "detská", "hračky", "rozprávka"]),
            ]),
            teen: partitioned(&[
                ("en", &["teen", "teenager", "gaming", "tiktok", "challenge"]),
                ("cs", &["teen", "teenager", "hry", "výzva", "tiktok"]),
                ("sk", &["teen", "teenager", "hry", "výzva", "tiktok"]),
            ]),
            serious: partitioned(&[
                ("en", &["news", "business", "science", "technology", "research"]),
                ("cs", &["zprávy", "podnikání", "věda", "technologie"]),
                ("sk", &["správy", "podnikanie", "veda", "technológia"]),
            ]),
        }
    }
}

/// Splits the comma-separated editing form into keywords, dropping blanks.
pub fn parse_keyword_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Persistence boundary for the lexicon: loaded at run start, saved on request.
pub trait LexiconStore {
    /// Never fails; an absent or corrupt store yields the built-in default.
    fn load(&self) -> KeywordLexicon;

    fn save(&self, lexicon: &KeywordLexicon) -> Result<(), LexiconError>;
}

#[derive(Debug, Clone)]
pub struct JsonLexiconStore {
    path: PathBuf,
}

impl JsonLexiconStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_strict(&self) -> Result<KeywordLexicon, LexiconError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            debug!("Cannot read lexicon {}: {}", self.path.display(), e);
            LexiconError::Unreadable {
                path: self.path.display().to_string(),
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl LexiconStore for JsonLexiconStore {
    fn load(&self) -> KeywordLexicon {
        match self.load_strict() {
            Ok(lexicon) => {
                info!("Loaded keyword lexicon from {}", self.path.display());
                lexicon
            }
            Err(e) => {
                warn!("Using built-in keyword lexicon: {}", e);
                KeywordLexicon::default()
            }
        }
    }

    fn save(&self, lexicon: &KeywordLexicon) -> Result<(), LexiconError> {
        let mut json = serde_json::to_string_pretty(lexicon)?;
        json.push('\n');
        fs::write(&self.path, json).map_err(|e| {
            warn!("Failed to write lexicon {}: {}", self.path.display(), e);
            LexiconError::WriteFailed {
                path: self.path.display().to_string(),
            }
        })?;
        info!("Saved keyword lexicon to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_pools_languages_and_keeps_duplicates() {
        let lexicon = KeywordLexicon::default();
        let teen = lexicon.flatten(Category::Teen);

        assert_eq!(teen.len(), 15);
        assert_eq!(teen.iter().filter(|word| *word == "teen").count(), 3);
    }

    #[test]
    fn test_flatten_lowercases() {
        let lexicon = KeywordLexicon::flat(&["Kids", "TOYS"], &[], &["News"]);
        assert_eq!(lexicon.flatten(Category::Kids), vec!["kids", "toys"]);
        assert!(lexicon.flatten(Category::Teen).is_empty());
        assert_eq!(lexicon.flatten(Category::Serious), vec!["news"]);
    }

    #[test]
    fn test_parse_keyword_list() {
        assert_eq!(
            parse_keyword_list(" kids, toys ,,cartoon ,  "),
            vec!["kids", "toys", "cartoon"]
        );
        assert!(parse_keyword_list("").is_empty());
    }

    #[test]
    fn test_set_keywords() {
        let mut lexicon = KeywordLexicon::default();
        lexicon
            .set_keywords(Category::Kids, Some("EN"), vec!["lego".to_string()])
            .unwrap();
        assert!(lexicon.flatten(Category::Kids).contains(&"lego".to_string()));
        assert!(!lexicon.flatten(Category::Kids).contains(&"disney".to_string()));

        assert!(matches!(
            lexicon.set_keywords(Category::Kids, None, vec![]),
            Err(LexiconError::LanguageRequired { .. })
        ));

        let mut flat = KeywordLexicon::flat(&["kids"], &["teen"], &[]);
        flat.set_keywords(Category::Serious, None, vec!["news".to_string()])
            .unwrap();
        assert_eq!(flat.flatten(Category::Serious), vec!["news"]);
        assert!(matches!(
            flat.set_keywords(Category::Serious, Some("en"), vec![]),
            Err(LexiconError::NotPartitioned { .. })
        ));
    }

    #[test]
    fn test_both_json_shapes_are_accepted() {
        let json = r#"{
            "kids": ["kids", "toys"],
            "teen": {"en": ["teen"], "cs": ["výzva"]},
            "serious": []
        }"#;
        let lexicon: KeywordLexicon = serde_json::from_str(json).unwrap();

        assert!(matches!(lexicon.kids, CategoryKeywords::Flat(_)));
        assert!(matches!(lexicon.teen, CategoryKeywords::ByLanguage(_)));
        assert!(lexicon.serious.is_empty());
        assert_eq!(lexicon.flatten(Category::Teen), vec!["teen", "výzva"]);
    }

    #[test]
    fn test_language_order_survives_round_trip() {
        let json = r#"{"kids":{"en":["kids"],"cs":["děti"],"sk":["deti"]},"teen":["teen"],"serious":{"sk":["správy"],"en":["news"]}}"#;
        let lexicon: KeywordLexicon = serde_json::from_str(json).unwrap();

        assert_eq!(lexicon.flatten(Category::Kids), vec!["kids", "děti", "deti"]);
        assert_eq!(lexicon.flatten(Category::Serious), vec!["správy", "news"]);
        assert_eq!(serde_json::to_string(&lexicon).unwrap(), json);

        let default_kids = KeywordLexicon::default().flatten(Category::Kids);
        assert_eq!(default_kids.first().map(String::as_str), Some("kids"));
        assert_eq!(default_kids.last().map(String::as_str), Some("rozprávka"));
    }

    #[test]
    fn test_partition_insert_keeps_position() {
        let mut partitions: LanguagePartitions = vec![
            ("en".to_string(), vec!["news".to_string()]),
            ("cs".to_string(), vec!["zprávy".to_string()]),
        ]
        .into_iter()
        .collect();

        partitions.insert("en".to_string(), vec!["science".to_string()]);
        partitions.insert("sk".to_string(), vec!["veda".to_string()]);

        let tags: Vec<&str> = partitions.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec!["en", "cs", "sk"]);
        assert_eq!(partitions.get("en"), Some(&["science".to_string()][..]));
        assert_eq!(partitions.get("de"), None);
    }

    #[test]
    fn test_missing_category_is_rejected() {
        let json = r#"{"kids": ["kids"], "teen": ["teen"]}"#;
        assert!(serde_json::from_str::<KeywordLexicon>(json).is_err());
    }
}
