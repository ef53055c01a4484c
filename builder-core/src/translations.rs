//! Detection of blocks whose translatable text is missing in the active language.

use serde_json::Value;
use shared_types::{Block, BlockDefinition};

use crate::registry::BlockRegistry;

/// A translatable property with no value in the active language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    pub block_id: String,
    pub block_type: String,
    pub prop: String,
}

/// Language to check, or `None` when the active language needs no translations.
pub fn language_to_check<'a>(selected: Option<&'a str>, fallback: Option<&str>) -> Option<&'a str> {
    let lang = selected.filter(|lang| !lang.is_empty())?;
    if Some(lang) == fallback {
        return None;
    }
    Some(lang)
}

/// True if any block lacks a translation in `lang`. Stops at the first miss.
pub fn has_missing_translations(blocks: &[Block], lang: &str, registry: &dyn BlockRegistry) -> bool {
    blocks.iter().any(|block| {
        definition_for(block, registry)
            .map(|def| {
                def.i18n_props
                    .iter()
                    .any(|prop| is_blank(block.translated_prop(prop, lang)))
            })
            .unwrap_or(false)
    })
}

/// Every untranslated property across `blocks`, in page order.
pub fn missing_translations(
    blocks: &[Block],
    lang: &str,
    registry: &dyn BlockRegistry,
) -> Vec<MissingTranslation> {
    let mut missing = Vec::new();
    for block in blocks {
        let Some(def) = definition_for(block, registry) else {
            continue;
        };
        for prop in &def.i18n_props {
            if is_blank(block.translated_prop(prop, lang)) {
                missing.push(MissingTranslation {
                    block_id: block.id.clone(),
                    block_type: block.block_type.clone(),
                    prop: prop.clone(),
                });
            }
        }
    }
    missing
}

fn definition_for(block: &Block, registry: &dyn BlockRegistry) -> Option<BlockDefinition> {
    if block.block_type.is_empty() || block.is_partial() {
        return None;
    }
    match registry.lookup(&block.block_type) {
        Ok(def) => def,
        Err(e) => {
            tracing::warn!(
                block_id = %block.id,
                block_type = %block.block_type,
                error = %e,
                "Block definition lookup failed; treating block as translated"
            );
            None
        }
    }
}

/// Only non-empty strings, arrays and objects count as a translation.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Null | Value::Bool(_) | Value::Number(_)) | None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::registry::StaticBlockRegistry;
    use serde_json::json;
    use shared_types::PARTIAL_BLOCK_TYPE;

    fn registry() -> StaticBlockRegistry {
        StaticBlockRegistry::new()
            .with(BlockDefinition::new("Heading").with_i18n_props(["title"]))
            .with(BlockDefinition::new("Box"))
            .with(BlockDefinition::new(PARTIAL_BLOCK_TYPE).with_i18n_props(["title"]))
    }

    struct BrokenRegistry;

    impl BlockRegistry for BrokenRegistry {
        fn lookup(&self, block_type: &str) -> Result<Option<BlockDefinition>, RegistryError> {
            Err(RegistryError {
                block_type: block_type.to_string(),
                reason: "registry not ready".to_string(),
            })
        }
    }

    #[test]
    fn test_language_to_check() {
        assert_eq!(language_to_check(None, Some("en")), None);
        assert_eq!(language_to_check(Some(""), Some("en")), None);
        assert_eq!(language_to_check(Some("en"), Some("en")), None);
        assert_eq!(language_to_check(Some("fr"), Some("en")), Some("fr"));
        assert_eq!(language_to_check(Some("fr"), None), Some("fr"));
    }

    #[test]
    fn test_absent_or_empty_translation_is_missing() {
        let absent = vec![Block::new("b1", "Heading").with_prop("title", json!("Hello"))];
        assert!(has_missing_translations(&absent, "fr", &registry()));

        let empty = vec![Block::new("b1", "Heading").with_prop("title-fr", json!(""))];
        assert!(has_missing_translations(&empty, "fr", &registry()));
    }

    #[test]
    fn test_present_translation_is_complete() {
        let blocks = vec![
            Block::new("b1", "Heading").with_prop("title-fr", json!("Bonjour")),
            Block::new("b2", "Box"),
        ];
        assert!(!has_missing_translations(&blocks, "fr", &registry()));
    }

    #[test]
    fn test_non_text_values_count_as_missing() {
        for value in [json!(null), json!(0), json!(42), json!(true), json!([]), json!({})] {
            let blocks = vec![Block::new("b1", "Heading").with_prop("title-fr", value.clone())];
            assert!(
                has_missing_translations(&blocks, "fr", &registry()),
                "{value} should count as missing"
            );
        }
        let blocks = vec![Block::new("b1", "Heading").with_prop("title-fr", json!(["a"]))];
        assert!(!has_missing_translations(&blocks, "fr", &registry()));
    }

    #[test]
    fn test_partial_and_untyped_blocks_are_skipped() {
        let blocks = vec![
            Block::new("p1", PARTIAL_BLOCK_TYPE),
            Block::new("u1", ""),
            Block::new("x1", "Unregistered"),
        ];
        assert!(!has_missing_translations(&blocks, "fr", &registry()));
        assert!(missing_translations(&blocks, "fr", &registry()).is_empty());
    }

    #[test]
    fn test_lookup_failure_counts_as_translated() {
        let blocks = vec![Block::new("b1", "Heading")];
        assert!(!has_missing_translations(&blocks, "fr", &BrokenRegistry));
    }

    #[test]
    fn test_missing_translations_lists_every_gap() {
        let registry = registry().with(BlockDefinition::new("Card").with_i18n_props(["title", "body"]));
        let blocks = vec![
            Block::new("b1", "Heading").with_prop("title-de", json!("Hallo")),
            Block::new("c1", "Card").with_prop("title-de", json!("Karte")),
            Block::new("b2", "Heading"),
        ];

        let missing = missing_translations(&blocks, "de", &registry);
        let ids: Vec<(&str, &str)> = missing
            .iter()
            .map(|m| (m.block_id.as_str(), m.prop.as_str()))
            .collect();
        assert_eq!(ids, vec![("c1", "body"), ("b2", "title")]);
    }
}
