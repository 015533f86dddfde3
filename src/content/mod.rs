pub mod query;
pub mod repo;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Sparse mapping from language code to translated text. The default-language
/// text lives on the record itself.
pub type Translations = BTreeMap<String, String>;

/// Language codes the admin forms offer translation fields for.
pub const TRANSLATION_LANGUAGES: &[&str] = &["ar-EG", "de", "es", "fr", "it"];

/// A displayable museum item. Visible on the public surface iff `published`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exhibit {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_translations: Translations,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_translations: Translations,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// A scheduled event record. Display ordering is the manual `order` number,
/// which is not guaranteed unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workshop {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub order: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_translations: Translations,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_translations: Translations,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for exhibits. `id` and `created_at` are store-assigned.
#[derive(Debug, Clone, Serialize)]
pub struct NewExhibit {
    pub title: String,
    pub description: String,
    pub title_translations: Translations,
    pub description_translations: Translations,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
}

/// Partial update for exhibits; absent fields are left untouched by the
/// store. `category` is doubly optional so it can be explicitly cleared,
/// while `image_url` is only ever replaced, never cleared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExhibitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_translations: Option<Translations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_translations: Option<Translations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewWorkshop {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub order: i32,
    pub title_translations: Translations,
    pub description_translations: Translations,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkshopPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_translations: Option<Translations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_translations: Option<Translations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

// The store serializes absent translation maps as JSON null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhibit_deserializes_null_translations() {
        let raw = serde_json::json!({
            "id": "7f2c1fbe-44b5-41b6-9f36-5560d1a27b1c",
            "title": "Art & Paintings",
            "description": "A survey of the permanent collection.",
            "title_translations": null,
            "description_translations": null,
            "category": null,
            "image_url": null,
            "published": true,
            "created_at": "2024-05-01T10:00:00Z"
        });

        let exhibit: Exhibit = serde_json::from_value(raw).unwrap();
        assert!(exhibit.title_translations.is_empty());
        assert!(exhibit.category.is_none());
    }

    #[test]
    fn patch_omits_untouched_fields() {
        let patch = ExhibitPatch {
            published: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "published": false }));
    }

    #[test]
    fn patch_can_clear_category_explicitly() {
        let patch = ExhibitPatch {
            category: Some(None),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "category": null }));
    }
}
