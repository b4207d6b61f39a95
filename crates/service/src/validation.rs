//! Pure form validation for article and category submissions.
//!
//! Existence checks run against a [`ReferenceCatalog`] snapshot supplied by
//! the caller, so these functions never touch the database themselves. Each
//! violated rule maps to exactly one localized message.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Localized (French) error and status messages, as shown in the admin UI.
pub mod messages {
    pub const TITLE_REQUIRED: &str = "Le titre est requis.";
    pub const TITLE_MAX: &str = "Le titre ne doit pas dépasser 255 caractères.";
    pub const CONTENT_REQUIRED: &str = "Le contenu est requis.";
    pub const CATEGORY_REQUIRED: &str = "La catégorie est requise.";
    pub const CATEGORY_INVALID: &str = "La catégorie sélectionnée est invalide.";
    pub const TAGS_INVALID: &str = "Un ou plusieurs tags sont invalides.";
    pub const SLUG_REQUIRED: &str = "Le slug est requis.";
    pub const SLUG_TAKEN: &str = "Ce slug est déjà utilisé.";
    pub const CATEGORY_IN_USE: &str = "La catégorie est encore utilisée par des articles.";

    pub const ARTICLE_CREATED: &str = "Article créé avec succès.";
    pub const ARTICLE_UPDATED: &str = "Article mis à jour avec succès.";
    pub const ARTICLE_DELETED: &str = "Article supprimé avec succès.";
    pub const CATEGORY_CREATED: &str = "Catégorie créé avec succès.";
}

pub const TITLE_MAX_CHARS: usize = 255;

/// Field name -> single localized message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        // First violation per field wins
        self.0.entry(field.to_string()).or_insert_with(|| message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

/// Raw article submission as it arrives from the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Article fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArticle {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    /// Deduplicated, in submission order.
    pub tags: Vec<Uuid>,
}

/// Raw category submission; `title` becomes the stored `name`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCategory {
    pub name: String,
    pub slug: String,
}

/// Snapshot of the ids validation may reference.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    pub categories: HashSet<Uuid>,
    pub tags: HashSet<Uuid>,
}

fn required<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn validate_article(
    input: &ArticleInput,
    catalog: &ReferenceCatalog,
) -> Result<ValidatedArticle, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = match required(&input.title) {
        Some(t) if t.chars().count() > TITLE_MAX_CHARS => {
            errors.add("title", messages::TITLE_MAX);
            None
        }
        Some(t) => Some(t.to_string()),
        None => {
            errors.add("title", messages::TITLE_REQUIRED);
            None
        }
    };

    let content = match required(&input.content) {
        Some(c) => Some(c.to_string()),
        None => {
            errors.add("content", messages::CONTENT_REQUIRED);
            None
        }
    };

    let category_id = match input.category {
        Some(id) if catalog.categories.contains(&id) => Some(id),
        Some(_) => {
            errors.add("category", messages::CATEGORY_INVALID);
            None
        }
        None => {
            errors.add("category", messages::CATEGORY_REQUIRED);
            None
        }
    };

    // The tag set is a set: drop duplicates, keep submission order
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for id in &input.tags {
        if !catalog.tags.contains(id) {
            errors.add("tags", messages::TAGS_INVALID);
            break;
        }
        if seen.insert(*id) {
            tags.push(*id);
        }
    }

    match (title, content, category_id) {
        (Some(title), Some(content), Some(category_id)) if errors.is_empty() => {
            Ok(ValidatedArticle { title, content, category_id, tags })
        }
        _ => Err(errors),
    }
}

pub fn validate_category(input: &CategoryInput) -> Result<ValidatedCategory, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = required(&input.title).map(str::to_string);
    if name.is_none() {
        errors.add("title", messages::TITLE_REQUIRED);
    }
    let slug = required(&input.slug).map(str::to_string);
    if slug.is_none() {
        errors.add("slug", messages::SLUG_REQUIRED);
    }

    match (name, slug) {
        (Some(name), Some(slug)) => Ok(ValidatedCategory { name, slug }),
        _ => Err(errors),
    }
}
