//! Project entity model and DTOs.

use knitlog_core::error::CoreError;
use knitlog_core::project::{
    filter_child_urls, normalize_category, normalize_optional, validate_child_urls,
    validate_title, validate_yarn_color_count,
};
use knitlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::child_item::ChildItem;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Single legacy photo field, kept alongside the `completed_images` gallery.
    pub completed_image_url: Option<String>,
    pub youtube_url: Option<String>,
    pub yarn_color_count: i32,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A listing row: the project plus its first completed photo, if any.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub first_completed_image_url: Option<String>,
}

/// A project with both child collections in display order.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub patterns: Vec<ChildItem>,
    pub completed_images: Vec<ChildItem>,
}

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    /// Stored category tag to match exactly.
    pub category: Option<String>,
    /// Only projects that have a photo, either in the gallery or in the
    /// legacy `completed_image_url` field.
    pub with_photo: bool,
}

/// Validated scalar columns written on create and update.
#[derive(Debug, Clone)]
pub struct ProjectFields {
    pub title: String,
    pub description: Option<String>,
    pub completed_image_url: Option<String>,
    pub youtube_url: Option<String>,
    pub yarn_color_count: i32,
    pub category: Option<String>,
}

/// A full write: scalar fields plus the desired child lists.
///
/// `None` for a list means "not submitted". On create that is the same as an
/// empty list; on update it leaves the stored collection untouched.
#[derive(Debug, Clone)]
pub struct ProjectWrite {
    pub fields: ProjectFields,
    pub pattern_images: Option<Vec<String>>,
    pub completed_images: Option<Vec<String>>,
}

/// Request body for creating or replacing a project.
///
/// Every field is optional on the wire so that missing required fields
/// surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed_image_url: Option<String>,
    pub youtube_url: Option<String>,
    pub yarn_color_count: Option<i64>,
    pub category: Option<String>,
    pub pattern_images: Option<Vec<Option<String>>>,
    pub completed_images: Option<Vec<Option<String>>>,
}

impl ProjectPayload {
    /// Total length of all embedded strings, used to flag oversized submissions.
    pub fn approximate_size(&self) -> usize {
        let scalars = [
            &self.title,
            &self.description,
            &self.completed_image_url,
            &self.youtube_url,
        ]
        .into_iter()
        .flatten()
        .map(String::len)
        .sum::<usize>();

        let lists = [&self.pattern_images, &self.completed_images]
            .into_iter()
            .flatten()
            .flatten()
            .flatten()
            .map(String::len)
            .sum::<usize>();

        scalars + lists
    }
}

impl TryFrom<ProjectPayload> for ProjectWrite {
    type Error = CoreError;

    /// Validate required fields, normalize optional ones, and filter and
    /// check both child lists. Nothing is written if this fails.
    fn try_from(payload: ProjectPayload) -> Result<Self, Self::Error> {
        let title = validate_title(payload.title)?;
        let yarn_color_count = validate_yarn_color_count(payload.yarn_color_count)?;
        let category = normalize_category(payload.category)?;

        let pattern_images = prepare_child_list("pattern_images", payload.pattern_images)?;
        let completed_images = prepare_child_list("completed_images", payload.completed_images)?;

        Ok(ProjectWrite {
            fields: ProjectFields {
                title,
                description: normalize_optional(payload.description),
                completed_image_url: normalize_optional(payload.completed_image_url),
                youtube_url: normalize_optional(payload.youtube_url),
                yarn_color_count,
                category,
            },
            pattern_images,
            completed_images,
        })
    }
}

fn prepare_child_list(
    field: &str,
    list: Option<Vec<Option<String>>>,
) -> Result<Option<Vec<String>>, CoreError> {
    let Some(list) = list else {
        return Ok(None);
    };
    let filtered = filter_child_urls(list.into_iter().flatten().collect());
    validate_child_urls(field, &filtered)?;
    Ok(Some(filtered))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn payload() -> ProjectPayload {
        ProjectPayload {
            title: Some("Granny square blanket".into()),
            yarn_color_count: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_payload_validates() {
        let write = ProjectWrite::try_from(payload()).unwrap();
        assert_eq!(write.fields.title, "Granny square blanket");
        assert_eq!(write.fields.yarn_color_count, 4);
        assert!(write.fields.description.is_none());
        assert!(write.pattern_images.is_none());
        assert!(write.completed_images.is_none());
    }

    #[test]
    fn test_missing_title_rejected() {
        let input = ProjectPayload {
            title: None,
            ..payload()
        };
        assert_matches!(ProjectWrite::try_from(input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_missing_color_count_rejected() {
        let input = ProjectPayload {
            yarn_color_count: None,
            ..payload()
        };
        assert_matches!(ProjectWrite::try_from(input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_child_lists_filtered_and_nulls_dropped() {
        let input = ProjectPayload {
            pattern_images: Some(vec![
                Some("https://example.com/a.png".into()),
                Some(String::new()),
                None,
                Some("  ".into()),
                Some("https://example.com/b.png".into()),
            ]),
            completed_images: Some(vec![]),
            ..payload()
        };
        let write = ProjectWrite::try_from(input).unwrap();
        assert_eq!(
            write.pattern_images.unwrap(),
            vec![
                "https://example.com/a.png".to_string(),
                "https://example.com/b.png".to_string()
            ]
        );
        assert_eq!(write.completed_images, Some(vec![]));
    }

    #[test]
    fn test_malformed_child_rejected() {
        let input = ProjectPayload {
            completed_images: Some(vec![Some("data:text/html,<b>hi</b>".into())]),
            ..payload()
        };
        let err = ProjectWrite::try_from(input).unwrap_err();
        assert!(err.to_string().contains("completed_images[0]"));
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let input = ProjectPayload {
            description: Some(String::new()),
            youtube_url: Some("   ".into()),
            category: Some(String::new()),
            ..payload()
        };
        let write = ProjectWrite::try_from(input).unwrap();
        assert!(write.fields.description.is_none());
        assert!(write.fields.youtube_url.is_none());
        assert!(write.fields.category.is_none());
    }

    #[test]
    fn test_approximate_size_counts_children() {
        let input = ProjectPayload {
            title: Some("abc".into()),
            pattern_images: Some(vec![Some("12345".into()), None]),
            ..Default::default()
        };
        assert_eq!(input.approximate_size(), 8);
    }
}
