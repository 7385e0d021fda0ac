//! Post creation form: field state, inline validation and the image preview.
//!
//! Nothing reaches the store until every required field is filled in; the
//! form hands back a [`PostDraft`] and the store completes it.

use std::fmt;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use url::Url;

use crate::domain::categories::Category;
use crate::domain::posts::PostDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Excerpt,
    Content,
    Image,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Excerpt => "excerpt",
            FormField::Content => "content",
            FormField::Image => "image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Inline errors collected by a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form has {} invalid field(s): {}", .fields.len(), render_fields(.fields))]
pub struct FormErrors {
    pub fields: Vec<FieldError>,
}

impl FormErrors {
    pub fn for_field(&self, field: FormField) -> Option<&FieldError> {
        self.fields.iter().find(|error| error.field == field)
    }
}

fn render_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{mime}` is not an image type")]
    NotAnImage { mime: String },
    #[error("image is empty")]
    Empty,
    #[error("image url is invalid: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePostForm {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: Category,
    pub author: Option<String>,
    image_preview: Option<String>,
}

impl CreatePostForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source of the image preview, either a remote URL or a `data:` URL.
    pub fn image_preview(&self) -> Option<&str> {
        self.image_preview.as_deref()
    }

    /// Embed raw image bytes as a `data:` URL preview.
    pub fn attach_image(&mut self, bytes: &[u8], mime: &str) -> Result<(), ImageError> {
        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage {
                mime: mime.to_string(),
            });
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        self.image_preview = Some(format!("data:{mime};base64,{}", STANDARD.encode(bytes)));
        Ok(())
    }

    /// Read an image from disk, guessing its type from the file extension.
    pub fn attach_image_file(&mut self, path: &Path) -> Result<(), ImageError> {
        let mime = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        if !mime.starts_with("image/") {
            return Err(ImageError::NotAnImage { mime });
        }
        let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.attach_image(&bytes, &mime)
    }

    /// Use a remote or `data:` image URL as the preview.
    pub fn set_image_url(&mut self, value: &str) -> Result<(), ImageError> {
        let url = Url::parse(value.trim()).map_err(|err| ImageError::InvalidUrl(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https" | "data") {
            return Err(ImageError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        self.image_preview = Some(url.into());
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.image_preview = None;
    }

    /// Validate required fields and produce a draft for the store.
    pub fn submit(&self) -> Result<PostDraft, FormErrors> {
        let mut fields = Vec::new();
        for (field, value) in [
            (FormField::Title, &self.title),
            (FormField::Excerpt, &self.excerpt),
            (FormField::Content, &self.content),
        ] {
            if value.trim().is_empty() {
                fields.push(FieldError {
                    field,
                    message: "this field is required".to_string(),
                });
            }
        }

        if !fields.is_empty() {
            return Err(FormErrors { fields });
        }

        Ok(PostDraft {
            title: self.title.trim().to_string(),
            excerpt: self.excerpt.trim().to_string(),
            content: self.content.trim_end().to_string(),
            category: self.category.clone(),
            author: self
                .author
                .as_ref()
                .map(|author| author.trim().to_string())
                .filter(|author| !author.is_empty()),
            image_url: self.image_preview.clone(),
        })
    }
}
