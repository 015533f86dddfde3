use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;

use crate::content::Translations;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

pub type UploadResult<T> = Result<T, UploadError>;

/// Error returned when reading or validating a submitted admin form. The
/// flash code distinguishes a broken form submission from a rejected image.
#[derive(Debug)]
pub struct UploadError {
    message: String,
    code: &'static str,
}

impl UploadError {
    fn form(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "invalid_form",
        }
    }

    fn image(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "invalid_image",
        }
    }

    pub fn flash_code(&self) -> &'static str {
        self.code
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

/// An image file held in memory, validated but not yet stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub extension: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parsed multipart admin form: text fields plus at most one image under the
/// `image` field. An empty file part (browser submitting an untouched file
/// input) counts as no upload.
#[derive(Debug, Default)]
pub struct AdminForm {
    text_fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl AdminForm {
    /// Trimmed, non-empty text value for a field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Checkbox-style flag; browsers submit "on" for checked boxes.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name), Some("on" | "true" | "1"))
    }

    /// Collect sparse translation fields submitted as `{prefix}.{lang}`.
    /// Blank values are dropped so the stored map stays sparse.
    pub fn translations(&self, prefix: &str) -> Translations {
        let prefix = format!("{prefix}.");
        self.text_fields
            .iter()
            .filter_map(|(name, value)| {
                let lang = name.strip_prefix(&prefix)?;
                let value = value.trim();
                if lang.is_empty() || value.is_empty() {
                    return None;
                }
                Some((lang.to_string(), value.to_string()))
            })
            .collect()
    }
}

/// Read a multipart admin form into memory, enforcing the image allow-list
/// and size cap as the parts stream in.
pub async fn read_admin_form(mut multipart: Multipart) -> UploadResult<AdminForm> {
    let mut form = AdminForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::form(format!("failed to parse the submitted form: {err}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field
                .text()
                .await
                .map_err(|err| UploadError::form(format!("failed to read field `{field_name}`: {err}")))?;
            form.text_fields.insert(field_name, value);
            continue;
        };

        if field_name != "image" {
            return Err(UploadError::form(format!(
                "unexpected file field `{field_name}`"
            )));
        }

        // An untouched file input arrives as a part with an empty filename.
        if file_name.is_empty() {
            continue;
        }

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(UploadError::image(format!(
                "`{extension}` files are not supported; use JPEG, PNG, WebP or GIF"
            )));
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| image_content_type(&extension).to_string());

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| UploadError::form(format!("failed to read the uploaded image: {err}")))?
        {
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(UploadError::image("the image exceeds the 5 MB limit"));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            continue;
        }

        form.image = Some(ImageUpload {
            extension,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

fn image_content_type(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => mime::APPLICATION_OCTET_STREAM.essence_str(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::FromRequest, http::Request};

    use super::*;

    async fn multipart_from(body: &str) -> Multipart {
        let request = Request::builder()
            .header(
                "content-type",
                "multipart/form-data; boundary=test-boundary",
            )
            .body(Body::from(body.to_string()))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn form_with(fields: &[(&str, &str)]) -> AdminForm {
        AdminForm {
            text_fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn text_trims_and_drops_blank_values() {
        let form = form_with(&[("title", "  Pottery  "), ("category", "   ")]);
        assert_eq!(form.text("title"), Some("Pottery"));
        assert_eq!(form.text("category"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn flag_recognizes_checkbox_values() {
        let form = form_with(&[("published", "on"), ("draft", "off")]);
        assert!(form.flag("published"));
        assert!(!form.flag("draft"));
        assert!(!form.flag("absent"));
    }

    #[test]
    fn translations_collects_sparse_prefixed_fields() {
        let form = form_with(&[
            ("title_translations.de", "Töpferei"),
            ("title_translations.fr", ""),
            ("title_translations.ar-EG", " الفخار "),
            ("description_translations.de", "ignored prefix"),
        ]);

        let translations = form.translations("title_translations");
        assert_eq!(translations.len(), 2);
        assert_eq!(translations.get("de").map(String::as_str), Some("Töpferei"));
        assert_eq!(
            translations.get("ar-EG").map(String::as_str),
            Some("الفخار")
        );
    }

    #[test]
    fn image_content_type_falls_back_for_unknown_extensions() {
        assert_eq!(image_content_type("png"), "image/png");
        assert_eq!(image_content_type("bin"), "application/octet-stream");
    }

    #[tokio::test]
    async fn untouched_file_input_counts_as_no_upload() {
        let body = "--test-boundary\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\r\n\
            Pottery\r\n\
            --test-boundary\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n\
            \r\n\
            --test-boundary--\r\n";

        let form = read_admin_form(multipart_from(body).await).await.unwrap();
        assert!(form.image.is_none());
        assert_eq!(form.text("title"), Some("Pottery"));
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected_with_the_image_code() {
        let body = "--test-boundary\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"notes.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            hello\r\n\
            --test-boundary--\r\n";

        let err = read_admin_form(multipart_from(body).await)
            .await
            .unwrap_err();
        assert_eq!(err.flash_code(), "invalid_image");
    }

    #[tokio::test]
    async fn unexpected_file_field_is_a_form_error() {
        let body = "--test-boundary\r\n\
            Content-Disposition: form-data; name=\"attachment\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            data\r\n\
            --test-boundary--\r\n";

        let err = read_admin_form(multipart_from(body).await)
            .await
            .unwrap_err();
        assert_eq!(err.flash_code(), "invalid_form");
    }
}
