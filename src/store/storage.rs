use uuid::Uuid;

use super::{StoreClient, StoreError, expect_success, truncate_body};

impl StoreClient {
    /// Upload an object and return its public URL. Object names are caller
    /// supplied; see [`random_object_name`] for the collision-tolerant default.
    pub async fn upload_object(
        &self,
        bucket: &str,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, object_name);
        let response = self
            .authed(self.http.post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status,
                message: truncate_body(&body),
            });
        }

        Ok(self.public_object_url(bucket, object_name))
    }

    pub fn public_object_url(&self, bucket: &str, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, object_name
        )
    }

    pub async fn delete_object(&self, bucket: &str, object_path: &str) -> Result<(), StoreError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, object_path);
        let response = self.authed(self.http.delete(url)).send().await?;
        expect_success(response).await
    }
}

/// Random object name for an upload. Collisions are accepted as negligible
/// rather than mitigated.
pub fn random_object_name(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Parse the object path back out of a stored public URL. Returns `None` for
/// URLs that do not reference the given bucket.
pub fn object_path<'a>(url: &'a str, bucket: &str) -> Option<&'a str> {
    let marker = format!("/{bucket}/");
    url.split_once(marker.as_str())
        .map(|(_, path)| path)
        .filter(|path| !path.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_extracts_bucket_relative_path() {
        let url = "https://store.example.com/storage/v1/object/public/exhibit-images/abc123.png";
        assert_eq!(object_path(url, "exhibit-images"), Some("abc123.png"));
    }

    #[test]
    fn object_path_rejects_other_buckets() {
        let url = "https://store.example.com/storage/v1/object/public/avatars/abc123.png";
        assert_eq!(object_path(url, "exhibit-images"), None);
    }

    #[test]
    fn object_path_rejects_trailing_slash_urls() {
        let url = "https://store.example.com/storage/v1/object/public/exhibit-images/";
        assert_eq!(object_path(url, "exhibit-images"), None);
    }

    #[test]
    fn random_object_name_keeps_extension() {
        let name = random_object_name("webp");
        assert!(name.ends_with(".webp"));
        assert_eq!(name.len(), 36 + 5);
    }
}
