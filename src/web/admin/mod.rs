pub mod exhibits;
pub mod workshops;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::{
    content::{TRANSLATION_LANGUAGES, Translations},
    store::storage,
    web::{
        AppState,
        auth::require_user,
        templates::{admin_nav, escape_html, render_page},
        uploads::ImageUpload,
    },
};

/// Redirect query-string codes rendered as flash messages.
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    pub status: Option<String>,
    pub error: Option<String>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    let user = require_user(&state, &jar).await?;

    let exhibit_repo = state.exhibits();
    let workshop_repo = state.workshops();
    let body = match tokio::try_join!(exhibit_repo.list(), workshop_repo.list()) {
        Ok((exhibits, workshops)) => {
            let published_exhibits = exhibits.iter().filter(|e| e.published).count();
            let published_workshops = workshops.iter().filter(|w| w.published).count();

            format!(
                r#"
        <section class="panel">
            <h2>Overview</h2>
            <p class="muted">Signed in as {email}.</p>
            <div class="stat-row">
                <div class="stat"><div class="value">{exhibit_count}</div><div>Exhibits ({published_exhibits} published)</div></div>
                <div class="stat"><div class="value">{workshop_count}</div><div>Workshops ({published_workshops} published)</div></div>
            </div>
        </section>
        <section class="panel">
            <h2>Manage content</h2>
            <p>
                <a href="/dashboard/exhibits"><button type="button">Manage exhibits</button></a>
                <a href="/dashboard/workshops"><button type="button" class="ghost">Manage workshops</button></a>
            </p>
        </section>
"#,
                email = escape_html(user.email.as_deref().unwrap_or("unknown")),
                exhibit_count = exhibits.len(),
                workshop_count = workshops.len(),
            )
        }
        Err(err) => {
            error!(?err, "failed to load dashboard counts");
            r#"<div class="flash error">Could not reach the content store. Check the service configuration.</div>"#
                .to_string()
        }
    };

    Ok(Html(render_page(
        "Dashboard — Museum",
        "Museum Dashboard",
        admin_nav(),
        &body,
        "",
    )))
}

/// Upload a validated image and return its public URL. Failures map to the
/// `upload_failed` flash code so callers can redirect with it directly.
pub(crate) async fn store_image(
    state: &AppState,
    image: ImageUpload,
) -> Result<String, &'static str> {
    let object_name = storage::random_object_name(&image.extension);
    match state
        .store()
        .upload_object(state.bucket(), &object_name, &image.content_type, image.bytes)
        .await
    {
        Ok(url) => Ok(url),
        Err(err) => {
            error!(?err, "failed to upload image to the storage bucket");
            Err("upload_failed")
        }
    }
}

/// Collapsible block of per-language title and description inputs, prefilled
/// from the sparse translation maps.
pub(crate) fn translation_fields_html(
    title_translations: &Translations,
    description_translations: &Translations,
) -> String {
    let mut fields = String::new();
    for lang in TRANSLATION_LANGUAGES {
        let title = title_translations
            .get(*lang)
            .map(|value| escape_html(value))
            .unwrap_or_default();
        let description = description_translations
            .get(*lang)
            .map(|value| escape_html(value))
            .unwrap_or_default();

        fields.push_str(&format!(
            r#"<fieldset>
    <legend>{lang}</legend>
    <label for="title-{lang}">Title ({lang})</label>
    <input id="title-{lang}" name="title_translations.{lang}" value="{title}">
    <label for="description-{lang}">Description ({lang})</label>
    <textarea id="description-{lang}" name="description_translations.{lang}" rows="2">{description}</textarea>
</fieldset>"#
        ));
    }

    format!(
        r#"<details class="translations">
    <summary>Translations (optional)</summary>
    {fields}
</details>"#
    )
}

#[cfg(test)]
mod tests {
    use crate::config::{AppConfig, StoreConfig};

    use super::*;

    #[tokio::test]
    async fn dashboard_counts_are_fetched_concurrently() {
        let state = AppState::new(AppConfig {
            store: StoreConfig {
                url: "http://127.0.0.1:9".to_string(),
                service_key: "test-key".to_string(),
            },
            storage_bucket: "exhibit-images".to_string(),
            port: 0,
        });

        // Repositories must outlive the joined list futures.
        let exhibit_repo = state.exhibits();
        let workshop_repo = state.workshops();
        let result = tokio::try_join!(exhibit_repo.list(), workshop_repo.list());
        assert!(result.is_err());
    }

    #[test]
    fn translation_fields_cover_every_supported_language() {
        let mut titles = Translations::new();
        titles.insert("de".to_string(), "Töpferei".to_string());

        let html = translation_fields_html(&titles, &Translations::new());
        for lang in TRANSLATION_LANGUAGES {
            assert!(html.contains(&format!("title_translations.{lang}")));
            assert!(html.contains(&format!("description_translations.{lang}")));
        }
        assert!(html.contains(r#"value="Töpferei""#));
    }
}
