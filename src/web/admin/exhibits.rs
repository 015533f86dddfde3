use axum::{
    extract::{Form, Multipart, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    content::{ExhibitPatch, NewExhibit},
    web::{
        AppState,
        auth::require_user,
        templates::{admin_nav, compose_flash_message, escape_html, render_page},
        uploads::read_admin_form,
    },
};

use super::{FlashParams, store_image, translation_fields_html};

const PAGE_PATH: &str = "/dashboard/exhibits";

#[derive(Deserialize)]
pub(crate) struct IdForm {
    id: Uuid,
}

#[derive(Deserialize)]
pub(crate) struct EditQuery {
    id: Uuid,
}

pub async fn exhibits_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(flash): Query<FlashParams>,
) -> Result<Html<String>, Redirect> {
    require_user(&state, &jar).await?;

    let flash_html = compose_flash_message(flash.status.as_deref(), flash.error.as_deref());

    let table_html = match state.exhibits().list().await {
        Ok(exhibits) if exhibits.is_empty() => {
            r#"<p class="muted">No exhibits yet. Create the first one below.</p>"#.to_string()
        }
        Ok(exhibits) => {
            let mut rows = String::new();
            for exhibit in exhibits {
                let status_tag = if exhibit.published {
                    r#"<span class="tag published">Published</span>"#
                } else {
                    r#"<span class="tag draft">Draft</span>"#
                };
                let toggle_label = if exhibit.published { "Unpublish" } else { "Publish" };
                let category = exhibit
                    .category
                    .as_deref()
                    .map(escape_html)
                    .unwrap_or_else(|| "—".to_string());

                rows.push_str(&format!(
                    r#"<tr>
    <td>{title}</td>
    <td>{category}</td>
    <td>{status_tag}</td>
    <td>{created}</td>
    <td>
        <a href="{page}/edit?id={id}"><button type="button" class="ghost">Edit</button></a>
        <form method="post" action="{page}/publish"><input type="hidden" name="id" value="{id}"><button type="submit" class="ghost">{toggle_label}</button></form>
        <form method="post" action="{page}/delete"><input type="hidden" name="id" value="{id}"><button type="submit" class="danger">Delete</button></form>
    </td>
</tr>"#,
                    title = escape_html(&exhibit.title),
                    created = exhibit.created_at.format("%Y-%m-%d"),
                    page = PAGE_PATH,
                    id = exhibit.id,
                ));
            }
            format!(
                r#"<table><thead><tr><th>Title</th><th>Category</th><th>Status</th><th>Created</th><th>Actions</th></tr></thead><tbody>{rows}</tbody></table>"#
            )
        }
        Err(err) => {
            error!(?err, "failed to list exhibits");
            r#"<div class="flash error">Could not load exhibits from the content store.</div>"#
                .to_string()
        }
    };

    let translations = translation_fields_html(&Default::default(), &Default::default());
    let body = format!(
        r#"
        {flash_html}
        <section class="panel">
            <h2>Exhibits</h2>
            {table_html}
        </section>
        <section class="panel">
            <h2>New exhibit</h2>
            <form method="post" action="{PAGE_PATH}" enctype="multipart/form-data">
                <label for="title">Title</label>
                <input id="title" name="title" required>
                <label for="description">Description</label>
                <textarea id="description" name="description" rows="4" required></textarea>
                <label for="category">Category</label>
                <input id="category" name="category" placeholder="Optional">
                <label for="image">Image (JPEG, PNG, WebP or GIF, up to 5 MB)</label>
                <input id="image" name="image" type="file" accept="image/*">
                {translations}
                <label><input type="checkbox" name="published"> Publish immediately</label>
                <p><button type="submit">Create exhibit</button></p>
            </form>
        </section>
"#
    );

    Ok(Html(render_page(
        "Exhibits — Museum Dashboard",
        "Manage Exhibits",
        admin_nav(),
        &body,
        "",
    )))
}

pub async fn exhibit_edit_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<EditQuery>,
) -> Result<Html<String>, Redirect> {
    require_user(&state, &jar).await?;

    let exhibit = match state.exhibits().fetch(query.id).await {
        Ok(Some(exhibit)) => exhibit,
        Ok(None) => return Err(Redirect::to(&format!("{PAGE_PATH}?error=not_found"))),
        Err(err) => {
            error!(?err, "failed to fetch exhibit for editing");
            return Err(Redirect::to(&format!("{PAGE_PATH}?error=unknown")));
        }
    };

    let current_image = exhibit
        .image_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<p class="muted">Current image: <a href="{0}">{0}</a></p>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();
    let published_checked = if exhibit.published { "checked" } else { "" };
    let translations =
        translation_fields_html(&exhibit.title_translations, &exhibit.description_translations);

    let body = format!(
        r#"
        <section class="panel">
            <h2>Edit exhibit</h2>
            <form method="post" action="{PAGE_PATH}/update" enctype="multipart/form-data">
                <input type="hidden" name="id" value="{id}">
                <label for="title">Title</label>
                <input id="title" name="title" value="{title}" required>
                <label for="description">Description</label>
                <textarea id="description" name="description" rows="4" required>{description}</textarea>
                <label for="category">Category</label>
                <input id="category" name="category" value="{category}" placeholder="Optional">
                <label for="image">Replace image (leave empty to keep the current one)</label>
                <input id="image" name="image" type="file" accept="image/*">
                {current_image}
                {translations}
                <label><input type="checkbox" name="published" {published_checked}> Published</label>
                <p>
                    <button type="submit">Save changes</button>
                    <a href="{PAGE_PATH}"><button type="button" class="ghost">Cancel</button></a>
                </p>
            </form>
        </section>
"#,
        id = exhibit.id,
        title = escape_html(&exhibit.title),
        description = escape_html(&exhibit.description),
        category = escape_html(exhibit.category.as_deref().unwrap_or("")),
    );

    Ok(Html(render_page(
        "Edit exhibit — Museum Dashboard",
        "Manage Exhibits",
        admin_nav(),
        &body,
        "",
    )))
}

pub async fn create_exhibit(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    let form = match read_admin_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            error!(%err, "rejected exhibit form submission");
            return Ok(Redirect::to(&format!(
                "{PAGE_PATH}?error={}",
                err.flash_code()
            )));
        }
    };

    let (Some(title), Some(description)) = (form.text("title"), form.text("description")) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=missing_fields")));
    };

    let mut image_url = None;
    if let Some(image) = form.image.clone() {
        match store_image(&state, image).await {
            Ok(url) => image_url = Some(url),
            Err(code) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error={code}"))),
        }
    }

    let payload = NewExhibit {
        title: title.to_string(),
        description: description.to_string(),
        title_translations: form.translations("title_translations"),
        description_translations: form.translations("description_translations"),
        category: form.text("category").map(str::to_string),
        image_url,
        published: form.flag("published"),
    };

    match state.exhibits().insert(&payload).await {
        Ok(_) => Ok(Redirect::to(&format!("{PAGE_PATH}?status=exhibit_created"))),
        Err(err) => {
            error!(?err, "failed to insert exhibit");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

pub async fn update_exhibit(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    let form = match read_admin_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            error!(%err, "rejected exhibit form submission");
            return Ok(Redirect::to(&format!(
                "{PAGE_PATH}?error={}",
                err.flash_code()
            )));
        }
    };

    let Some(id) = form.text("id").and_then(|raw| raw.parse::<Uuid>().ok()) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=not_found")));
    };
    let (Some(title), Some(description)) = (form.text("title"), form.text("description")) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=missing_fields")));
    };

    let previous = match state.exhibits().fetch(id).await {
        Ok(Some(exhibit)) => exhibit,
        Ok(None) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error=not_found"))),
        Err(err) => {
            error!(?err, "failed to fetch exhibit before update");
            return Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")));
        }
    };

    // The image reference only changes when a new file was supplied.
    let mut image_url = None;
    if let Some(image) = form.image.clone() {
        match store_image(&state, image).await {
            Ok(url) => image_url = Some(url),
            Err(code) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error={code}"))),
        }
    }
    let replaced_image = image_url.is_some();

    let patch = ExhibitPatch {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        title_translations: Some(form.translations("title_translations")),
        description_translations: Some(form.translations("description_translations")),
        category: Some(form.text("category").map(str::to_string)),
        image_url,
        published: Some(form.flag("published")),
    };

    match state.exhibits().update(id, &patch).await {
        Ok(_) => {
            if replaced_image {
                state
                    .exhibits()
                    .discard_replaced_image(previous.image_url.as_deref())
                    .await;
            }
            Ok(Redirect::to(&format!("{PAGE_PATH}?status=exhibit_updated")))
        }
        Err(err) => {
            error!(?err, "failed to update exhibit");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

pub async fn toggle_exhibit_published(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<IdForm>,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    let exhibit = match state.exhibits().fetch(form.id).await {
        Ok(Some(exhibit)) => exhibit,
        Ok(None) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error=not_found"))),
        Err(err) => {
            error!(?err, "failed to fetch exhibit before publish toggle");
            return Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")));
        }
    };

    let patch = publish_toggle(exhibit.published);

    match state.exhibits().update(form.id, &patch).await {
        Ok(updated) => {
            let status = if updated.published {
                "exhibit_published"
            } else {
                "exhibit_unpublished"
            };
            Ok(Redirect::to(&format!("{PAGE_PATH}?status={status}")))
        }
        Err(err) => {
            error!(?err, "failed to toggle exhibit publish state");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

pub async fn delete_exhibit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<IdForm>,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    match state.exhibits().delete(form.id).await {
        Ok(()) => Ok(Redirect::to(&format!("{PAGE_PATH}?status=exhibit_deleted"))),
        Err(err) => {
            error!(?err, "failed to delete exhibit");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

fn publish_toggle(current: bool) -> ExhibitPatch {
    ExhibitPatch {
        published: Some(!current),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_publish_toggle_returns_to_the_starting_state() {
        for start in [false, true] {
            let Some(first) = publish_toggle(start).published else {
                panic!("toggle patch must set published");
            };
            let Some(second) = publish_toggle(first).published else {
                panic!("toggle patch must set published");
            };
            assert_eq!(second, start);
        }
    }

    #[test]
    fn publish_toggle_patches_only_the_published_field() {
        let value = serde_json::to_value(publish_toggle(false)).unwrap();
        assert_eq!(value, serde_json::json!({ "published": true }));
    }
}
