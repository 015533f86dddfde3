use axum::{
    extract::{Form, Multipart, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    content::{NewWorkshop, WorkshopPatch},
    web::{
        AppState,
        auth::require_user,
        templates::{admin_nav, compose_flash_message, escape_html, render_page},
        uploads::read_admin_form,
    },
};

use super::{FlashParams, store_image, translation_fields_html};

const PAGE_PATH: &str = "/dashboard/workshops";

#[derive(Deserialize)]
pub(crate) struct IdForm {
    id: Uuid,
}

#[derive(Deserialize)]
pub(crate) struct EditQuery {
    id: Uuid,
}

pub async fn workshops_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(flash): Query<FlashParams>,
) -> Result<Html<String>, Redirect> {
    require_user(&state, &jar).await?;

    let flash_html = compose_flash_message(flash.status.as_deref(), flash.error.as_deref());

    let table_html = match state.workshops().list().await {
        Ok(workshops) if workshops.is_empty() => {
            r#"<p class="muted">No workshops yet. Create the first one below.</p>"#.to_string()
        }
        Ok(workshops) => {
            let mut rows = String::new();
            for workshop in workshops {
                let status_tag = if workshop.published {
                    r#"<span class="tag published">Published</span>"#
                } else {
                    r#"<span class="tag draft">Draft</span>"#
                };
                let toggle_label = if workshop.published { "Unpublish" } else { "Publish" };

                rows.push_str(&format!(
                    r#"<tr>
    <td>{title}</td>
    <td>{date}</td>
    <td>{order}</td>
    <td>{status_tag}</td>
    <td>
        <a href="{page}/edit?id={id}"><button type="button" class="ghost">Edit</button></a>
        <form method="post" action="{page}/publish"><input type="hidden" name="id" value="{id}"><button type="submit" class="ghost">{toggle_label}</button></form>
        <form method="post" action="{page}/delete"><input type="hidden" name="id" value="{id}"><button type="submit" class="danger">Delete</button></form>
    </td>
</tr>"#,
                    title = escape_html(&workshop.title),
                    date = workshop.date.format("%Y-%m-%d"),
                    order = workshop.order,
                    page = PAGE_PATH,
                    id = workshop.id,
                ));
            }
            format!(
                r#"<table><thead><tr><th>Title</th><th>Date</th><th>Order</th><th>Status</th><th>Actions</th></tr></thead><tbody>{rows}</tbody></table>"#
            )
        }
        Err(err) => {
            error!(?err, "failed to list workshops");
            r#"<div class="flash error">Could not load workshops from the content store.</div>"#
                .to_string()
        }
    };

    let translations = translation_fields_html(&Default::default(), &Default::default());
    let body = format!(
        r#"
        {flash_html}
        <section class="panel">
            <h2>Workshops</h2>
            {table_html}
        </section>
        <section class="panel">
            <h2>New workshop</h2>
            <form method="post" action="{PAGE_PATH}" enctype="multipart/form-data">
                <label for="title">Title</label>
                <input id="title" name="title" required>
                <label for="description">Description</label>
                <textarea id="description" name="description" rows="4" placeholder="Optional"></textarea>
                <label for="date">Date</label>
                <input id="date" name="date" type="date" required>
                <label for="order">Display order</label>
                <input id="order" name="order" type="number" min="1" required>
                <label for="category">Category</label>
                <input id="category" name="category" placeholder="Optional">
                <label for="image">Image (JPEG, PNG, WebP or GIF, up to 5 MB)</label>
                <input id="image" name="image" type="file" accept="image/*">
                {translations}
                <label><input type="checkbox" name="published"> Publish immediately</label>
                <p><button type="submit">Create workshop</button></p>
            </form>
        </section>
"#
    );

    Ok(Html(render_page(
        "Workshops — Museum Dashboard",
        "Manage Workshops",
        admin_nav(),
        &body,
        "",
    )))
}

pub async fn workshop_edit_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<EditQuery>,
) -> Result<Html<String>, Redirect> {
    require_user(&state, &jar).await?;

    let workshop = match state.workshops().fetch(query.id).await {
        Ok(Some(workshop)) => workshop,
        Ok(None) => return Err(Redirect::to(&format!("{PAGE_PATH}?error=not_found"))),
        Err(err) => {
            error!(?err, "failed to fetch workshop for editing");
            return Err(Redirect::to(&format!("{PAGE_PATH}?error=unknown")));
        }
    };

    let current_image = workshop
        .image_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<p class="muted">Current image: <a href="{0}">{0}</a></p>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();
    let published_checked = if workshop.published { "checked" } else { "" };
    let translations =
        translation_fields_html(&workshop.title_translations, &workshop.description_translations);

    let body = format!(
        r#"
        <section class="panel">
            <h2>Edit workshop</h2>
            <form method="post" action="{PAGE_PATH}/update" enctype="multipart/form-data">
                <input type="hidden" name="id" value="{id}">
                <label for="title">Title</label>
                <input id="title" name="title" value="{title}" required>
                <label for="description">Description</label>
                <textarea id="description" name="description" rows="4" placeholder="Optional">{description}</textarea>
                <label for="date">Date</label>
                <input id="date" name="date" type="date" value="{date}" required>
                <label for="order">Display order</label>
                <input id="order" name="order" type="number" min="1" value="{order}" required>
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
        id = workshop.id,
        title = escape_html(&workshop.title),
        description = escape_html(workshop.description.as_deref().unwrap_or("")),
        date = workshop.date.format("%Y-%m-%d"),
        order = workshop.order,
        category = escape_html(workshop.category.as_deref().unwrap_or("")),
    );

    Ok(Html(render_page(
        "Edit workshop — Museum Dashboard",
        "Manage Workshops",
        admin_nav(),
        &body,
        "",
    )))
}

pub async fn create_workshop(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    let form = match read_admin_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            error!(%err, "rejected workshop form submission");
            return Ok(Redirect::to(&format!(
                "{PAGE_PATH}?error={}",
                err.flash_code()
            )));
        }
    };

    let Some(title) = form.text("title") else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=missing_fields")));
    };
    let Some(date) = parse_date(form.text("date")) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=invalid_date")));
    };
    let Some(order) = parse_order(form.text("order")) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=invalid_order")));
    };

    let mut image_url = None;
    if let Some(image) = form.image.clone() {
        match store_image(&state, image).await {
            Ok(url) => image_url = Some(url),
            Err(code) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error={code}"))),
        }
    }

    let payload = NewWorkshop {
        title: title.to_string(),
        description: form.text("description").map(str::to_string),
        date,
        order,
        title_translations: form.translations("title_translations"),
        description_translations: form.translations("description_translations"),
        category: form.text("category").map(str::to_string),
        image_url,
        published: form.flag("published"),
    };

    match state.workshops().insert(&payload).await {
        Ok(_) => Ok(Redirect::to(&format!("{PAGE_PATH}?status=workshop_created"))),
        Err(err) => {
            error!(?err, "failed to insert workshop");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

pub async fn update_workshop(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    let form = match read_admin_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            error!(%err, "rejected workshop form submission");
            return Ok(Redirect::to(&format!(
                "{PAGE_PATH}?error={}",
                err.flash_code()
            )));
        }
    };

    let Some(id) = form.text("id").and_then(|raw| raw.parse::<Uuid>().ok()) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=not_found")));
    };
    let Some(title) = form.text("title") else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=missing_fields")));
    };
    let Some(date) = parse_date(form.text("date")) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=invalid_date")));
    };
    let Some(order) = parse_order(form.text("order")) else {
        return Ok(Redirect::to(&format!("{PAGE_PATH}?error=invalid_order")));
    };

    let previous = match state.workshops().fetch(id).await {
        Ok(Some(workshop)) => workshop,
        Ok(None) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error=not_found"))),
        Err(err) => {
            error!(?err, "failed to fetch workshop before update");
            return Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")));
        }
    };

    let mut image_url = None;
    if let Some(image) = form.image.clone() {
        match store_image(&state, image).await {
            Ok(url) => image_url = Some(url),
            Err(code) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error={code}"))),
        }
    }
    let replaced_image = image_url.is_some();

    let patch = WorkshopPatch {
        title: Some(title.to_string()),
        description: Some(form.text("description").map(str::to_string)),
        date: Some(date),
        order: Some(order),
        title_translations: Some(form.translations("title_translations")),
        description_translations: Some(form.translations("description_translations")),
        category: Some(form.text("category").map(str::to_string)),
        image_url,
        published: Some(form.flag("published")),
    };

    match state.workshops().update(id, &patch).await {
        Ok(_) => {
            if replaced_image {
                state
                    .workshops()
                    .discard_replaced_image(previous.image_url.as_deref())
                    .await;
            }
            Ok(Redirect::to(&format!("{PAGE_PATH}?status=workshop_updated")))
        }
        Err(err) => {
            error!(?err, "failed to update workshop");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

pub async fn toggle_workshop_published(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<IdForm>,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    let workshop = match state.workshops().fetch(form.id).await {
        Ok(Some(workshop)) => workshop,
        Ok(None) => return Ok(Redirect::to(&format!("{PAGE_PATH}?error=not_found"))),
        Err(err) => {
            error!(?err, "failed to fetch workshop before publish toggle");
            return Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")));
        }
    };

    let patch = publish_toggle(workshop.published);

    match state.workshops().update(form.id, &patch).await {
        Ok(updated) => {
            let status = if updated.published {
                "workshop_published"
            } else {
                "workshop_unpublished"
            };
            Ok(Redirect::to(&format!("{PAGE_PATH}?status={status}")))
        }
        Err(err) => {
            error!(?err, "failed to toggle workshop publish state");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

pub async fn delete_workshop(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<IdForm>,
) -> Result<Redirect, Redirect> {
    require_user(&state, &jar).await?;

    match state.workshops().delete(form.id).await {
        Ok(()) => Ok(Redirect::to(&format!("{PAGE_PATH}?status=workshop_deleted"))),
        Err(err) => {
            error!(?err, "failed to delete workshop");
            Ok(Redirect::to(&format!("{PAGE_PATH}?error=unknown")))
        }
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?, "%Y-%m-%d").ok()
}

fn parse_order(value: Option<&str>) -> Option<i32> {
    value?.parse::<i32>().ok().filter(|order| *order > 0)
}

fn publish_toggle(current: bool) -> WorkshopPatch {
    WorkshopPatch {
        published: Some(!current),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date(Some("2026-03-14")),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert_eq!(parse_date(Some("14/03/2026")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn parse_order_requires_a_positive_integer() {
        assert_eq!(parse_order(Some("3")), Some(3));
        assert_eq!(parse_order(Some("0")), None);
        assert_eq!(parse_order(Some("-2")), None);
        assert_eq!(parse_order(Some("first")), None);
    }

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
        let value = serde_json::to_value(publish_toggle(true)).unwrap();
        assert_eq!(value, serde_json::json!({ "published": false }));
    }
}
