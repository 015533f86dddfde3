use chrono::{Datelike, Utc};

const BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #faf7f2; color: #1c1917; }
        header { background: #ffffff; padding: 1.5rem; border-bottom: 1px solid #e7e5e4; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; max-width: 1080px; margin: 0 auto; }
        .header-bar h1 { margin: 0; font-size: 1.5rem; }
        nav { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
        nav a { color: #9a3412; text-decoration: none; font-weight: 600; padding: 0.4rem 0.85rem; border-radius: 999px; border: 1px solid transparent; }
        nav a:hover { background: #fff7ed; border-color: #fed7aa; }
        main { padding: 2rem 1.5rem; max-width: 1080px; margin: 0 auto; box-sizing: border-box; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e7e5e4; padding: 1.5rem; margin-bottom: 2rem; box-shadow: 0 10px 30px rgba(28, 25, 23, 0.05); }
        .panel h2 { margin-top: 0; }
        label { display: block; margin-top: 1rem; margin-bottom: 0.35rem; font-weight: 600; }
        input, textarea, select { width: 100%; padding: 0.7rem; border-radius: 8px; border: 1px solid #d6d3d1; background: #fafaf9; color: #1c1917; box-sizing: border-box; font-size: 0.95rem; }
        input:focus, textarea:focus, select:focus { outline: none; border-color: #ea580c; box-shadow: 0 0 0 3px rgba(234, 88, 12, 0.12); }
        input[type="checkbox"] { width: auto; margin-right: 0.5rem; }
        button { padding: 0.7rem 1.2rem; border: none; border-radius: 8px; background: #ea580c; color: #ffffff; font-weight: 600; cursor: pointer; }
        button:hover { background: #c2410c; }
        button.ghost { background: #f5f5f4; color: #1c1917; border: 1px solid #d6d3d1; }
        button.ghost:hover { background: #e7e5e4; }
        button.danger { background: #b91c1c; }
        button.danger:hover { background: #991b1b; }
        table { width: 100%; border-collapse: collapse; background: #ffffff; }
        th, td { padding: 0.7rem 0.9rem; border-bottom: 1px solid #e7e5e4; text-align: left; vertical-align: top; }
        th { background: #f5f5f4; font-weight: 600; }
        td form { display: inline-block; margin-right: 0.35rem; }
        .tag { display: inline-block; padding: 0.2rem 0.7rem; border-radius: 999px; font-size: 0.82rem; font-weight: 600; }
        .tag.published { background: #dcfce7; color: #166534; }
        .tag.draft { background: #fef3c7; color: #92400e; }
        .tag.category { background: #ffedd5; color: #9a3412; }
        .flash { padding: 0.85rem 1.1rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; }
        .flash.success { background: #dcfce7; color: #166534; }
        .flash.error { background: #fee2e2; color: #b91c1c; }
        .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1.25rem; }
        .card { background: #ffffff; border-radius: 12px; border: 1px solid #e7e5e4; overflow: hidden; display: flex; flex-direction: column; }
        .card img { width: 100%; height: 180px; object-fit: cover; background: #f5f5f4; }
        .card .card-body { padding: 1rem 1.1rem 1.25rem; display: flex; flex-direction: column; gap: 0.5rem; }
        .card h3 { margin: 0; font-size: 1.05rem; }
        .card p { margin: 0; color: #57534e; font-size: 0.92rem; line-height: 1.5; }
        .controls { display: flex; gap: 0.75rem; flex-wrap: wrap; margin-bottom: 1.5rem; }
        .controls input, .controls select { width: auto; min-width: 160px; }
        .pager { display: flex; gap: 0.75rem; align-items: center; margin-top: 1.5rem; }
        .muted { color: #78716c; font-size: 0.9rem; }
        .error-panel { background: #fee2e2; border: 1px solid #fecaca; border-radius: 12px; padding: 1.5rem; text-align: center; color: #b91c1c; }
        .stat-row { display: flex; gap: 1.25rem; flex-wrap: wrap; }
        .stat { background: #ffffff; border: 1px solid #e7e5e4; border-radius: 12px; padding: 1.25rem 1.5rem; min-width: 160px; }
        .stat .value { font-size: 1.9rem; font-weight: 700; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #a8a29e; }
        @media (max-width: 768px) {
            main { padding: 1.5rem 1rem; }
            th, td { padding: 0.5rem; font-size: 0.9rem; }
        }
"#;

/// Shared page shell for both surfaces; the nav links differ per surface.
pub fn render_page(meta_title: &str, heading: &str, nav_html: &str, body: &str, scripts: &str) -> String {
    let footer = render_footer();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{BASE_STYLES}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <h1>{heading}</h1>
            <nav>{nav_html}</nav>
        </div>
    </header>
    <main>
{body}
        {footer}
    </main>
{scripts}
</body>
</html>"#
    )
}

pub fn public_nav() -> &'static str {
    r#"<a href="/">Home</a><a href="/exhibits">Exhibits</a><a href="/workshops">Workshops</a>"#
}

pub fn admin_nav() -> &'static str {
    r#"<a href="/dashboard">Overview</a><a href="/dashboard/exhibits">Exhibits</a><a href="/dashboard/workshops">Workshops</a><form method="post" action="/logout" style="display:inline"><button type="submit" class="ghost">Log out</button></form>"#
}

pub fn render_login_page(error: Option<&str>) -> String {
    let error_html = error
        .map(|message| format!(r#"<div class="flash error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();
    let footer = render_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Museum Dashboard — Sign in</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
        :root {{ color-scheme: light; }}
        body {{ font-family: "Helvetica Neue", Arial, sans-serif; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #faf7f2; color: #1c1917; padding: 1.5rem; box-sizing: border-box; }}
        main {{ width: 100%; max-width: 420px; }}
        .panel {{ background: #ffffff; padding: 2.5rem 2.25rem; border-radius: 16px; border: 1px solid #e7e5e4; box-shadow: 0 20px 60px rgba(28, 25, 23, 0.08); box-sizing: border-box; }}
        h1 {{ margin: 0 0 0.5rem; font-size: 1.6rem; text-align: center; }}
        p.description {{ margin: 0 0 1.5rem; color: #57534e; text-align: center; font-size: 0.95rem; }}
        label {{ display: block; margin-top: 1.1rem; font-weight: 600; }}
        input {{ width: 100%; padding: 0.8rem; margin-top: 0.5rem; border-radius: 10px; border: 1px solid #d6d3d1; background: #fafaf9; font-size: 1rem; box-sizing: border-box; }}
        input:focus {{ outline: none; border-color: #ea580c; box-shadow: 0 0 0 3px rgba(234, 88, 12, 0.12); }}
        button {{ margin-top: 1.75rem; width: 100%; padding: 0.9rem; border: none; border-radius: 10px; background: #ea580c; color: #ffffff; font-weight: 600; font-size: 1rem; cursor: pointer; }}
        button:hover {{ background: #c2410c; }}
        .flash.error {{ padding: 0.8rem 1rem; border-radius: 10px; background: #fee2e2; color: #b91c1c; margin-bottom: 1rem; font-weight: 600; }}
        .app-footer {{ margin-top: 2.5rem; text-align: center; font-size: 0.85rem; color: #a8a29e; }}
    </style>
</head>
<body>
    <main>
        <section class="panel">
            <h1>Museum Dashboard</h1>
            <p class="description">Sign in with your curator account.</p>
            {error_html}
            <form method="post" action="/login">
                <label for="email">Email</label>
                <input id="email" name="email" type="email" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <button type="submit">Sign in</button>
            </form>
        </section>
        {footer}
    </main>
</body>
</html>"#
    )
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(r#"<footer class="app-footer">© {current_year} City Heritage Museum</footer>"#)
}

/// Compose a flash message snippet for known status or error codes carried in
/// the redirect query string.
pub fn compose_flash_message(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "exhibit_created" => "Exhibit created.",
            "exhibit_updated" => "Exhibit updated.",
            "exhibit_deleted" => "Exhibit deleted.",
            "exhibit_published" => "Exhibit published.",
            "exhibit_unpublished" => "Exhibit moved back to draft.",
            "workshop_created" => "Workshop created.",
            "workshop_updated" => "Workshop updated.",
            "workshop_deleted" => "Workshop deleted.",
            "workshop_published" => "Workshop published.",
            "workshop_unpublished" => "Workshop moved back to draft.",
            _ => "",
        };

        if !message.is_empty() {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "missing_fields" => "Please fill in the required fields.",
            "invalid_date" => "Please provide a valid date (YYYY-MM-DD).",
            "invalid_order" => "Display order must be a positive number.",
            "invalid_image" => "The image must be a JPEG, PNG, WebP or GIF up to 5 MB.",
            "invalid_form" => "The submitted form could not be read. Try again.",
            "upload_failed" => "The image could not be uploaded. Try again.",
            "not_found" => "That record no longer exists.",
            _ => "Something went wrong. Check the server logs.",
        };

        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Art" & 'craft'</b>"#),
            "&lt;b&gt;&quot;Art&quot; &amp; &#39;craft&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn flash_prefers_status_over_error() {
        let html = compose_flash_message(Some("exhibit_created"), Some("missing_fields"));
        assert!(html.contains("flash success"));
        assert!(html.contains("Exhibit created."));
    }

    #[test]
    fn form_and_image_errors_have_distinct_messages() {
        let form = compose_flash_message(None, Some("invalid_form"));
        let image = compose_flash_message(None, Some("invalid_image"));
        assert!(form.contains("could not be read"));
        assert!(image.contains("JPEG, PNG, WebP or GIF"));
        assert_ne!(form, image);
    }

    #[test]
    fn unknown_error_code_gets_generic_message() {
        let html = compose_flash_message(None, Some("mystery"));
        assert!(html.contains("flash error"));
        assert!(html.contains("Something went wrong"));
    }

    #[test]
    fn no_codes_yields_empty_flash() {
        assert_eq!(compose_flash_message(None, None), "");
    }
}
