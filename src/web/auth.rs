use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;
use reqwest::StatusCode as UpstreamStatus;
use serde::Deserialize;
use tracing::error;

use crate::{
    store::{StoreError, auth::StoreUser},
    web::{AppState, templates::render_login_page},
};

pub const SESSION_COOKIE: &str = "museum_session";
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    if require_user(&state, &jar).await.is_ok() {
        return Err(Redirect::to("/dashboard"));
    }

    Ok(Html(render_login_page(None)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let email = form.email.trim();

    let session = match state.store().sign_in(email, &form.password).await {
        Ok(session) => session,
        Err(StoreError::Rejected { status, .. })
            if status == UpstreamStatus::BAD_REQUEST || status == UpstreamStatus::UNAUTHORIZED =>
        {
            return Err((
                StatusCode::UNAUTHORIZED,
                Html(render_login_page(Some("Invalid email or password."))),
            ));
        }
        Err(err) => {
            error!(?err, "sign-in against the content store failed");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_login_page(Some(
                    "Something went wrong. Please try again.",
                ))),
            ));
        }
    };

    // Track the store's token lifetime when it reports one.
    let max_age = session
        .expires_in
        .map(CookieDuration::seconds)
        .unwrap_or_else(|| CookieDuration::days(SESSION_TTL_DAYS));

    let mut cookie = Cookie::new(SESSION_COOKIE, session.access_token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(max_age);

    let jar = jar.add(cookie);
    Ok((jar, Redirect::to("/dashboard")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(err) = state.store().sign_out(cookie.value()).await {
            error!(?err, "failed to revoke session during logout");
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to("/"))
}

/// Admin session gate. The cookie carries the store-issued access token and
/// every gated request revalidates it against the store's user endpoint.
pub async fn require_user(state: &AppState, jar: &CookieJar) -> Result<StoreUser, Redirect> {
    let Some(token_cookie) = jar.get(SESSION_COOKIE) else {
        return Err(Redirect::to("/login"));
    };

    match state.store().user_for_token(token_cookie.value()).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(Redirect::to("/login")),
        Err(err) => {
            error!(?err, "failed to validate session token");
            Err(Redirect::to("/login"))
        }
    }
}
