use std::collections::BTreeSet;

use axum::{extract::State, response::Html};
use tracing::{error, warn};

use crate::web::{
    AppState,
    templates::{escape_html, public_nav, render_page},
};

pub async fn landing_page() -> Html<String> {
    let body = r#"
        <section class="panel">
            <h2>Welcome to the City Heritage Museum</h2>
            <p>Browse the current exhibits or join one of our heritage awareness workshops.</p>
            <p>
                <a href="/exhibits"><button type="button">Explore exhibits</button></a>
                <a href="/workshops"><button type="button" class="ghost">See workshops</button></a>
            </p>
        </section>
"#;

    Html(render_page(
        "City Heritage Museum",
        "City Heritage Museum",
        public_nav(),
        body,
        "",
    ))
}

/// Public exhibit listing. The page shell carries the category options; the
/// embedded script drives every filter/sort/page change through the Read API.
pub async fn exhibits_page(State(state): State<AppState>) -> Html<String> {
    // Category options are a convenience for the dropdown; the page still
    // works with just "All" if the fetch fails.
    let categories: BTreeSet<String> = match state.exhibits().list_published().await {
        Ok(records) => records
            .into_iter()
            .filter_map(|exhibit| exhibit.category)
            .collect(),
        Err(err) => {
            warn!(?err, "failed to load categories for the exhibits page");
            BTreeSet::new()
        }
    };

    let mut options = String::from(r#"<option value="All">All categories</option>"#);
    for category in categories {
        let escaped = escape_html(&category);
        options.push_str(&format!(r#"<option value="{escaped}">{escaped}</option>"#));
    }

    let body = format!(
        r#"
        <section class="panel">
            <div class="controls">
                <input id="search-input" type="search" placeholder="Search exhibits">
                <select id="category-select">{options}</select>
                <select id="sort-select">
                    <option value="newest">Newest first</option>
                    <option value="oldest">Oldest first</option>
                    <option value="az">Title A–Z</option>
                    <option value="za">Title Z–A</option>
                </select>
            </div>
            <p class="muted" id="result-count"></p>
            <div id="error-panel"></div>
            <div class="grid" id="exhibit-grid"></div>
            <div class="pager">
                <button id="prev-button" type="button" class="ghost">Previous</button>
                <span id="page-label" class="muted"></span>
                <button id="next-button" type="button" class="ghost">Next</button>
            </div>
        </section>
"#
    );

    let scripts = format!("<script>{EXHIBITS_SCRIPT}</script>");

    Html(render_page(
        "Exhibits — City Heritage Museum",
        "Exhibits",
        public_nav(),
        &body,
        &scripts,
    ))
}

pub async fn workshops_page(State(state): State<AppState>) -> Html<String> {
    let body = match state.workshops().list_published().await {
        Ok(workshops) if workshops.is_empty() => {
            r#"<section class="panel"><p class="muted">No workshops are scheduled right now. Check back soon.</p></section>"#.to_string()
        }
        Ok(workshops) => {
            let mut cards = String::new();
            for workshop in workshops {
                let image = workshop
                    .image_url
                    .as_deref()
                    .map(|url| {
                        format!(
                            r#"<img src="{}" alt="{}">"#,
                            escape_html(url),
                            escape_html(&workshop.title)
                        )
                    })
                    .unwrap_or_default();
                let description = workshop
                    .description
                    .as_deref()
                    .map(|text| format!("<p>{}</p>", escape_html(text)))
                    .unwrap_or_default();
                let date = workshop.date.format("%B %-d, %Y");

                cards.push_str(&format!(
                    r#"<article class="card">{image}<div class="card-body"><h3>{title}</h3><p class="muted">{date}</p>{description}</div></article>"#,
                    title = escape_html(&workshop.title),
                ));
            }
            format!(r#"<div class="grid">{cards}</div>"#)
        }
        Err(err) => {
            error!(?err, "failed to fetch workshops from the content store");
            r#"<div class="error-panel"><p>Could not load workshops. Please try again later.</p></div>"#.to_string()
        }
    };

    Html(render_page(
        "Workshops — City Heritage Museum",
        "Workshops",
        public_nav(),
        &body,
        "",
    ))
}

// Each fetch carries a generation number; only the response matching the
// latest generation is applied, so a slow superseded response can never
// overwrite a newer one.
const EXHIBITS_SCRIPT: &str = r#"
(function () {
  var state = { category: "All", search: "", sort: "newest", page: 1 };
  var generation = 0;

  var grid = document.getElementById("exhibit-grid");
  var errorPanel = document.getElementById("error-panel");
  var resultCount = document.getElementById("result-count");
  var pageLabel = document.getElementById("page-label");
  var prevButton = document.getElementById("prev-button");
  var nextButton = document.getElementById("next-button");
  var searchInput = document.getElementById("search-input");
  var categorySelect = document.getElementById("category-select");
  var sortSelect = document.getElementById("sort-select");

  async function loadExhibits() {
    var gen = ++generation;
    var params = new URLSearchParams({ sort: state.sort, page: String(state.page), limit: "6" });
    if (state.category !== "All") params.set("category", state.category);
    if (state.search.trim()) params.set("search", state.search.trim());

    try {
      var response = await fetch("/api/exhibits?" + params.toString());
      if (!response.ok) throw new Error("request failed with status " + response.status);
      var payload = await response.json();
      if (gen !== generation) return;
      render(payload);
    } catch (err) {
      if (gen !== generation) return;
      renderError();
    }
  }

  function render(payload) {
    errorPanel.innerHTML = "";
    grid.innerHTML = "";

    var exhibits = payload.exhibits;
    var pagination = payload.pagination;

    if (exhibits.length === 0) {
      var empty = document.createElement("p");
      empty.className = "muted";
      empty.textContent = "No exhibits match your filters.";
      grid.appendChild(empty);
    }

    exhibits.forEach(function (exhibit) {
      var card = document.createElement("article");
      card.className = "card";

      if (exhibit.image_url) {
        var image = document.createElement("img");
        image.src = exhibit.image_url;
        image.alt = exhibit.title;
        card.appendChild(image);
      }

      var body = document.createElement("div");
      body.className = "card-body";

      var heading = document.createElement("h3");
      heading.textContent = exhibit.title;
      body.appendChild(heading);

      if (exhibit.category) {
        var tag = document.createElement("span");
        tag.className = "tag category";
        tag.textContent = exhibit.category;
        body.appendChild(tag);
      }

      var text = document.createElement("p");
      text.textContent = exhibit.description;
      body.appendChild(text);

      card.appendChild(body);
      grid.appendChild(card);
    });

    var totalPages = Math.max(pagination.totalPages, 1);
    resultCount.textContent = pagination.total + " exhibit" + (pagination.total === 1 ? "" : "s");
    pageLabel.textContent = "Page " + pagination.page + " of " + totalPages;
    prevButton.disabled = pagination.page <= 1;
    nextButton.disabled = !pagination.hasMore;
  }

  function renderError() {
    grid.innerHTML = "";
    errorPanel.innerHTML = "";

    var panel = document.createElement("div");
    panel.className = "error-panel";

    var message = document.createElement("p");
    message.textContent = "Could not load exhibits.";
    panel.appendChild(message);

    var retry = document.createElement("button");
    retry.type = "button";
    retry.textContent = "Retry";
    retry.addEventListener("click", loadExhibits);
    panel.appendChild(retry);

    errorPanel.appendChild(panel);
  }

  searchInput.addEventListener("input", function () {
    state.search = searchInput.value;
    state.page = 1;
    loadExhibits();
  });

  categorySelect.addEventListener("change", function () {
    state.category = categorySelect.value;
    state.page = 1;
    loadExhibits();
  });

  sortSelect.addEventListener("change", function () {
    state.sort = sortSelect.value;
    state.page = 1;
    loadExhibits();
  });

  prevButton.addEventListener("click", function () {
    if (state.page > 1) {
      state.page -= 1;
      loadExhibits();
    }
  });

  nextButton.addEventListener("click", function () {
    state.page += 1;
    loadExhibits();
  });

  loadExhibits();
})();
"#;
