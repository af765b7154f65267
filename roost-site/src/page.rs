//! Per-tweet HTML pages.
//!
//! [`render_page`] is a pure function from a [`Record`] to a complete
//! document; writing it under `tweet/<id>/index.html` is left to
//! [`crate::bake`].
use crate::escape::{decode_entities, escape_html, normalize_newlines, take_chars, truncate_with};
use roost_common::{Result, RoostError};
use roost_social::twitter::Record;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Characters of escaped text kept in the description meta tag.
pub const SUMMARY_CHARS: usize = 110;
/// Characters of raw text that lead the page title.
pub const TITLE_CHARS: usize = 50;
/// Characters of raw text used as the structured-data headline.
pub const HEADLINE_CHARS: usize = 110;

const SUMMARY_MARKER: &str = "...";

/// The forms of a record's `alt` text that end up in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltText {
    /// Newlines normalised, trimmed, entities decoded. Not safe for HTML.
    pub raw: String,
    /// `raw` with `& < > " '` escaped.
    pub full: String,
    /// First [`SUMMARY_CHARS`] characters of `full`, `...` appended when cut.
    ///
    /// The cut is made on the escaped text, so it can land inside an entity
    /// such as `&amp;`.
    pub summary: String,
    /// `full` with newlines turned into `<br>`.
    pub with_br: String,
}

impl AltText {
    pub fn from_source(alt: &str) -> Self {
        let raw = decode_entities(normalize_newlines(alt).trim());
        let full = escape_html(&raw);
        let summary = truncate_with(&full, SUMMARY_CHARS, SUMMARY_MARKER);
        let with_br = full.replace('\n', "<br>");
        Self {
            raw,
            full,
            summary,
            with_br,
        }
    }
}

/// Escaped `<title>`: start of the text, then who posted it.
pub fn page_title(raw_alt: &str, name: &str, handle: &str) -> String {
    let (lead, _) = take_chars(raw_alt, TITLE_CHARS);
    escape_html(format!("{lead} — {name} @{handle}").trim())
}

/// Schema.org graph: breadcrumb plus the posting itself. Paths are root-relative.
pub fn structured_data(id: &str, name: &str, handle: &str, raw_alt: &str) -> Value {
    let (headline, _) = take_chars(raw_alt, HEADLINE_CHARS);
    json!({
        "@context": "https://schema.org",
        "@graph": [
            {
                "@type": "BreadcrumbList",
                "itemListElement": [
                    {"@type": "ListItem", "position": 1, "name": "Home", "item": "/"},
                    {"@type": "ListItem", "position": 2, "name": "Tweet", "item": format!("/tweet/{id}/")}
                ]
            },
            {
                "@type": "SocialMediaPosting",
                "identifier": id,
                "headline": headline,
                "articleBody": raw_alt,
                "image": format!("/img/{id}.webp"),
                "author": {"@type": "Person", "name": name, "alternateName": handle}
            }
        ]
    })
}

/// Pretty JSON that cannot terminate the surrounding `<script>` element.
fn script_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?.replace("</", "<\\/"))
}

/// A rendered page and the id it is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub id: String,
    pub html: String,
}

impl RenderedPage {
    /// Location relative to the tweet output directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.id).join("index.html")
    }
}

/// Render the page for one record.
///
/// Fails with [`RoostError::MissingId`] when the record has no usable id, and
/// with [`RoostError::Render`] when the id cannot be used as a single path
/// segment.
///
/// ```
/// use roost_site::page::render_page;
/// use roost_social::twitter::{Record, RecordId};
///
/// let record = Record {
///     id: Some(RecordId::Text("42".into())),
///     name: "Ada".into(),
///     handle: "ada".into(),
///     alt: "A & B\n<script>".into(),
/// };
/// let page = render_page(&record).unwrap();
/// assert!(page.html.contains("A &amp; B<br>&lt;script&gt;"));
/// ```
pub fn render_page(record: &Record) -> Result<RenderedPage> {
    let id = record.require_id()?;
    if id.contains(['/', '\\']) || id == "." || id == ".." {
        return Err(RoostError::Render(format!("id '{id}' is not a valid path segment")));
    }

    let alt = AltText::from_source(&record.alt);
    let title = page_title(&alt.raw, &record.name, &record.handle);
    let ld = script_json(&structured_data(&id, &record.name, &record.handle, &alt.raw))?;

    let html = fill_template(&PageFields {
        id: &escape_html(&id),
        name: &escape_html(&record.name),
        handle: &escape_html(&record.handle),
        title: &title,
        alt: &alt,
        json_ld: &ld,
    });
    Ok(RenderedPage { id, html })
}

struct PageFields<'a> {
    id: &'a str,
    name: &'a str,
    handle: &'a str,
    title: &'a str,
    alt: &'a AltText,
    json_ld: &'a str,
}

fn fill_template(f: &PageFields<'_>) -> String {
    format!(
        r##"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width,initial-scale=1">
    <meta name="description" content="{summary}">
    <meta property="og:title" content="{title}">
    <meta property="og:image:alt" content="{full}">
    <meta property="og:description" content="{full}">
    <meta property="og:image" content="/img/{id}.webp">
    <link rel="icon" type="image/png" href="/favicon.png">
    <meta name="google" content="notranslate">
    <title>{title}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet">
    <link href="/styles.css" rel="stylesheet">
    <script type="application/ld+json">
    {json_ld}
    </script>
  </head>
  <body>
    <main class="container py-3" role="main">
      <div id="tweet-container">
        <div class="row tweet-row">
          <div class="col-12 col-md-6 img-col">
            <img src="/img/{id}.webp" class="img-fluid rounded" alt="{full}">
          </div>
          <div class="col-12 col-md-6">
            <h4><span class="name-text">{name}</span> <span class="handle-text fs-6 d-block d-md-inline">@{handle}</span></h4>
            <p>{with_br}</p>
            <a href="/" onclick="if(history.length > 1){{ event.preventDefault(); history.back(); }}" class="btn btn-sm btn-link">Back</a>
            <button id="random-btn" class="btn btn-sm btn-outline-secondary ms-2">Random</button>
          </div>
        </div>
      </div>
    </main>

    <script>
      fetch('/data.min.json').then(r => r.json()).then(data => {{
        document.getElementById('random-btn').addEventListener('click', () => {{
          let idx = Math.floor(Math.random() * data.length);
          window.location.href = `/tweet/${{data[idx].id}}/`;
        }});
      }});

      document.addEventListener('keydown', (e) => {{
        if (e.key === 'Escape') window.location.href = '/';
      }});
    </script>
  </body>
</html>
"##,
        id = f.id,
        name = f.name,
        handle = f.handle,
        title = f.title,
        summary = f.alt.summary,
        full = f.alt.full,
        with_br = f.alt.with_br,
        json_ld = f.json_ld,
    )
}
