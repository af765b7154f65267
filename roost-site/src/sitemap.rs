//! `sitemap.xml` for the home page and every tweet page.
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use roost_common::{Result, RoostError};
use roost_social::twitter::IdSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A rendered sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sitemap {
    pub xml: String,
    pub url_count: usize,
}

/// Check that `raw` is an absolute URL and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| RoostError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(invalid("expected an absolute http(s) URL with a host".into()));
    }
    Ok(trimmed.to_string())
}

/// Root first, then one tweet URL per id in ascending order.
pub fn sitemap_urls(base: &str, ids: &IdSet) -> Vec<String> {
    std::iter::once(format!("{base}/"))
        .chain(ids.iter().map(|id| format!("{base}/tweet/{id}")))
        .collect()
}

fn emit<'a, W: Write>(w: &mut Writer<W>, event: Event<'a>) -> Result<()> {
    w.write_event(event)
        .map_err(|e| RoostError::Xml(e.to_string()))
}

/// Build the sitemap for `ids` under `base_url`.
///
/// ```
/// use roost_site::sitemap::build_sitemap;
/// use roost_social::twitter::IdSet;
///
/// let ids: IdSet = ["2", "1"].iter().map(|s| s.to_string()).collect();
/// let map = build_sitemap("https://x.test/", &ids).unwrap();
/// assert_eq!(map.url_count, 3);
/// assert!(map.xml.contains("<loc>https://x.test/tweet/1</loc>"));
/// ```
pub fn build_sitemap(base_url: &str, ids: &IdSet) -> Result<Sitemap> {
    let base = normalize_base_url(base_url)?;
    if ids.is_empty() {
        warn!("no tweet ids found; sitemap will only list the home page");
    }
    let urls = sitemap_urls(&base, ids);

    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(
        &mut w,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)])),
    )?;
    for loc in &urls {
        emit(&mut w, Event::Start(BytesStart::new("url")))?;
        emit(&mut w, Event::Start(BytesStart::new("loc")))?;
        emit(&mut w, Event::Text(BytesText::new(loc)))?;
        emit(&mut w, Event::End(BytesEnd::new("loc")))?;
        emit(&mut w, Event::End(BytesEnd::new("url")))?;
    }
    emit(&mut w, Event::End(BytesEnd::new("urlset")))?;

    let mut bytes = w.into_inner();
    bytes.push(b'\n');
    let xml = String::from_utf8(bytes).map_err(|e| RoostError::Xml(e.to_string()))?;
    Ok(Sitemap {
        xml,
        url_count: urls.len(),
    })
}

pub fn write_sitemap(path: &Path, sitemap: &Sitemap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RoostError::io(parent, e))?;
    }
    fs::write(path, &sitemap.xml).map_err(|e| RoostError::io(path, e))?;
    info!(path = %path.display(), urls = sitemap.url_count, "sitemap written");
    Ok(())
}
