use anyhow::{Context, Result};
use roost_config::SitePaths;
use roost_site::archive::{archive_records, write_archive};
use roost_site::sitemap::write_sitemap;
use roost_site::{BakeOptions, IdFilter, bake_pages, build_sitemap, render_archive};
use roost_social::twitter::dataset::{load_json_candidates, load_records};
use roost_social::twitter::{CleanOptions, clean_file, extract_ids};
use std::path::PathBuf;
use tracing::info;

pub fn clean(
    paths: &SitePaths,
    input: Option<PathBuf>,
    backup: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let opts = CleanOptions {
        input: input.unwrap_or_else(|| paths.data.clone()),
        backup,
        output,
    };
    let report =
        clean_file(&opts).with_context(|| format!("cleaning {}", opts.input.display()))?;
    println!(
        "Processed {} items, updated {} records. Backup: {}",
        report.processed,
        report.updated,
        opts.backup_path().display()
    );
    Ok(())
}

pub fn bake(
    paths: &SitePaths,
    input: Option<PathBuf>,
    ids: Option<IdFilter>,
    limit: Option<usize>,
    log: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| paths.data.clone());
    let records =
        load_records(&input).with_context(|| format!("loading {}", input.display()))?;
    let opts = BakeOptions {
        out_dir: out_dir.unwrap_or_else(|| paths.tweet_dir.clone()),
        log_path: log.unwrap_or_else(|| paths.bake_log.clone()),
        ids: ids.unwrap_or(IdFilter::All),
        limit,
    };
    let summary = bake_pages(&records, &opts).context("baking pages")?;
    println!(
        "Bake complete. Created {} pages ({} failed). Log: {}",
        summary.created,
        summary.failed,
        opts.log_path.display()
    );
    Ok(())
}

pub fn archive(paths: &SitePaths, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| paths.data.clone());
    let output = output.unwrap_or_else(|| paths.archive.clone());
    let raw = load_records(&input).with_context(|| format!("loading {}", input.display()))?;
    let records = archive_records(&raw);
    let page = render_archive(&records);
    write_archive(&output, &page.html)?;
    info!(path = %output.display(), entries = page.entries, "archive written");
    println!("Wrote archive with {} entries to {}", page.entries, output.display());
    Ok(())
}

pub fn sitemap(
    paths: &SitePaths,
    base_url: &str,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| paths.data.clone());
    let output = output.unwrap_or_else(|| paths.sitemap.clone());
    let data = load_json_candidates(&input)
        .with_context(|| format!("loading {}", input.display()))?;
    let ids = extract_ids(&data);
    let map = build_sitemap(base_url, &ids)?;
    write_sitemap(&output, &map)?;
    println!("Wrote sitemap with {} urls to {}", map.url_count, output.display());
    Ok(())
}
