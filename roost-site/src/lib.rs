//! Static site output for the tweet archive.
//!
//! Rendering is kept pure: [`page::render_page`], [`archive::render_archive`]
//! and [`sitemap::build_sitemap`] turn records into strings, and the small
//! `write_*` helpers (plus [`bake::bake_pages`]) put those strings on disk.
pub mod archive;
pub mod bake;
pub mod escape;
pub mod page;
pub mod sitemap;

pub use archive::{ArchivePage, render_archive};
pub use bake::{BakeOptions, BakeSummary, IdFilter, bake_pages};
pub use page::{RenderedPage, render_page};
pub use sitemap::{Sitemap, build_sitemap};
