//! Tweet archive data model and the passes that run directly over it.
//!
//! Everything here works on the raw dataset (a JSON array of tweet-like
//! records): loading and saving it, pulling leading dates out of the `alt`
//! text, and locating tweet IDs in loosely shaped JSON for the sitemap.
pub mod twitter;
