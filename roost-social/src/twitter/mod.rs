//! Twitter/X archive records and the data passes over them.
//!
//! `types` holds the typed record view used by the renderers, `dataset`
//! moves the raw JSON on and off disk, `dates` and `clean` implement the
//! one-time cleanup pass, and `ids` finds tweet IDs for the sitemap.
pub mod clean;
pub mod dataset;
pub mod dates;
pub mod ids;
pub mod types;

pub use clean::{CleanOptions, CleanReport, clean_file, clean_records};
pub use dates::{LeadingDate, extract_leading_date};
pub use ids::{IdSet, extract_ids};
pub use types::{Record, RecordId};
