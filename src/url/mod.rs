//! URL handling module for Sitemap-Scout
//!
//! String-level helpers shared by the crawler, the categorizer and the
//! analyzer: duplicate normalization, path and handle extraction, resolution
//! of sitemap references, and host extraction.

mod domain;
mod normalize;

pub use domain::{domain_slug, extract_host};
pub use normalize::{
    extract_path, join_base, last_path_segment, normalize_for_dedup, resolve_reference,
};
