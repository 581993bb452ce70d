//! URL handling module for Crawly
//!
//! Seed validation on the way in, and link resolution/classification for
//! every anchor found on a fetched page. No normalization is performed beyond
//! making links absolute: trailing slashes, query variants and fragments all
//! produce distinct URLs.

mod filter;
mod seed;

pub use filter::{is_crawlable_scheme, is_static_asset, resolve_link, STATIC_ASSET_EXTENSIONS};
pub use seed::{is_url_shaped, parse_seed};
