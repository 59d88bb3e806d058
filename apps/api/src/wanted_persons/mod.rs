// Wanted persons dataset: extraction, normalization, dedup, persistence, filtering.

pub mod dedup;
pub mod extract;
pub mod filter;
pub mod firecrawl;
pub mod handlers;
pub mod normalize;
pub mod scraper;
pub mod store;
