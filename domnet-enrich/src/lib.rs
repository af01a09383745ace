pub mod error;
pub mod similarity;
pub mod urlscan;

pub use error::EnrichError;
pub use similarity::{SimilarityAnalysis, SimilarityFlags, analyze_domain_similarity};
pub use urlscan::UrlscanClient;
