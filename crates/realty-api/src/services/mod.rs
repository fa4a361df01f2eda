pub mod listing_ingestion;
pub mod listing_reads;
pub mod media_ingestion;

pub use listing_ingestion::{validate_request, ListingDraft, ListingIngestionService, SlugFn};
pub use listing_reads::{parse_page, ListingReadService};
pub use media_ingestion::MediaIngestionService;
