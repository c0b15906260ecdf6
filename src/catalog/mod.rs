mod entry;
mod error;
pub mod identity;
mod index;
mod load;
mod models;
pub mod pricing;

pub use entry::{CatalogEntry, CatalogEntryDetail, CatalogEntrySummary};
pub use error::{CatalogError, CatalogResult, NotFound};
pub use identity::{decode, encode, AlbumId, ArtistId};
pub use index::CatalogIndex;
pub use load::{load_seed, load_seed_file, parse_seed, Seed, SeedProblem};
pub use models::{AlbumRecord, Artist, Genre, Track};
pub use pricing::{Price, Pricing, PricingConfig, PricingEngine, MAX_PRICE, MIN_PRICE};
