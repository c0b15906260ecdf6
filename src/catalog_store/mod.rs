mod memory_store;
mod schema;
mod store;
mod trait_def;

pub use memory_store::InMemoryCatalogStore;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::{ImportSummary, SqliteCatalogStore};
#[cfg(any(test, feature = "mock"))]
pub use trait_def::MockArtistRepository;
pub use trait_def::{ArtistRepository, CatalogCounts, CatalogStore, GenreRepository};
