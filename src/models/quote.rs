use serde::{Deserialize, Serialize};

/// A cached quote row as the rest of the application sees it.
///
/// `id` is assigned by the store on insertion and stays stable until
/// the next full cache replacement. `is_favorite` is the only field
/// ever mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: i32,
    pub quote_text: String,
    pub character_name: String,
    pub image_url: String,
    pub character_page_url: String,
    pub is_favorite: bool,
}

/// Input for a cache insertion, before the store assigns an `id`.
///
/// Freshly fetched quotes always enter the cache unfavorited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
    pub quote_text: String,
    pub character_name: String,
    pub image_url: String,
    pub character_page_url: String,
}
