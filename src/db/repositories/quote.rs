use crate::entities::{prelude::*, quote};
use crate::models::quote::{NewQuote, QuoteRecord};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

pub struct QuoteRepository {
    conn: DatabaseConnection,
}

impl QuoteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_record(model: quote::Model) -> QuoteRecord {
        QuoteRecord {
            id: model.id,
            quote_text: model.quote_text,
            character_name: model.character_name,
            image_url: model.image_url,
            character_page_url: model.character_page_url,
            is_favorite: model.is_favorite,
        }
    }

    pub async fn get(&self, id: i32) -> anyhow::Result<Option<QuoteRecord>> {
        let row = Quotes::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model_to_record))
    }

    pub async fn list_all(&self) -> anyhow::Result<Vec<QuoteRecord>> {
        let rows = Quotes::find()
            .order_by_asc(quote::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model_to_record).collect())
    }

    pub async fn list_favorites(&self) -> anyhow::Result<Vec<QuoteRecord>> {
        let rows = Quotes::find()
            .filter(quote::Column::IsFavorite.eq(true))
            .order_by_asc(quote::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model_to_record).collect())
    }

    /// Replaces the entire cache with a fresh batch in one transaction.
    ///
    /// Inserted rows always start unfavorited; favorite flags on the
    /// wiped rows do not survive the replacement.
    pub async fn replace_all(&self, records: &[NewQuote]) -> anyhow::Result<usize> {
        let txn = self.conn.begin().await?;

        Quotes::delete_many().exec(&txn).await?;

        if !records.is_empty() {
            let models = records.iter().map(|record| quote::ActiveModel {
                quote_text: Set(record.quote_text.clone()),
                character_name: Set(record.character_name.clone()),
                image_url: Set(record.image_url.clone()),
                character_page_url: Set(record.character_page_url.clone()),
                is_favorite: Set(false),
                ..Default::default()
            });

            Quotes::insert_many(models).exec(&txn).await?;
        }

        txn.commit().await?;

        info!("Replaced quote cache with {} records", records.len());
        Ok(records.len())
    }

    /// Single-row upsert keyed on `id`.
    pub async fn upsert(&self, record: &QuoteRecord) -> anyhow::Result<()> {
        let active_model = quote::ActiveModel {
            id: Set(record.id),
            quote_text: Set(record.quote_text.clone()),
            character_name: Set(record.character_name.clone()),
            image_url: Set(record.image_url.clone()),
            character_page_url: Set(record.character_page_url.clone()),
            is_favorite: Set(record.is_favorite),
        };

        Quotes::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(quote::Column::Id)
                    .update_columns([
                        quote::Column::QuoteText,
                        quote::Column::CharacterName,
                        quote::Column::ImageUrl,
                        quote::Column::CharacterPageUrl,
                        quote::Column::IsFavorite,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn clear(&self) -> anyhow::Result<u64> {
        let result = Quotes::delete_many().exec(&self.conn).await?;
        if result.rows_affected > 0 {
            info!("Cleared {} cached quotes", result.rows_affected);
        }
        Ok(result.rows_affected)
    }
}
