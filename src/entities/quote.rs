use sea_orm::entity::prelude::*;

/// Cached quote rows. Column names keep the on-disk schema the
/// original data files shipped with (`personajes`), so an existing
/// database keeps working.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personajes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "frase")]
    pub quote_text: String,
    #[sea_orm(column_name = "personaje")]
    pub character_name: String,
    #[sea_orm(column_name = "imagen")]
    pub image_url: String,
    #[sea_orm(column_name = "direccionPersonaje")]
    pub character_page_url: String,
    #[sea_orm(column_name = "esFavorito")]
    pub is_favorite: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
