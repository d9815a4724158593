use sea_orm_migration::prelude::*;

use super::m20240101_initial::Personajes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_personajes_es_favorito")
                    .table(Personajes::Table)
                    .col(Personajes::EsFavorito)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_personajes_es_favorito")
                    .table(Personajes::Table)
                    .to_owned(),
            )
            .await
    }
}
