use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Personajes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Personajes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Personajes::Frase).text().not_null())
                    .col(ColumnDef::new(Personajes::Personaje).string().not_null())
                    .col(ColumnDef::new(Personajes::Imagen).string().not_null())
                    .col(
                        ColumnDef::new(Personajes::DireccionPersonaje)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Personajes::EsFavorito)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Personajes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Personajes {
    Table,
    Id,
    Frase,
    Personaje,
    Imagen,
    #[sea_orm(iden = "direccionPersonaje")]
    DireccionPersonaje,
    #[sea_orm(iden = "esFavorito")]
    EsFavorito,
}
