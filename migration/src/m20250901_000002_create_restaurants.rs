use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
    Name,
    Description,
    CuisineType,
    Address,
    Phone,
    ImageUrl,
    DeliveryTime,
    DeliveryFee,
    MinimumOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::Name)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Restaurants::Description).text().null())
                    .col(
                        ColumnDef::new(Restaurants::CuisineType)
                            .string_len(50)
                            .null(),
                    )
                    .col(ColumnDef::new(Restaurants::Address).text().not_null())
                    .col(ColumnDef::new(Restaurants::Phone).string_len(20).null())
                    .col(
                        ColumnDef::new(Restaurants::ImageUrl)
                            .string_len(500)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::DeliveryTime)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::DeliveryFee)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::MinimumOrder)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Restaurants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_cuisine_type")
                    .table(Restaurants::Table)
                    .col(Restaurants::CuisineType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Restaurants::Table)
                    .to_owned(),
            )
            .await
    }
}
