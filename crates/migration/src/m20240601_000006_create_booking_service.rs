use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingService::Table)
                    .if_not_exists()
                    .col(uuid(BookingService::Id).primary_key())
                    .col(uuid(BookingService::BookingId).not_null())
                    .col(uuid(BookingService::CompanyServiceId).not_null())
                    .col(text_null(BookingService::Notes))
                    .col(
                        integer(BookingService::Quantity)
                            .not_null()
                            .default(1)
                            .check(Expr::col(BookingService::Quantity).gte(1)),
                    )
                    .col(timestamp_with_time_zone(BookingService::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BookingService::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service_booking")
                            .from(BookingService::Table, BookingService::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // offerings referenced by a booking cannot disappear underneath it
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service_company_service")
                            .from(BookingService::Table, BookingService::CompanyServiceId)
                            .to(CompanyService::Table, CompanyService::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BookingService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BookingService { Table, Id, BookingId, CompanyServiceId, Notes, Quantity, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }

#[derive(DeriveIden)]
enum CompanyService { Table, Id }
