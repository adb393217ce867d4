use sea_orm_migration::prelude::*;

/// (index name, table, columns, unique)
const INDEXES: &[(&str, Tbl, &[Col], bool)] = &[
    ("idx_company_user", Tbl::Company, &[Col::UserId], false),
    ("idx_booking_user", Tbl::Booking, &[Col::UserId], false),
    ("idx_company_service_company", Tbl::CompanyService, &[Col::CompanyId], false),
    ("idx_company_service_service", Tbl::CompanyService, &[Col::ServiceId], false),
    ("uniq_company_service_pair", Tbl::CompanyService, &[Col::CompanyId, Col::ServiceId], true),
    ("idx_booking_service_booking", Tbl::BookingService, &[Col::BookingId], false),
    ("idx_booking_service_company_service", Tbl::BookingService, &[Col::CompanyServiceId], false),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, cols, unique) in INDEXES {
            let mut idx = Index::create();
            idx.name(*name).table(*table).if_not_exists();
            for col in cols.iter() {
                idx.col(*col);
            }
            if *unique {
                idx.unique();
            }
            manager.create_index(idx.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).table(*table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Tbl {
    #[sea_orm(iden = "company")]
    Company,
    #[sea_orm(iden = "booking")]
    Booking,
    #[sea_orm(iden = "company_service")]
    CompanyService,
    #[sea_orm(iden = "booking_service")]
    BookingService,
}

#[derive(DeriveIden, Clone, Copy)]
enum Col { UserId, CompanyId, ServiceId, BookingId, CompanyServiceId }
