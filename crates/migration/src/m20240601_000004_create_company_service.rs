//! Create `company_service`, the offering of a service by a company.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyService::Table)
                    .if_not_exists()
                    .col(uuid(CompanyService::Id).primary_key())
                    .col(uuid(CompanyService::CompanyId).not_null())
                    .col(uuid(CompanyService::ServiceId).not_null())
                    .col(double_null(CompanyService::Price))
                    .col(timestamp_with_time_zone(CompanyService::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CompanyService::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_service_company")
                            .from(CompanyService::Table, CompanyService::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_service_service")
                            .from(CompanyService::Table, CompanyService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CompanyService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CompanyService { Table, Id, CompanyId, ServiceId, Price, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Company { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
