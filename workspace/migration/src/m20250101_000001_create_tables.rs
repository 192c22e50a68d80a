use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Monetary columns: DECIMAL(15, 2), zero by default.
fn money<T: IntoIden>(col: T) -> ColumnDef {
    decimal(col).decimal_len(15, 2).default(0).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string(Users::PasswordHash))
                    .to_owned(),
            )
            .await?;

        // Create persons table
        manager
            .create_table(
                Table::create()
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(pk_auto(Persons::Id))
                    .col(string(Persons::Name))
                    .col(string_null(Persons::Note))
                    .col(integer(Persons::UserId))
                    .col(money(Persons::PensionHistory))
                    .col(money(Persons::MedicalHistory))
                    .col(money(Persons::HousingFundHistory))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_person_user")
                            .from(Persons::Table, Persons::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create salary_records table
        manager
            .create_table(
                Table::create()
                    .table(SalaryRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(SalaryRecords::Id))
                    .col(integer(SalaryRecords::PersonId))
                    .col(integer(SalaryRecords::Year))
                    .col(integer(SalaryRecords::Month))
                    .col(money(SalaryRecords::BaseSalary))
                    .col(money(SalaryRecords::PerformanceSalary))
                    .col(money(SalaryRecords::HighTempAllowance))
                    .col(money(SalaryRecords::LowTempAllowance))
                    .col(money(SalaryRecords::ComputerAllowance))
                    .col(money(SalaryRecords::MealAllowance))
                    .col(money(SalaryRecords::MidAutumnBenefit))
                    .col(money(SalaryRecords::DragonBoatBenefit))
                    .col(money(SalaryRecords::SpringFestivalBenefit))
                    .col(money(SalaryRecords::OtherIncome))
                    .col(money(SalaryRecords::PensionInsurance))
                    .col(money(SalaryRecords::MedicalInsurance))
                    .col(money(SalaryRecords::UnemploymentInsurance))
                    .col(money(SalaryRecords::CriticalIllnessInsurance))
                    .col(money(SalaryRecords::EnterpriseAnnuity))
                    .col(money(SalaryRecords::HousingFund))
                    .col(money(SalaryRecords::OtherDeductions))
                    .col(money(SalaryRecords::Tax))
                    .col(string_null(SalaryRecords::Note))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_salary_record_person")
                            .from(SalaryRecords::Table, SalaryRecords::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_salary_records_person_year_month")
                    .table(SalaryRecords::Table)
                    .col(SalaryRecords::PersonId)
                    .col(SalaryRecords::Year)
                    .col(SalaryRecords::Month)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Create salary_templates table
        manager
            .create_table(
                Table::create()
                    .table(SalaryTemplates::Table)
                    .if_not_exists()
                    .col(pk_auto(SalaryTemplates::Id))
                    .col(integer(SalaryTemplates::UserId))
                    .col(string(SalaryTemplates::Name))
                    .col(string_null(SalaryTemplates::Description))
                    .col(json_null(SalaryTemplates::AllowancesTemplate))
                    .col(json_null(SalaryTemplates::BonusesTemplate))
                    .col(json_null(SalaryTemplates::DeductionsTemplate))
                    .col(boolean(SalaryTemplates::IsDefault).default(false))
                    .col(boolean(SalaryTemplates::IsActive).default(true))
                    .col(timestamp_with_time_zone(SalaryTemplates::CreatedAt))
                    .col(timestamp_with_time_zone(SalaryTemplates::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_salary_template_user")
                            .from(SalaryTemplates::Table, SalaryTemplates::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(SalaryTemplates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SalaryRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
    Name,
    Note,
    UserId,
    PensionHistory,
    MedicalHistory,
    HousingFundHistory,
}

#[derive(DeriveIden)]
enum SalaryRecords {
    Table,
    Id,
    PersonId,
    Year,
    Month,
    BaseSalary,
    PerformanceSalary,
    HighTempAllowance,
    LowTempAllowance,
    ComputerAllowance,
    MealAllowance,
    MidAutumnBenefit,
    DragonBoatBenefit,
    SpringFestivalBenefit,
    OtherIncome,
    PensionInsurance,
    MedicalInsurance,
    UnemploymentInsurance,
    CriticalIllnessInsurance,
    EnterpriseAnnuity,
    HousingFund,
    OtherDeductions,
    Tax,
    Note,
}

#[derive(DeriveIden)]
enum SalaryTemplates {
    Table,
    Id,
    UserId,
    Name,
    Description,
    AllowancesTemplate,
    BonusesTemplate,
    DeductionsTemplate,
    IsDefault,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
