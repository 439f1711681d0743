use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    NameNorm,
    Kind,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum Responsibles {
    Table,
    Id,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum Goals {
    Table,
    Id,
    Description,
    Kind,
    TargetMinor,
    Month,
    Year,
    CategoryId,
    ResponsibleId,
    Active,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    OccurredOn,
    Kind,
    CategoryId,
    AccountId,
    ResponsibleId,
    Description,
    AmountMinor,
    Recurring,
    RecurrenceEnd,
    Installments,
    InstallmentsRemaining,
    GoalId,
    CreatedAt,
}

#[derive(Iden)]
enum FixedExpenses {
    Table,
    Id,
    Description,
    AmountMinor,
    DueDay,
    AccountId,
    ResponsibleId,
    CategoryId,
    RecurrenceEnd,
    PaymentMethod,
}

#[derive(Iden)]
enum FixedExpensePayments {
    Table,
    Id,
    FixedExpenseId,
    Year,
    Month,
    Paid,
    PaidOn,
}

#[derive(Iden)]
enum Parameters {
    Table,
    Key,
    Value,
}

/// Reference tables share the same `(id, name, name_norm)` shape.
fn named_table<T>(table: T, id: T, name: T, name_norm: T) -> TableCreateStatement
where
    T: Iden + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(id).blob().not_null().primary_key())
        .col(ColumnDef::new(name).string().not_null())
        .col(ColumnDef::new(name_norm).string().not_null())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-kind-name_norm")
                    .table(Categories::Table)
                    .col(Categories::Kind)
                    .col(Categories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(named_table(
                Accounts::Table,
                Accounts::Id,
                Accounts::Name,
                Accounts::NameNorm,
            ))
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-name_norm")
                    .table(Accounts::Table)
                    .col(Accounts::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(named_table(
                Responsibles::Table,
                Responsibles::Id,
                Responsibles::Name,
                Responsibles::NameNorm,
            ))
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx-responsibles-name_norm")
                    .table(Responsibles::Table)
                    .col(Responsibles::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goals::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Goals::Description).string().not_null())
                    .col(ColumnDef::new(Goals::Kind).string().not_null())
                    .col(ColumnDef::new(Goals::TargetMinor).big_integer().not_null())
                    .col(ColumnDef::new(Goals::Month).integer().not_null())
                    .col(ColumnDef::new(Goals::Year).integer().not_null())
                    .col(ColumnDef::new(Goals::CategoryId).blob())
                    .col(ColumnDef::new(Goals::ResponsibleId).blob())
                    .col(
                        ColumnDef::new(Goals::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-category_id")
                            .from(Goals::Table, Goals::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-responsible_id")
                            .from(Goals::Table, Goals::ResponsibleId)
                            .to(Responsibles::Table, Responsibles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).blob())
                    .col(ColumnDef::new(Transactions::AccountId).blob())
                    .col(ColumnDef::new(Transactions::ResponsibleId).blob())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Recurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Transactions::RecurrenceEnd).date())
                    .col(
                        ColumnDef::new(Transactions::Installments)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Transactions::InstallmentsRemaining).integer())
                    .col(ColumnDef::new(Transactions::GoalId).blob())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-responsible_id")
                            .from(Transactions::Table, Transactions::ResponsibleId)
                            .to(Responsibles::Table, Responsibles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-goal_id")
                            .from(Transactions::Table, Transactions::GoalId)
                            .to(Goals::Table, Goals::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-occurred_on")
                    .table(Transactions::Table)
                    .col(Transactions::OccurredOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FixedExpenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FixedExpenses::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FixedExpenses::Description)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FixedExpenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FixedExpenses::DueDay).integer().not_null())
                    .col(ColumnDef::new(FixedExpenses::AccountId).blob())
                    .col(ColumnDef::new(FixedExpenses::ResponsibleId).blob())
                    .col(ColumnDef::new(FixedExpenses::CategoryId).blob())
                    .col(ColumnDef::new(FixedExpenses::RecurrenceEnd).date())
                    .col(
                        ColumnDef::new(FixedExpenses::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fixed_expenses-account_id")
                            .from(FixedExpenses::Table, FixedExpenses::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fixed_expenses-responsible_id")
                            .from(FixedExpenses::Table, FixedExpenses::ResponsibleId)
                            .to(Responsibles::Table, Responsibles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fixed_expenses-category_id")
                            .from(FixedExpenses::Table, FixedExpenses::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FixedExpensePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FixedExpensePayments::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FixedExpensePayments::FixedExpenseId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FixedExpensePayments::Year).integer().not_null())
                    .col(ColumnDef::new(FixedExpensePayments::Month).integer().not_null())
                    .col(ColumnDef::new(FixedExpensePayments::Paid).boolean().not_null())
                    .col(ColumnDef::new(FixedExpensePayments::PaidOn).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fixed_expense_payments-fixed_expense_id")
                            .from(
                                FixedExpensePayments::Table,
                                FixedExpensePayments::FixedExpenseId,
                            )
                            .to(FixedExpenses::Table, FixedExpenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fixed_expense_payments-expense-month")
                    .table(FixedExpensePayments::Table)
                    .col(FixedExpensePayments::FixedExpenseId)
                    .col(FixedExpensePayments::Year)
                    .col(FixedExpensePayments::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Parameters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parameters::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Parameters::Value).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parameters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FixedExpensePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FixedExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Responsibles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}
