//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication plus optional outbound mail configuration
//! - `spaces`: bookable resources owned by users
//! - `bookings`: slot claims with their financial record
//! - `expenses`: standalone expense records for reporting

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    VenueName,
    MailAddress,
    MailPasswordEnc,
}

#[derive(Iden)]
enum Spaces {
    Table,
    Id,
    UserId,
    Name,
    PricePerHour,
    CustomRates,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    UserId,
    SpaceId,
    Date,
    Slots,
    CustomerName,
    CustomerMobile,
    CustomerEmail,
    TotalAmount,
    Discount,
    PaidAmount,
    PaymentMode,
    Status,
    RefundAmount,
    GroupId,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    Title,
    Amount,
    Category,
    Date,
    PaymentMode,
    Note,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::VenueName).string())
                    .col(ColumnDef::new(Users::MailAddress).string())
                    .col(ColumnDef::new(Users::MailPasswordEnc).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Spaces::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Spaces::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Spaces::UserId).string().not_null())
                    .col(ColumnDef::new(Spaces::Name).string().not_null())
                    .col(ColumnDef::new(Spaces::PricePerHour).double().not_null())
                    .col(
                        ColumnDef::new(Spaces::CustomRates)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-spaces-user_id")
                            .from(Spaces::Table, Spaces::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // No foreign key to spaces: a space can be deleted while its
        // bookings remain (dangling references are tolerated).
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).string().not_null())
                    .col(ColumnDef::new(Bookings::SpaceId).string().not_null())
                    .col(ColumnDef::new(Bookings::Date).string().not_null())
                    .col(ColumnDef::new(Bookings::Slots).text().not_null())
                    .col(ColumnDef::new(Bookings::CustomerName).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerMobile).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerEmail).string())
                    .col(ColumnDef::new(Bookings::TotalAmount).double().not_null())
                    .col(
                        ColumnDef::new(Bookings::Discount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaidAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentMode)
                            .string()
                            .not_null()
                            .default("Cash"),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("Booked"),
                    )
                    .col(
                        ColumnDef::new(Bookings::RefundAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Bookings::GroupId).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Conflict checks scan by space and date.
        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-space_id-date")
                    .table(Bookings::Table)
                    .col(Bookings::SpaceId)
                    .col(Bookings::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-user_id-date")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .col(ColumnDef::new(Expenses::Title).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).double().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Date).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::PaymentMode)
                            .string()
                            .not_null()
                            .default("Cash"),
                    )
                    .col(ColumnDef::new(Expenses::Note).string())
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-user_id")
                            .from(Expenses::Table, Expenses::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-user_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Spaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
