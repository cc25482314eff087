use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(create_table_statement(manager.get_database_backend()))
            .await?;

        // 短码唯一索引：并发分配时的最终防线
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_short_urls_code")
                    .table(ShortUrl::Table)
                    .col(ShortUrl::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 清理任务按 created_at 扫描
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_urls_created_at")
                    .table(ShortUrl::Table)
                    .col(ShortUrl::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 公开列表：WHERE is_private = false ORDER BY created_at DESC
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_urls_public")
                    .table(ShortUrl::Table)
                    .col(ShortUrl::IsPrivate)
                    .col(ShortUrl::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_short_urls_public").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_short_urls_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("uq_short_urls_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ShortUrl::Table).to_owned())
            .await
    }
}

fn create_table_statement(backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(ShortUrl::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(ShortUrl::Id)
                .string_len(36)
                .not_null()
                .primary_key(),
        )
        .col(code_column(backend))
        .col(ColumnDef::new(ShortUrl::OriginalUrl).text().not_null())
        .col(
            ColumnDef::new(ShortUrl::Clicks)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(ShortUrl::IsPrivate)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(ShortUrl::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

/// 短码区分大小写。SQLite/PostgreSQL 默认按字节比较，
/// MySQL/MariaDB 的默认排序规则不区分大小写，需显式指定 utf8mb4_bin
fn code_column(backend: DatabaseBackend) -> ColumnDef {
    let mut col = ColumnDef::new(ShortUrl::Code);
    col.string_len(64).not_null();
    if backend == DatabaseBackend::MySql {
        col.extra("COLLATE utf8mb4_bin");
    }
    col
}

#[derive(DeriveIden)]
enum ShortUrl {
    #[sea_orm(iden = "short_urls")]
    Table,
    Id,
    Code,
    OriginalUrl,
    Clicks,
    IsPrivate,
    CreatedAt,
}
