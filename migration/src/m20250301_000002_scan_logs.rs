//! scan_logs 表迁移
//!
//! 每次成功解析的扫码请求写入一行，只追加不更新

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScanLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScanLogs::LinkId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ScanLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScanLogs::Ip).string_len(45).null())
                    .col(ColumnDef::new(ScanLogs::UserAgent).text().null())
                    .col(ColumnDef::new(ScanLogs::Country).string_len(64).null())
                    .col(ColumnDef::new(ScanLogs::Region).string_len(128).null())
                    .col(ColumnDef::new(ScanLogs::City).string_len(128).null())
                    .col(ColumnDef::new(ScanLogs::Language).string_len(64).null())
                    .col(ColumnDef::new(ScanLogs::UtmSource).string_len(255).null())
                    .col(ColumnDef::new(ScanLogs::UtmMedium).string_len(255).null())
                    .col(ColumnDef::new(ScanLogs::UtmCampaign).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        // 单链接查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scan_logs_link_id")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::LinkId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scan_logs_created_at")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 统计读取按 (link_id, created_at) 升序扫描
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scan_logs_link_time")
                    .table(ScanLogs::Table)
                    .col(ScanLogs::LinkId)
                    .col(ScanLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_scan_logs_link_time").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_scan_logs_link_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_scan_logs_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ScanLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScanLogs {
    #[sea_orm(iden = "scan_logs")]
    Table,
    Id,
    LinkId,
    CreatedAt,
    Ip,
    UserAgent,
    Country,
    Region,
    City,
    Language,
    UtmSource,
    UtmMedium,
    UtmCampaign,
}
