use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240201_000001_create_registry_tables::Migration),
            Box::new(m20240201_000002_create_purchase_order_tables::Migration),
            Box::new(m20240201_000003_create_receiving_tables::Migration),
            Box::new(m20240201_000004_create_stock_movements_table::Migration),
            Box::new(m20240201_000005_create_inventory_count_tables::Migration),
            Box::new(m20240201_000006_create_alerts_table::Migration),
        ]
    }
}

mod m20240201_000001_create_registry_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000001_create_registry_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactName).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::DeliveryTimeDays).integer().null())
                        .col(ColumnDef::new(Suppliers::Status).string().not_null())
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Ingredients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Ingredients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Ingredients::Name).string().not_null())
                        .col(ColumnDef::new(Ingredients::Unit).string().not_null())
                        .col(ColumnDef::new(Ingredients::Category).string().null())
                        .col(
                            ColumnDef::new(Ingredients::CurrentStock)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Ingredients::MinStock)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Ingredients::MaxStock).decimal().null())
                        .col(ColumnDef::new(Ingredients::StorageCenter).string().null())
                        .col(ColumnDef::new(Ingredients::SupplierId).uuid().null())
                        .col(ColumnDef::new(Ingredients::Status).string().not_null())
                        .col(
                            ColumnDef::new(Ingredients::LastStockUpdate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Ingredients::LastOrderDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Ingredients::LastOrderSupplier).uuid().null())
                        .col(
                            ColumnDef::new(Ingredients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Ingredients::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StorageCenters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StorageCenters::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageCenters::Value)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StorageCenters::Label).string().not_null())
                        .col(
                            ColumnDef::new(StorageCenters::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(StorageCenters::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StorageCenters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StorageCenters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Ingredients::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        Name,
        ContactName,
        Phone,
        Email,
        DeliveryTimeDays,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Ingredients {
        Table,
        Id,
        Name,
        Unit,
        Category,
        CurrentStock,
        MinStock,
        MaxStock,
        StorageCenter,
        SupplierId,
        Status,
        LastStockUpdate,
        LastOrderDate,
        LastOrderSupplier,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum StorageCenters {
        Table,
        Id,
        Value,
        Label,
        SortOrder,
        Active,
        CreatedAt,
    }
}

mod m20240201_000002_create_purchase_order_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000002_create_purchase_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ExpectedDelivery)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalValue)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PurchaseOrders::ReceivingId).uuid().null())
                        .col(ColumnDef::new(PurchaseOrders::Notes).string().null())
                        .col(ColumnDef::new(PurchaseOrders::CancelReason).string().null())
                        .col(ColumnDef::new(PurchaseOrders::CreatedBy).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_order_number")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::OrderNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::PurchaseId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::IngredientId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::IngredientName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrderLines::Unit).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrderLines::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderLines::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_order_lines_purchase_id")
                        .table(PurchaseOrderLines::Table)
                        .col(PurchaseOrderLines::PurchaseId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrderLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
        OrderNumber,
        SupplierId,
        SupplierName,
        OrderDate,
        ExpectedDelivery,
        Status,
        TotalValue,
        ReceivingId,
        Notes,
        CancelReason,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrderLines {
        Table,
        Id,
        PurchaseId,
        IngredientId,
        IngredientName,
        Quantity,
        Unit,
        UnitPrice,
        TotalPrice,
    }
}

mod m20240201_000003_create_receiving_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000003_create_receiving_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ReceivingRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReceivingRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReceivingRecords::PurchaseId).uuid().not_null())
                        .col(ColumnDef::new(ReceivingRecords::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(ReceivingRecords::SupplierName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::ReceivingDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReceivingRecords::InvoiceNumber).string().null())
                        .col(
                            ColumnDef::new(ReceivingRecords::InvoicePhotoUrl)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::InvoicePhotoUploadedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(ReceivingRecords::Status).string().not_null())
                        .col(
                            ColumnDef::new(ReceivingRecords::OrderedTotalValue)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::ReceivedTotalValue)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::AdjustmentValue)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ReceivingRecords::GeneralNotes).string().null())
                        .col(ColumnDef::new(ReceivingRecords::CancelReason).string().null())
                        .col(
                            ColumnDef::new(ReceivingRecords::CreatedBy)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ReceivingRecords::CompletedBy).string().null())
                        .col(
                            ColumnDef::new(ReceivingRecords::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::Version)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ReceivingChecklistItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::ReceivingId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::LineIndex)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::IngredientId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::IngredientName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::OrderedQty)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::Unit)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::IsChecked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::IsReceived)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::ReceivedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::MissingReason)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(ReceivingChecklistItems::Notes).string().null())
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::BatchNumber)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::ExpiryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::StorageCenter)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::CheckedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ReceivingChecklistItems::CheckedBy)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_receiving_checklist_items_receiving_line")
                        .table(ReceivingChecklistItems::Table)
                        .col(ReceivingChecklistItems::ReceivingId)
                        .col(ReceivingChecklistItems::LineIndex)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(ReceivingChecklistItems::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(ReceivingRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ReceivingRecords {
        Table,
        Id,
        PurchaseId,
        SupplierId,
        SupplierName,
        ReceivingDate,
        InvoiceNumber,
        InvoicePhotoUrl,
        InvoicePhotoUploadedAt,
        Status,
        OrderedTotalValue,
        ReceivedTotalValue,
        AdjustmentValue,
        GeneralNotes,
        CancelReason,
        CreatedBy,
        CompletedBy,
        CompletedAt,
        Version,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ReceivingChecklistItems {
        Table,
        Id,
        ReceivingId,
        LineIndex,
        IngredientId,
        IngredientName,
        OrderedQty,
        Unit,
        UnitPrice,
        IsChecked,
        IsReceived,
        ReceivedQty,
        MissingReason,
        Notes,
        BatchNumber,
        ExpiryDate,
        StorageCenter,
        CheckedAt,
        CheckedBy,
    }
}

mod m20240201_000004_create_stock_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000004_create_stock_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::IngredientId).uuid().not_null())
                        .col(
                            ColumnDef::new(StockMovements::IngredientName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::MovementType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Quantity).decimal().not_null())
                        .col(ColumnDef::new(StockMovements::Unit).string().not_null())
                        .col(
                            ColumnDef::new(StockMovements::PreviousStock)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::NewStock).decimal().not_null())
                        .col(ColumnDef::new(StockMovements::ReferenceType).string().null())
                        .col(ColumnDef::new(StockMovements::ReferenceId).uuid().null())
                        .col(ColumnDef::new(StockMovements::StorageCenter).string().null())
                        .col(ColumnDef::new(StockMovements::Notes).string().null())
                        .col(ColumnDef::new(StockMovements::CreatedBy).string().not_null())
                        .col(
                            ColumnDef::new(StockMovements::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_movements_ingredient_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::IngredientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockMovements {
        Table,
        Id,
        IngredientId,
        IngredientName,
        MovementType,
        Quantity,
        Unit,
        PreviousStock,
        NewStock,
        ReferenceType,
        ReferenceId,
        StorageCenter,
        Notes,
        CreatedBy,
        CreatedAt,
    }
}

mod m20240201_000005_create_inventory_count_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000005_create_inventory_count_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryCounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryCounts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCounts::CountDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryCounts::CountType).string().not_null())
                        .col(
                            ColumnDef::new(InventoryCounts::StorageCenter)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryCounts::Status).string().not_null())
                        .col(
                            ColumnDef::new(InventoryCounts::TotalDifferences)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(InventoryCounts::CountedBy).string().not_null())
                        .col(ColumnDef::new(InventoryCounts::ApprovedBy).string().null())
                        .col(ColumnDef::new(InventoryCounts::CancelReason).string().null())
                        .col(ColumnDef::new(InventoryCounts::Notes).string().null())
                        .col(
                            ColumnDef::new(InventoryCounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCounts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryCountItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryCountItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryCountItems::CountId).uuid().not_null())
                        .col(
                            ColumnDef::new(InventoryCountItems::IngredientId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCountItems::IngredientName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCountItems::SystemQty)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCountItems::CountedQty)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCountItems::Difference)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryCountItems::Unit).string().not_null())
                        .col(ColumnDef::new(InventoryCountItems::Notes).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_count_items_count_id")
                        .table(InventoryCountItems::Table)
                        .col(InventoryCountItems::CountId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryCountItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryCounts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryCounts {
        Table,
        Id,
        CountDate,
        CountType,
        StorageCenter,
        Status,
        TotalDifferences,
        CountedBy,
        ApprovedBy,
        CancelReason,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum InventoryCountItems {
        Table,
        Id,
        CountId,
        IngredientId,
        IngredientName,
        SystemQty,
        CountedQty,
        Difference,
        Unit,
        Notes,
    }
}

mod m20240201_000006_create_alerts_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000006_create_alerts_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Alerts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Alerts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Alerts::AlertType).string().not_null())
                        .col(ColumnDef::new(Alerts::Priority).string().not_null())
                        .col(ColumnDef::new(Alerts::Status).string().not_null())
                        .col(ColumnDef::new(Alerts::Title).string().not_null())
                        .col(ColumnDef::new(Alerts::Message).string().not_null())
                        .col(ColumnDef::new(Alerts::IngredientId).uuid().null())
                        .col(ColumnDef::new(Alerts::ReceivingId).uuid().null())
                        .col(
                            ColumnDef::new(Alerts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Alerts::ResolvedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Alerts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Alerts {
        Table,
        Id,
        AlertType,
        Priority,
        Status,
        Title,
        Message,
        IngredientId,
        ReceivingId,
        CreatedAt,
        ResolvedAt,
    }
}
