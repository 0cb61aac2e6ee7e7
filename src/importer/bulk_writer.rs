// ==========================================
// CNC 零件库存管理 - 批量写入器
// ==========================================
// 阶段 3: 逐行提交有效记录
// 语义:
// - 每行成功立即计入累加器，失败即停止
// - 不回滚已提交行，失败时报告已提交 ID 与失败行号
// - 库存: Update 行按既有 ID 更新，其余新增；单价/供应商仅新增
// ==========================================

use crate::domain::bulk_import::{
    BulkImportResult, ImportContext, InventoryAction, ResolvedRow, ValidatedBatch,
};
use crate::domain::inventory::{InventoryUpdate, NewInventory, NewPartPrice, NewSupplier};
use crate::importer::bulk_import_trait::BulkWriter;
use crate::repository::{InventoryStore, RepositoryResult};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// 单行写入结果
enum Committed {
    Inserted(String),
    Updated(String),
}

// ==========================================
// CommitProgress - 提交累加器
// ==========================================
#[derive(Debug, Default)]
struct CommitProgress {
    inserted: usize,
    updated: usize,
    committed_ids: Vec<String>,
}

impl CommitProgress {
    fn record(&mut self, committed: Committed) {
        match committed {
            Committed::Inserted(id) => {
                self.inserted += 1;
                self.committed_ids.push(id);
            }
            Committed::Updated(id) => {
                self.updated += 1;
                self.committed_ids.push(id);
            }
        }
    }

    fn succeeded(self) -> BulkImportResult {
        BulkImportResult {
            success: true,
            inserted_count: self.inserted,
            updated_count: self.updated,
            error: None,
            partial_inserts: None,
            failed_row_index: None,
        }
    }

    fn failed(self, row_index: usize, message: String) -> BulkImportResult {
        BulkImportResult {
            success: false,
            inserted_count: self.inserted,
            updated_count: self.updated,
            error: Some(message),
            partial_inserts: Some(self.committed_ids),
            failed_row_index: Some(row_index),
        }
    }
}

// ==========================================
// BulkWriterImpl
// ==========================================
pub struct BulkWriterImpl<S>
where
    S: InventoryStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> BulkWriterImpl<S>
where
    S: InventoryStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn commit_row(
        &self,
        record: ResolvedRow,
        ctx: &ImportContext,
        today: NaiveDate,
    ) -> RepositoryResult<Committed> {
        match record {
            ResolvedRow::Inventory(inv) => match inv.action {
                InventoryAction::Update { inventory_id } => {
                    let id = self
                        .store
                        .update_inventory(InventoryUpdate {
                            inventory_id,
                            current_quantity: inv.quantity,
                            location: inv.location,
                            last_count_date: today,
                            updated_by: ctx.user_id.clone(),
                        })
                        .await?;
                    Ok(Committed::Updated(id))
                }
                InventoryAction::Insert => {
                    let id = self
                        .store
                        .insert_inventory(NewInventory {
                            part_id: inv.part_id,
                            factory_id: ctx.factory_id.clone(),
                            current_quantity: inv.quantity,
                            location: inv.location,
                            last_count_date: today,
                            updated_by: ctx.user_id.clone(),
                        })
                        .await?;
                    Ok(Committed::Inserted(id))
                }
            },
            ResolvedRow::PartPrice(price) => {
                let id = self
                    .store
                    .insert_part_price(NewPartPrice {
                        part_id: price.part_id,
                        supplier_id: price.supplier_id,
                        unit_price: price.unit_price,
                        currency: price.currency,
                        effective_from: price.effective_from,
                        created_by: ctx.user_id.clone(),
                    })
                    .await?;
                Ok(Committed::Inserted(id))
            }
            ResolvedRow::Supplier(supplier) => {
                let id = self
                    .store
                    .insert_supplier(NewSupplier {
                        factory_id: ctx.factory_id.clone(),
                        supplier_code: supplier.supplier_code,
                        supplier_name: supplier.supplier_name,
                        contact_person: supplier.contact_person,
                        phone: supplier.phone,
                        email: supplier.email,
                        country: supplier.country,
                        address: supplier.address,
                        website: supplier.website,
                        status: supplier.status,
                        created_by: ctx.user_id.clone(),
                    })
                    .await?;
                Ok(Committed::Inserted(id))
            }
        }
    }
}

#[async_trait]
impl<S> BulkWriter for BulkWriterImpl<S>
where
    S: InventoryStore + ?Sized,
{
    #[instrument(skip(self, batch, ctx), fields(category = %batch.category(), rows = batch.len()))]
    async fn commit(&self, batch: ValidatedBatch, ctx: &ImportContext) -> BulkImportResult {
        let today = Local::now().date_naive();
        let mut progress = CommitProgress::default();

        for row in batch.into_rows() {
            match self.commit_row(row.record, ctx, today).await {
                Ok(committed) => progress.record(committed),
                Err(e) => {
                    error!(
                        row_index = row.row_index,
                        inserted = progress.inserted,
                        updated = progress.updated,
                        error = %e,
                        "写入失败，停止提交"
                    );
                    return progress.failed(row.row_index, e.to_string());
                }
            }
        }

        info!(
            inserted = progress.inserted,
            updated = progress.updated,
            "批量写入完成"
        );
        progress.succeeded()
    }
}
