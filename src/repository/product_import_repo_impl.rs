// ==========================================
// 贸易产品目录 - 产品导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::import::ImportBatchRecord;
use crate::domain::product::{IdentityKey, ProductDraft};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_import_repo::ProductImportRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductImportRepositoryImpl
// ==========================================
pub struct ProductImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入产品
    fn insert_products_tx(tx: &Transaction, drafts: &[ProductDraft]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO products (
                name, category_id, brand_id, spec_weight, package_type,
                applicable_scenes, moq, supply_area, description, status,
                price_trend, latest_price_updated_at, latest_price_note,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
            )
            "#,
        )?;

        let now = Utc::now().to_rfc3339();
        let mut count = 0;
        for draft in drafts {
            let scenes = serde_json::to_string(&draft.applicable_scenes)?;
            stmt.execute(params![
                draft.name,
                draft.category.id,
                draft.brand.as_ref().map(|b| b.id),
                draft.spec_weight,
                draft.package_type,
                scenes,
                draft.moq,
                draft.supply_area,
                draft.description,
                draft.status.as_str(),
                draft.price_trend.map(|t| t.as_str()),
                draft
                    .latest_price_updated_at
                    .map(|d| d.format("%Y-%m-%d").to_string()),
                draft.latest_price_note,
                now,
                now,
            ])?;
            count += 1;
        }

        Ok(count)
    }
}

#[async_trait]
impl ProductImportRepository for ProductImportRepositoryImpl {
    async fn list_identity_keys(&self) -> RepositoryResult<Vec<IdentityKey>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, spec_weight, category_id, brand_id FROM products")?;

        let keys = stmt
            .query_map([], |row| {
                Ok(IdentityKey {
                    name: row.get(0)?,
                    spec_weight: row.get(1)?,
                    category_id: row.get(2)?,
                    brand_id: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(keys)
    }

    async fn count_products(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 批量插入产品（事务化，失败整批回滚）
    async fn insert_products_batch(&self, drafts: &[ProductDraft]) -> RepositoryResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let count = Self::insert_products_tx(&tx, drafts)?;

        tx.commit()?;
        Ok(count)
    }

    async fn insert_import_batch(&self, record: &ImportBatchRecord) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO product_import_batch (
                batch_id, total_rows, success_rows, failed_rows,
                committed_batches, failed_batches, error_artifact_ref,
                elapsed_ms, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.batch_id,
                record.total_rows as i64,
                record.success_rows as i64,
                record.failed_rows as i64,
                record.committed_batches as i64,
                record.failed_batches as i64,
                record.error_artifact_ref,
                record.elapsed_ms,
                record.imported_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatchRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, total_rows, success_rows, failed_rows,
                   committed_batches, failed_batches, error_artifact_ref,
                   elapsed_ms, imported_at
            FROM product_import_batch
            ORDER BY imported_at DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, i64>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(
                |(
                    batch_id,
                    total,
                    success,
                    failed,
                    committed,
                    failed_batches,
                    artifact,
                    elapsed_ms,
                    imported_at,
                )|
                 -> RepositoryResult<ImportBatchRecord> {
                    let imported_at = DateTime::parse_from_rfc3339(&imported_at)
                        .map_err(|e| RepositoryError::FieldValueError {
                            field: "imported_at".to_string(),
                            message: e.to_string(),
                        })?
                        .with_timezone(&Utc);

                    Ok(ImportBatchRecord {
                        batch_id,
                        total_rows: total as usize,
                        success_rows: success as usize,
                        failed_rows: failed as usize,
                        committed_batches: committed as usize,
                        failed_batches: failed_batches as usize,
                        error_artifact_ref: artifact,
                        elapsed_ms,
                        imported_at,
                    })
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::product::{Brand, Category, ProductStatus};

    fn test_repo() -> (ProductImportRepositoryImpl, Arc<Mutex<Connection>>) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO categories (id, name) VALUES (1, '粮油');
             INSERT INTO brands (id, name) VALUES (1, '金龙鱼');",
        )
        .unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (ProductImportRepositoryImpl::from_connection(conn.clone()), conn)
    }

    fn draft(
        row_number: usize,
        name: &str,
        category_id: i64,
        brand: Option<Brand>,
    ) -> ProductDraft {
        ProductDraft {
            row_number,
            name: name.to_string(),
            spec_weight: "5L".to_string(),
            package_type: "桶装".to_string(),
            category: Category {
                id: category_id,
                name: "粮油".to_string(),
            },
            brand,
            status: ProductStatus::Listed,
            price_trend: None,
            applicable_scenes: vec!["餐饮".to_string(), "家庭".to_string()],
            latest_price_updated_at: None,
            moq: None,
            supply_area: None,
            description: None,
            latest_price_note: None,
        }
    }

    #[tokio::test]
    async fn test_insert_batch_and_read_keys() {
        let (repo, _conn) = test_repo();
        let brand = Brand {
            id: 1,
            name: "金龙鱼".to_string(),
        };

        let inserted = repo
            .insert_products_batch(&[
                draft(2, "大豆油", 1, Some(brand)),
                draft(3, "菜籽油", 1, None),
            ])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(repo.count_products().await.unwrap(), 2);

        let keys = repo.list_identity_keys().await.unwrap();
        assert!(keys.contains(&IdentityKey::new("大豆油", "5L", 1, Some(1))));
        assert!(keys.contains(&IdentityKey::new("菜籽油", "5L", 1, None)));
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back_whole_batch() {
        let (repo, _conn) = test_repo();

        // 第二行引用不存在的分类 → 外键失败
        let result = repo
            .insert_products_batch(&[draft(2, "大豆油", 1, None), draft(3, "菜籽油", 99, None)])
            .await;

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
        assert_eq!(repo.count_products().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_scenes_are_stored_as_json() {
        let (repo, conn) = test_repo();
        repo.insert_products_batch(&[draft(2, "大豆油", 1, None)])
            .await
            .unwrap();

        let scenes: String = conn
            .lock()
            .unwrap()
            .query_row("SELECT applicable_scenes FROM products", [], |row| row.get(0))
            .unwrap();
        assert_eq!(scenes, r#"["餐饮","家庭"]"#);
    }

    #[tokio::test]
    async fn test_import_batch_round_trip() {
        let (repo, _conn) = test_repo();
        let record = ImportBatchRecord {
            batch_id: "b-1".to_string(),
            total_rows: 3,
            success_rows: 2,
            failed_rows: 1,
            committed_batches: 1,
            failed_batches: 0,
            error_artifact_ref: None,
            elapsed_ms: 12,
            imported_at: Utc::now(),
        };
        repo.insert_import_batch(&record).await.unwrap();

        let batches = repo.get_recent_batches(10).await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_id, "b-1");
        assert_eq!(batches[0].failed_rows, 1);
    }
}
