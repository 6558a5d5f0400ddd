// ==========================================
// 贸易产品目录 - 参考目录 Repository
// ==========================================
// 职责: 读取全部分类/品牌（导入前一次性快照）
// 红线: Repository 不含业务规则，只做数据读取
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::{Brand, Category};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// CatalogRepository Trait
// ==========================================
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 读取全部分类
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    /// 读取全部品牌
    async fn list_brands(&self) -> RepositoryResult<Vec<Brand>>;
}

// ==========================================
// CatalogRepositoryImpl（rusqlite）
// ==========================================
pub struct CatalogRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepositoryImpl {
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

    fn query_id_name(&self, sql: &str) -> RepositoryResult<Vec<(i64, String)>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let rows = self.query_id_name("SELECT id, name FROM categories ORDER BY id")?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    async fn list_brands(&self) -> RepositoryResult<Vec<Brand>> {
        let rows = self.query_id_name("SELECT id, name FROM brands ORDER BY id")?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Brand { id, name })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn seeded_repo() -> CatalogRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO categories (id, name) VALUES (2, '饮料'), (1, '粮油');
             INSERT INTO brands (id, name) VALUES (1, '金龙鱼');",
        )
        .unwrap();
        CatalogRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_list_categories_ordered_by_id() {
        let repo = seeded_repo();
        let categories = repo.list_categories().await.unwrap();
        assert_eq!(
            categories,
            vec![
                Category {
                    id: 1,
                    name: "粮油".to_string(),
                },
                Category {
                    id: 2,
                    name: "饮料".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_brands() {
        let repo = seeded_repo();
        let brands = repo.list_brands().await.unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].name, "金龙鱼");
    }

    #[test]
    fn test_open_failure_is_connection_error() {
        let result = CatalogRepositoryImpl::new("/nonexistent/dir/catalog.db");
        assert!(matches!(
            result,
            Err(RepositoryError::DatabaseConnectionError(_))
        ));
    }
}
