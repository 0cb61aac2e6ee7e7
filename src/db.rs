// ==========================================
// CNC 零件库存管理 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键 / busy_timeout）
// - 提供导入相关表的建表语句
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "CNC_INVENTORY_DB_PATH";

/// 默认数据库文件名
pub const DEFAULT_DB_FILE: &str = "cnc_inventory.db";

/// 导入子系统涉及的表
///
/// 说明：
/// - parts 为全局主数据；suppliers / inventory 按 factory_id 隔离
/// - 编码比较统一使用 COLLATE NOCASE
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS parts (
    id          TEXT PRIMARY KEY,
    part_code   TEXT NOT NULL UNIQUE COLLATE NOCASE,
    part_name   TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS suppliers (
    id              TEXT PRIMARY KEY,
    factory_id      TEXT NOT NULL,
    supplier_code   TEXT NOT NULL COLLATE NOCASE,
    supplier_name   TEXT NOT NULL,
    contact_person  TEXT,
    phone           TEXT,
    email           TEXT,
    country         TEXT,
    address         TEXT,
    website         TEXT,
    status          TEXT NOT NULL DEFAULT 'ACTIVE',
    created_by      TEXT,
    created_at      TEXT NOT NULL,
    UNIQUE (factory_id, supplier_code)
);

CREATE TABLE IF NOT EXISTS inventory (
    id                TEXT PRIMARY KEY,
    part_id           TEXT NOT NULL REFERENCES parts(id),
    factory_id        TEXT NOT NULL,
    current_quantity  INTEGER NOT NULL DEFAULT 0,
    location          TEXT,
    last_count_date   TEXT,
    updated_at        TEXT NOT NULL,
    updated_by        TEXT,
    UNIQUE (part_id, factory_id)
);

CREATE TABLE IF NOT EXISTS part_prices (
    id              TEXT PRIMARY KEY,
    part_id         TEXT NOT NULL REFERENCES parts(id),
    supplier_id     TEXT REFERENCES suppliers(id),
    unit_price      REAL NOT NULL,
    currency        TEXT NOT NULL,
    effective_from  TEXT NOT NULL,
    is_current      INTEGER NOT NULL DEFAULT 1,
    created_by      TEXT,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id  TEXT NOT NULL,
    key       TEXT NOT NULL,
    value     TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 CNC_INVENTORY_DB_PATH > 用户数据目录 > 当前目录
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join("cnc-inventory").join(DEFAULT_DB_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('parts','suppliers','inventory','part_prices','config_kv')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5);
    }
}
