// ==========================================
// 贸易产品目录 - 命令行入口
// ==========================================
// 用法:
//   trade-catalog-import <file> [--commit] [--db <path>] [--json-log]
//
// 默认为试运行（只校验不落库），--commit 时写入产品库
// 环境变量 APP_LOCALE 控制错误消息语言（默认 zh-CN）
// ==========================================

use anyhow::{bail, Context};
use std::path::Path;
use trade_catalog_import::api::ImportApi;
use trade_catalog_import::{db, i18n, logging};

struct CliArgs {
    file: String,
    commit: bool,
    db_path: Option<String>,
    json_log: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut file = None;
    let mut commit = false;
    let mut db_path = None;
    let mut json_log = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--commit" => commit = true,
            "--json-log" => json_log = true,
            "--db" => {
                let value = args.next().context("--db 缺少数据库路径")?;
                db_path = Some(value);
            }
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            _ if file.is_none() => file = Some(arg),
            _ => bail!("只支持单个导入文件: {}", arg),
        }
    }

    let file =
        file.context("用法: trade-catalog-import <file> [--commit] [--db <path>] [--json-log]")?;
    Ok(CliArgs {
        file,
        commit,
        db_path,
        json_log,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    let locale =
        std::env::var("APP_LOCALE").unwrap_or_else(|_| i18n::DEFAULT_LOCALE.to_string());
    i18n::set_locale(&locale);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", trade_catalog_import::APP_NAME, trade_catalog_import::VERSION);
    tracing::info!("==================================================");

    let db_path = args.db_path.unwrap_or_else(db::default_db_path);
    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建数据目录: {}", parent.display()))?;
        }
    }
    tracing::info!(db_path = %db_path, commit = args.commit, "使用数据库");

    let api = ImportApi::new(db_path);
    api.init_database()?;

    let result = api.import_products_from_file(&args.file, args.commit).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
