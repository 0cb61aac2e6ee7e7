// ==========================================
// CNC 零件库存管理 - 命令行入口
// ==========================================
// 子命令:
// - template: 生成导入模板 .xlsx
// - preview:  校验文件并以 JSON 输出预览
// - import:   校验后写入有效行，输出 BulkImportResult
// ==========================================

use clap::{Parser, Subcommand};
use cnc_inventory::api::{result_message, ApiError, BulkImportApi};
use cnc_inventory::{db, logging, ImportContext};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CNC 零件库存 Excel 批量导入工具
#[derive(Debug, Parser)]
#[command(name = "cnc-inventory", version, about = "CNC 零件库存 Excel 批量导入")]
struct Cli {
    /// 数据库文件路径（缺省: CNC_INVENTORY_DB_PATH 或用户数据目录）
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    /// 用户消息语言: ko / vi / en
    #[arg(long, default_value = "ko", global = true)]
    locale: String,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 生成导入模板
    Template {
        /// inventory / partPrices / suppliers
        #[arg(short, long)]
        category: String,

        /// ko / vi（缺省使用配置的默认语言）
        #[arg(short, long)]
        lang: Option<String>,

        /// 输出目录
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },

    /// 校验文件，输出预览（不写入）
    Preview {
        #[arg(short, long)]
        category: String,

        #[arg(short, long, value_name = "PATH")]
        file: PathBuf,

        #[arg(long)]
        factory: String,
    },

    /// 校验并写入有效行
    Import {
        #[arg(short, long)]
        category: String,

        #[arg(short, long, value_name = "PATH")]
        file: PathBuf,

        #[arg(long)]
        factory: String,

        #[arg(long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", cnc_inventory::APP_NAME, cnc_inventory::VERSION);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "命令执行失败");
            eprintln!("{}", e.localized(&cli.locale));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode, ApiError> {
    let db_path = cli.db.clone().unwrap_or_else(db::default_db_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
    }
    let api = BulkImportApi::new(&db_path.to_string_lossy()).await?;

    match &cli.command {
        Commands::Template {
            category,
            lang,
            out,
        } => {
            let file = api.download_template(category, lang.as_deref()).await?;
            let path = out.join(file.file_name);
            std::fs::write(&path, &file.bytes)
                .map_err(|e| ApiError::InternalError(format!("写入模板失败: {}", e)))?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Preview {
            category,
            file,
            factory,
        } => {
            let (file_name, bytes) = read_upload(file)?;
            let preview = api.preview(category, &file_name, &bytes, factory).await?;
            print_json(&preview)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Import {
            category,
            file,
            factory,
            user,
        } => {
            let (file_name, bytes) = read_upload(file)?;
            let preview = api.preview(category, &file_name, &bytes, factory).await?;
            let result = api
                .confirm(preview, &ImportContext::new(factory.as_str(), user.as_str()))
                .await?;

            print_json(&result)?;
            eprintln!("{}", result_message(&result, &cli.locale));
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn read_upload(path: &Path) -> Result<(String, Vec<u8>), ApiError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = std::fs::read(path).map_err(|e| {
        ApiError::InvalidInput(format!("无法读取文件 {}: {}", path.display(), e))
    })?;
    Ok((file_name, bytes))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ApiError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InternalError(format!("JSON 序列化失败: {}", e)))?;
    println!("{}", json);
    Ok(())
}
