use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use product_admin::app::products::view::{render_page_text, render_tbody_html};
use product_admin::core::config::{load_config, ClientConfig};
use product_admin::infrastructure::logger::Logger;
use product_admin::{AdminClient, AlwaysConfirm, Confirm, FormField, HttpProductService, UiEvent};

/// 产品目录管理终端
#[derive(Debug, Parser)]
#[command(name = "product-admin", version, about)]
struct Cli {
    /// 配置文件路径，默认查找 product-admin.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 覆盖配置中的服务地址
    #[arg(long)]
    base_url: Option<String>,

    /// 覆盖配置中的日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 删除时不再确认
    #[arg(short, long)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 写出默认配置文件
    InitConfig { path: PathBuf },
}

/// 终端里的一条命令
#[derive(Debug, PartialEq)]
enum ShellCommand {
    Event(UiEvent),
    Search(Option<String>),
    Set(FormField, String),
    Show,
    Html,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "list" | "all" => ShellCommand::Event(UiEvent::ShowAll),
        "search" => ShellCommand::Search((!rest.is_empty()).then(|| rest.to_string())),
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = field.parse().map_err(anyhow::Error::msg)?;
            ShellCommand::Set(field, value.trim().to_string())
        }
        "submit" | "save" => ShellCommand::Event(UiEvent::Submit),
        "cancel" => ShellCommand::Event(UiEvent::Cancel),
        "edit" | "delete" => {
            if rest.is_empty() {
                bail!("用法: {} <id>", word);
            }
            ShellCommand::Event(UiEvent::TableClick {
                action: word.to_string(),
                row_id: rest.to_string(),
            })
        }
        "show" => ShellCommand::Show,
        "html" => ShellCommand::Html,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("未知命令: {}，输入 help 查看用法", other),
    };
    Ok(Some(command))
}

async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        let n = io::stdin().read_line(&mut buf)?;
        Ok::<_, io::Error>((n > 0).then_some(buf))
    })
    .await??;
    Ok(line)
}

/// 从标准输入读取 y/N
struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        if let Err(err) = io::stdout().flush() {
            debug!("刷新标准输出失败: {}", err);
        }
        match read_line().await {
            Ok(Some(answer)) => matches!(answer.trim(), "y" | "Y" | "yes"),
            _ => false,
        }
    }
}

fn print_page(client: &AdminClient) {
    let text = client.with_page(|page| {
        if page.take_scroll_request() {
            debug!("滚动到表单");
        }
        render_page_text(page)
    });
    println!("{}", text);
}

fn print_usage() {
    println!("可用命令:");
    println!("  list                      - 显示全部产品");
    println!("  search [关键字]           - 按名称搜索，空关键字显示全部");
    println!("  set <字段> <值>           - 填写表单 (name, description, price, quantity)");
    println!("  submit                    - 提交表单（添加或更新）");
    println!("  edit <id>                 - 编辑产品");
    println!("  delete <id>               - 删除产品");
    println!("  cancel                    - 取消编辑");
    println!("  show                      - 重新显示页面");
    println!("  html                      - 输出表格 HTML");
    println!("  quit                      - 退出");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::InitConfig { path }) = &cli.command {
        ClientConfig::default().save_to_file(path)?;
        println!("已写出默认配置: {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from_file(path)?,
        None => load_config()?,
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    let _guard = Logger::init(&config.logging)?;

    let api = HttpProductService::new(&config.api)?;
    info!("产品接口: {}", api.products_url());

    let confirm: Arc<dyn Confirm> = if cli.yes {
        Arc::new(AlwaysConfirm)
    } else {
        Arc::new(StdinConfirm)
    };
    let client = AdminClient::new(Arc::new(api), confirm, config.ui.clone());

    client.dispatch(UiEvent::PageLoaded).await;
    print_page(&client);

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = read_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        match command {
            ShellCommand::Event(event) => client.dispatch(event).await,
            ShellCommand::Search(term) => {
                if let Some(term) = term {
                    client.set_search_input(term);
                }
                client.dispatch(UiEvent::Search).await;
            }
            ShellCommand::Set(field, value) => client.set_field(field, value),
            ShellCommand::Show => {}
            ShellCommand::Html => {
                println!("{}", render_tbody_html(&client.snapshot().table));
                continue;
            }
            ShellCommand::Help => {
                print_usage();
                continue;
            }
            ShellCommand::Quit => break,
        }

        print_page(&client);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_commands() {
        assert_eq!(
            parse_command("edit 7").unwrap(),
            Some(ShellCommand::Event(UiEvent::TableClick {
                action: "edit".to_string(),
                row_id: "7".to_string(),
            }))
        );
        assert!(parse_command("delete").is_err());
    }

    #[test]
    fn test_parse_set_and_search() {
        assert_eq!(
            parse_command("set description  a small widget ").unwrap(),
            Some(ShellCommand::Set(FormField::Description, "a small widget".to_string()))
        );
        assert!(parse_command("set colour red").is_err());
        assert_eq!(parse_command("search").unwrap(), Some(ShellCommand::Search(None)));
        assert_eq!(
            parse_command("search red widget").unwrap(),
            Some(ShellCommand::Search(Some("red widget".to_string())))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("frobnicate").is_err());
    }
}
