use anyhow::Result;
use clap::Parser;
use trivial_quiz::cli::Cli;
use trivial_quiz::utils::logging::log_startup;
use trivial_quiz::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref())?;

    // 初始化日志
    logger::init(config.verbose_logging);
    log_startup(&config);

    // 初始化并运行应用
    let app = App::initialize(config)?;

    tokio::select! {
        result = app.run(cli.command) => result?,
        _ = tokio::signal::ctrl_c() => {
            app.shutdown();
            println!("\n👋 已退出");
        }
    }

    Ok(())
}
