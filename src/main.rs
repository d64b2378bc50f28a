use anyhow::Result;
use million_quiz::app::App;
use million_quiz::config::Config;
use million_quiz::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
