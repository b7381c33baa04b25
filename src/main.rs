use anyhow::Result;
use registration_form::{logger, App, Config};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init_with_verbose(config.verbose_logging);

    // 初始化并运行应用
    let mut app = App::initialize(config).await?;
    app.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
