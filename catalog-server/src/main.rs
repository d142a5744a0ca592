use catalog_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载 .env (不存在时忽略)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 日志
    setup_environment(&config)?;

    if !config.is_production() {
        print_banner();
    }

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "🦀 Catalog server starting..."
    );

    // 4. 启动 HTTP 服务器 (连接存储、启动后台 worker)
    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
