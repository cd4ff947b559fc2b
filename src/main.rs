use clap::Parser;
use multisite::adapters::{LocalContentStore, MemoryRateLimitStore, ResendClient};
use multisite::config::{ContentBackend, RateLimitBackend, SiteConfig};
use multisite::domain::ports::{ContentStore, RateLimitStore};
use multisite::utils::error::{ErrorSeverity, SiteError};
use multisite::utils::{logger, validation::Validate};
use multisite::{build_app, AppState, CliConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting multisite server");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), SiteError> {
    // 載入並驗證配置
    let config = cli.load_site_config()?;
    config.validate()?;

    let store = content_store(&config).await?;
    tracing::info!("📁 Tenant content from {}", store.describe());

    let rate_store = rate_limit_store(&config).await?;

    let email = ResendClient::from_config(&config.email)?;
    if !email.is_configured() {
        tracing::warn!("⚠️ No email API key configured; form submissions will fail with 500");
    }

    let bind = config.server.bind.clone();
    let state = AppState::new(config, store, rate_store, Arc::new(email));
    multisite::app::serve(build_app(state), &bind).await
}

async fn content_store(config: &SiteConfig) -> Result<Arc<dyn ContentStore>, SiteError> {
    match config.content.backend {
        ContentBackend::Local => Ok(Arc::new(LocalContentStore::new(&config.content.root))),
        #[cfg(feature = "s3")]
        ContentBackend::S3 => {
            let bucket = config.content.s3_bucket.clone().unwrap_or_default();
            let store = multisite::adapters::S3ContentStore::from_env(
                bucket,
                config.content.root.clone(),
                config.content.s3_region.clone(),
            )
            .await;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        ContentBackend::S3 => Err(SiteError::ConfigError {
            message: "content.backend = \"s3\" requires building with the `s3` feature".to_string(),
        }),
    }
}

async fn rate_limit_store(config: &SiteConfig) -> Result<Arc<dyn RateLimitStore>, SiteError> {
    match config.rate_limit.backend {
        RateLimitBackend::Memory => {
            tracing::info!("Rate limits kept in process memory");
            Ok(Arc::new(MemoryRateLimitStore::new()))
        }
        #[cfg(feature = "redis")]
        RateLimitBackend::Redis => {
            let url = config.rate_limit.redis_url.clone().unwrap_or_default();
            let store = multisite::adapters::RedisRateLimitStore::connect(
                &url,
                config.rate_limit.namespace.clone(),
            )
            .await?;
            tracing::info!("Rate limits shared through Redis");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        RateLimitBackend::Redis => Err(SiteError::ConfigError {
            message: "rate_limit.backend = \"redis\" requires building with the `redis` feature"
                .to_string(),
        }),
    }
}
