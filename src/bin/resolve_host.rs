use clap::Parser;
use multisite::adapters::LocalContentStore;
use multisite::config::SiteConfig;
use multisite::core::loader::ContentLoader;
use multisite::core::resolver::HostResolver;
use multisite::core::routing::{RequestRouter, RouteDecision};
use multisite::utils::logger;
use multisite::utils::validation::Validate;
use std::sync::Arc;

/// 診斷工具：檢查 host/path 會被如何路由，以及租戶內容是否可載入
#[derive(Debug, Parser)]
#[command(name = "resolve_host")]
#[command(about = "Shows how hosts are routed and whether tenant content loads")]
struct Args {
    /// Hosts to resolve, e.g. acme.sitesbystephens.com
    #[arg(required = true)]
    hosts: Vec<String>,

    #[arg(long, default_value = "/", help = "Request path")]
    path: String,

    #[arg(long, short = 'c', help = "Path to a TOML config file")]
    config: Option<String>,

    #[arg(long, help = "Tenant content directory, overrides [content].root")]
    content_root: Option<String>,

    #[arg(long, help = "Also try to load each tenant's content document")]
    load: bool,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let mut config = match &args.config {
        Some(path) => SiteConfig::from_file(path)?,
        None => SiteConfig::default(),
    };
    if let Some(root) = &args.content_root {
        config.content.root = root.clone();
    }
    config.validate()?;

    let router = RequestRouter::new(HostResolver::new(&config.domains), &config.routing);
    let loader = ContentLoader::new(
        Arc::new(LocalContentStore::new(&config.content.root)),
        config.content.document_name.clone(),
    );

    println!("🔍 apex: {}  path: {}", router.resolver().apex(), args.path);
    for host in &args.hosts {
        let decision = router.decide(Some(host), &args.path);
        match &decision {
            RouteDecision::Passthrough => println!("  {} → passthrough", host),
            RouteDecision::RootSite => println!("  {} → marketing site", host),
            RouteDecision::Tenant(slug) => {
                let rewritten = decision.rewritten_path().unwrap_or_default();
                println!("  {} → tenant '{}' ({})", host, slug, rewritten);
                if args.load {
                    if loader.load(slug).await.is_found() {
                        println!("    ✅ {} loads", loader.document_key(slug));
                    } else {
                        println!("    ❌ {} not found (404)", loader.document_key(slug));
                    }
                }
            }
        }
    }

    Ok(())
}
