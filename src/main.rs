use clap::Parser;
use review_gateway::core::stats::{published_for_listing, ReviewStats};
use review_gateway::utils::error::ErrorSeverity;
use review_gateway::utils::{logger, validation::Validate};
use review_gateway::{CliConfig, GatewayConfig, GatewayError, ReviewGateway};

fn exit_with(e: &GatewayError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("🚀 Starting review-gateway");

    // 載入配置：TOML 檔優先，否則讀環境變數
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            GatewayConfig::from_file(path).unwrap_or_else(|e| exit_with(&e))
        }
        None => GatewayConfig::from_env(),
    };

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let gateway = ReviewGateway::from_config(&config)
        .await
        .unwrap_or_else(|e| exit_with(&e));

    let mut report = gateway.refresh().await;

    if let Some(id) = &cli.toggle {
        match gateway.toggle_published(id).await {
            Ok(published) => {
                let state = if published { "visible" } else { "hidden" };
                tracing::info!("🔁 Review {} is now {}", id, state);
                report = gateway.refresh().await;
            }
            Err(e) => exit_with(&e),
        }
    }

    if report.used_fallback {
        tracing::warn!("⚠️ Serving synthesized reviews, no provider returned data");
    }

    let json = if cli.stats {
        serde_json::to_string_pretty(&ReviewStats::from_reviews(&report.reviews))?
    } else if let Some(listing) = &cli.listing {
        serde_json::to_string_pretty(&published_for_listing(&report.reviews, listing))?
    } else {
        if cli.published_only {
            report.reviews.retain(|r| r.is_published);
        }
        if cli.report {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string_pretty(&report.reviews)?
        }
    };

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
