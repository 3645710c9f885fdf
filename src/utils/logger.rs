use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "review_gateway=info";
const VERBOSE_DIRECTIVE: &str = "review_gateway=debug,info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人類可讀，寫到 stderr；stdout 保留給評論 JSON
    Compact,
    /// 一行一個 JSON 物件，給 CloudWatch 之類的收集器
    Json,
}

/// `RUST_LOG` 優先，否則依 verbose 選預設過濾條件
pub fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// 安裝全域 subscriber。已安裝過時回傳 false（測試中可能重複呼叫）。
pub fn init_logger(format: LogFormat, verbose: bool) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    let result = match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .json()
                    .with_current_span(false),
            )
            .try_init(),
    };

    result.is_ok()
}

pub fn init_cli_logger(verbose: bool) {
    init_logger(LogFormat::Compact, verbose);
}

pub fn init_lambda_logger() {
    init_logger(LogFormat::Json, false);
}
