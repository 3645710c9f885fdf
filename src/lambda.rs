#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use review_gateway::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use review_gateway::{GatewayConfig, Review, ReviewGateway};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    #[serde(default)]
    pub published_only: bool,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub reviews: Vec<Review>,
    pub used_fallback: bool,
}

#[cfg(feature = "lambda")]
async fn function_handler(
    gateway: &ReviewGateway,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    tracing::info!("Handling review list request");

    // 聚合永不失敗，最差情況為替代資料
    let mut report = gateway.refresh().await;
    if event.payload.published_only {
        report.reviews.retain(|r| r.is_published);
    }

    Ok(Response {
        reviews: report.reviews,
        used_fallback: report.used_fallback,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = GatewayConfig::from_env();
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let gateway = ReviewGateway::from_config(&config)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let gateway = &gateway;

    run(service_fn(move |event: LambdaEvent<Request>| async move {
        function_handler(gateway, event).await
    }))
    .await
}
