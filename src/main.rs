use bedrock_imagegen::{
    bedrock, logger, Config, ImageClient, ImageGenerationHandler, InboundEvent, ResponseEnvelope,
    S3ObjectStore,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init()?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return Err(e.into());
        }
    };

    let sdk_config = bedrock::load_sdk_config(&config.bedrock).await;
    let image_client = ImageClient::new(aws_sdk_bedrockruntime::Client::new(&sdk_config));
    let object_store = S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config));

    let handler =
        ImageGenerationHandler::new(&config, Arc::new(image_client), Arc::new(object_store));
    logger::log_config_info(&config, handler.family());

    let handler = &handler;
    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<InboundEvent>| async move {
            logger::set_request_id(Some(event.context.request_id.clone()));
            let response: ResponseEnvelope = handler.handle(event.payload).await;
            log::info!("Responding with status {}", response.status_code);
            Ok::<_, Error>(response)
        },
    ))
    .await
}
