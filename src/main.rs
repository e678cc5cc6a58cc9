use anyhow::Context;
use appliance_listing::core::{DocumentStore, Navigator, ObjectStorage};
use appliance_listing::utils::error::ErrorSeverity;
use appliance_listing::utils::{logger, validation::Validate};
use appliance_listing::{
    AppConfig, CliArgs, HttpObjectStorage, ListingError, ListingForm, ListingInput,
    LocationResolver, LoggingNavigator, NavigationPolicy, NominatimGeocoder, RestDocumentStore,
    StorageKind, SubmissionWorkflow,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting appliance-listing");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入配置
    let mut config = AppConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    // 命令列參數覆蓋配置
    if let Some(policy) = &args.navigation_policy {
        let policy: NavigationPolicy = policy.parse()?;
        config.set_navigation_policy(policy);
        tracing::info!("🔧 Navigation policy overridden to: {:?}", policy);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 讀取刊登資料
    let input = ListingInput::from_file(&args.listing)
        .with_context(|| format!("failed to load listing '{}'", args.listing))?;

    let store = RestDocumentStore::new(config.backend.endpoint.clone())
        .with_api_token(config.backend.api_token.clone());

    // 填寫表單，必要時先帶入個人資料的位置再查詢地址
    let mut form = ListingForm::new();
    if args.prefill || args.geocode {
        let resolver = LocationResolver::new(NominatimGeocoder::new(
            config.geocoding_endpoint(),
            config.user_agent(),
        ));
        if args.prefill {
            resolver
                .prefill_from_profile(&store, &mut form, &input.user_id)
                .await?;
        }
        input.apply_to(&mut form)?;
        if args.geocode && !resolver.find_location(&mut form).await? {
            tracing::warn!("📍 Address '{}' could not be located", form.address());
        }
    } else {
        input.apply_to(&mut form)?;
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be uploaded");
        return match form.validate() {
            Ok(draft) => {
                println!(
                    "✅ '{}' is ready: {} image(s), {} per day, category {}",
                    draft.name(),
                    draft.images().len(),
                    draft.price_per_day(),
                    draft.category()
                );
                Ok(())
            }
            Err(e) => exit_with(e),
        };
    }

    // 建立儲存後端並送出
    let navigator = LoggingNavigator::new();
    let outcome = match config.storage_kind()? {
        StorageKind::Http => {
            let storage = HttpObjectStorage::new(config.storage.endpoint.clone().unwrap_or_default())
                .with_public_base_url(config.storage.public_base_url.clone())
                .with_api_token(config.backend.api_token.clone());
            submit(Arc::new(storage), store, &navigator, &config, &form, &input.user_id).await
        }
        StorageKind::S3 => submit_s3(store, &navigator, &config, &form, &input.user_id).await,
    };

    match outcome {
        Ok(receipt) => {
            println!("✅ Item added successfully! (id: {})", receipt.document_id);
            for url in &receipt.image_urls {
                println!("🖼️  {}", url);
            }
            Ok(())
        }
        Err(e) => exit_with(e),
    }
}

async fn submit<S, D, N>(
    storage: Arc<S>,
    store: D,
    navigator: N,
    config: &AppConfig,
    form: &ListingForm,
    user_id: &str,
) -> appliance_listing::Result<appliance_listing::SubmissionReceipt>
where
    S: ObjectStorage + 'static,
    D: DocumentStore,
    N: Navigator,
{
    let workflow = SubmissionWorkflow::new(storage, store, navigator, config.workflow_settings());
    workflow.submit_form(form, user_id).await
}

#[cfg(feature = "s3")]
async fn submit_s3(
    store: RestDocumentStore,
    navigator: &LoggingNavigator,
    config: &AppConfig,
    form: &ListingForm,
    user_id: &str,
) -> appliance_listing::Result<appliance_listing::SubmissionReceipt> {
    let storage = appliance_listing::S3ObjectStorage::from_env(
        config.storage.bucket.clone().unwrap_or_default(),
        config.storage.region.clone().unwrap_or_default(),
    )
    .await;
    submit(Arc::new(storage), store, navigator, config, form, user_id).await
}

#[cfg(not(feature = "s3"))]
async fn submit_s3(
    _store: RestDocumentStore,
    _navigator: &LoggingNavigator,
    _config: &AppConfig,
    _form: &ListingForm,
    _user_id: &str,
) -> appliance_listing::Result<appliance_listing::SubmissionReceipt> {
    Err(ListingError::ConfigError {
        message: "storage.type = \"s3\" requires building with --features s3".to_string(),
    })
}

fn exit_with(e: ListingError) -> ! {
    tracing::error!(
        "❌ Submission failed: {} (Stage: {:?}, Category: {:?}, Severity: {:?})",
        e,
        e.stage(),
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
