use std::sync::Arc;

use anyhow::{Context, Result, bail};
use env_logger::{Builder, Target};
use log::LevelFilter;

use popstore_client::domains::auth::{AuthToken, Session};
use popstore_client::domains::engagement::{EngagementController, InFlightRegistry};
use popstore_client::domains::ui::views::carousel::{ListingFeed, load_feed};
use popstore_client::infra::routes;
use popstore_client::infra::services::ListingApiService;
use popstore_client::infra::{ApiClient, ApiClientAdapter, Config, TokioTimeProvider};
use popstore_model::ListingId;

const EMAIL_ENV: &str = "POPSTORE_EMAIL";
const PASSWORD_ENV: &str = "POPSTORE_PASSWORD";
const TOKEN_ENV: &str = "POPSTORE_TOKEN";

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("popstore_client", LevelFilter::Debug)
        .init();
}

async fn open_session(api: &dyn ListingApiService) -> Result<Session> {
    let session = Session::anonymous();
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        session.set_token(Some(AuthToken::new(token)));
    } else if let (Ok(email), Ok(password)) =
        (std::env::var(EMAIL_ENV), std::env::var(PASSWORD_ENV))
    {
        session
            .login(api, email, password)
            .await
            .context("login failed")?;
    }
    Ok(session)
}

/// Print the home page's popular carousel as the app would show it.
async fn print_popular(api: &dyn ListingApiService, config: &Config) -> Result<()> {
    let carousel = load_feed(
        api,
        ListingFeed::Popular,
        config.carousel.to_config(),
        Arc::new(TokioTimeProvider),
    )
    .await
    .context("failed to load popular listings")?;

    let output = serde_json::json!({
        "listings": carousel.items(),
        "indicator_dots": carousel.indicator_dots().len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let Some(arg) = std::env::args().nth(1) else {
        bail!("usage: popstore <listing-id> | popstore popular");
    };

    let config = Config::load();
    let client = ApiClient::with_timeout(&config.api_url, config.request_timeout())?;
    let api: Arc<dyn ListingApiService> =
        Arc::new(ApiClientAdapter::new(Arc::new(client)));

    if arg == "popular" {
        return print_popular(api.as_ref(), &config).await;
    }

    let listing_id: ListingId = arg
        .parse()
        .with_context(|| format!("invalid listing id '{arg}'"))?;

    let session = open_session(api.as_ref()).await?;
    if !session.is_authenticated() {
        log::info!("No credentials given; engagement will stay anonymous");
    }

    let (engagement, detail) = EngagementController::mount(
        listing_id,
        Arc::clone(&api),
        session,
        InFlightRegistry::new(),
    )
    .await
    .with_context(|| format!("listing {listing_id} not found"))?;

    let state = engagement.reconcile().await;
    engagement.unmount();

    let output = serde_json::json!({
        "listing": detail,
        "engagement": state,
        "share_url": routes::listing_page(&config.web_url, listing_id),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
