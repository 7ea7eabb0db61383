use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures::{stream, StreamExt, TryStreamExt};
use log::{debug, info};
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::image::cache_busted_url;
use crate::models::{Card, CoffeeRecord};
use crate::request::{build_client, parse_successful_response, HttpError};

/// How many cards of a showcase are requested at the same time
pub const SHOWCASE_CONCURRENCY: usize = 4;

/// Anything that can hand out showcase cards
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Load one card. Every call is independent of every other call,
    /// there is no retry and no partially filled card
    async fn load_card(&self) -> Result<Card, HttpError>;
}

pub struct CardLoader {
    pub client: Arc<Client>,
    pub card_url: Url,
    pub image_url: String,
}

impl CardLoader {
    pub fn new(config: &Config) -> Result<Self, HttpError> {
        let client = build_client(config)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    pub fn with_client(client: Arc<Client>, config: &Config) -> Self {
        Self {
            client,
            card_url: config.card_url.clone(),
            image_url: config.image_url.clone(),
        }
    }
}

#[async_trait]
impl CardSource for CardLoader {
    async fn load_card(&self) -> Result<Card, HttpError> {
        debug!("Fetching a random coffee from {}", self.card_url);
        let response = self.client.get(self.card_url.clone()).send().await?;
        let record = parse_successful_response::<CoffeeRecord>(response).await?;
        let image_src = cache_busted_url(&self.image_url, Utc::now());
        debug!("Loaded coffee {} ({})", record.id, record.blend_name);
        Ok(Card::from_record(record, image_src))
    }
}

/// Load a card from the public coffee api
pub async fn load_card() -> Result<Card, HttpError> {
    CardLoader::new(&Config::default())?.load_card().await
}

/// Load `count` cards, keeping them in request order. The first failure
/// fails the whole showcase
pub async fn load_showcase(
    source: &dyn CardSource,
    count: usize,
) -> Result<Vec<Card>, HttpError> {
    info!("Loading a showcase of {} cards", count);
    stream::iter(0..count)
        .map(move |_| source.load_card())
        .buffered(SHOWCASE_CONCURRENCY)
        .try_collect()
        .await
}
