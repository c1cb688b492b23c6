use std::{sync::Arc, time::Duration};

use crate::{
    cache::{HttpRegistry, LicenseCache},
    config::Config,
};

pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub cache: LicenseCache<HttpRegistry>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let cache = LicenseCache::new(HttpRegistry::new(
            http.clone(),
            config.registry_url.clone(),
        ));

        // warm start; a failure here just means the first request refreshes
        cache.refresh().await;

        Arc::new(Self {
            config,
            http,
            cache,
        })
    }
}
