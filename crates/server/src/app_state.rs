use reqwest::Client;
use url::Url;

use crate::config::Settings;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) http: Client,
    pub(crate) upstream_url: Url,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            http,
            upstream_url: settings.upstream_url.clone(),
        })
    }
}
