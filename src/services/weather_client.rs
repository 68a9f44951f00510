use serde_json::Value;

/// Thin pass-through client for the third-party weather provider, keyed by
/// API key and coordinate pair. The provider payload is returned unmodified.
/// No timeout, retry or circuit-breaking: a failure surfaces as one terse
/// gateway error at the handler boundary.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Current conditions at the given coordinates.
    pub async fn current(&self, lat: f64, lon: f64) -> Result<Value, reqwest::Error> {
        self.fetch("weather", lat, lon).await
    }

    /// Forecast for the given coordinates.
    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<Value, reqwest::Error> {
        self.fetch("forecast", lat, lon).await
    }

    async fn fetch(&self, endpoint: &str, lat: f64, lon: f64) -> Result<Value, reqwest::Error> {
        self.http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&[("lat", lat), ("lon", lon)])
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
