//! openrouteservice HTTP adapter for duration matrices and directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProviderError;
use crate::route::FullRoute;
use crate::traits::{DirectionsProvider, DistanceMatrixProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: None,
            profile: "driving-car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v2/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        );

        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, key);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json()?;
        if let Some(error) = body.get("error") {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error.to_string(),
            });
        }

        Ok(body)
    }
}

impl DistanceMatrixProvider for OrsClient {
    fn matrix_for(&self, coordinates: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, ProviderError> {
        if coordinates.is_empty() {
            return Ok(Vec::new());
        }

        let body = MatrixRequest {
            locations: coordinates.iter().map(|&(lon, lat)| [lon, lat]).collect(),
            metrics: &["duration"],
        };
        let raw = self.post(&format!("matrix/{}", self.config.profile), &body)?;
        let response: MatrixResponse = serde_json::from_value(raw)
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;

        let durations = response.durations.ok_or_else(|| {
            ProviderError::MalformedResponse("response has no durations".to_string())
        })?;

        durations
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, value)| {
                        value.ok_or_else(|| {
                            ProviderError::MalformedResponse(format!(
                                "no route between locations {} and {}",
                                i, j
                            ))
                        })
                    })
                    .collect::<Result<Vec<f64>, ProviderError>>()
            })
            .collect()
    }
}

impl DirectionsProvider for OrsClient {
    fn directions_for(&self, coordinates: &[(f64, f64)]) -> Result<FullRoute, ProviderError> {
        if coordinates.len() < 2 {
            return Err(ProviderError::MalformedResponse(format!(
                "directions need at least 2 coordinates, got {}",
                coordinates.len()
            )));
        }

        let body = DirectionsRequest {
            coordinates: coordinates.iter().map(|&(lon, lat)| [lon, lat]).collect(),
        };
        self.post(
            &format!("directions/{}/geojson", self.config.profile),
            &body,
        )
        .map(FullRoute::new)
    }
}

#[derive(Debug, Serialize)]
struct MatrixRequest {
    locations: Vec<[f64; 2]>,
    metrics: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}
