use crate::adapters::unit_file::{parse_unit_file, UnitOption};
use crate::domain::model::{MachineState, UnitStatus};
use crate::domain::ports::{ConfigProvider, FleetClient};
use crate::utils::error::{ControllerError, FleetError, Result};
use crate::utils::validation::{validate_fleet_endpoint, validate_timeout_secs, Validate};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_FLEET_ENDPOINT: &str = "http://127.0.0.1:49153";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const STATE_LOADED: &str = "loaded";
const STATE_LAUNCHED: &str = "launched";

/// Connection settings for [`HttpFleetClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
}

/// Raw `FLEET_ENDPOINT` / `FLEET_TIMEOUT_SECS` values, neither parsed nor
/// validated, so a higher configuration layer can still replace them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetEnv {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<String>,
}

impl FleetEnv {
    pub fn read() -> Self {
        Self {
            endpoint: env::var("FLEET_ENDPOINT").ok(),
            timeout_secs: env::var("FLEET_TIMEOUT_SECS").ok(),
        }
    }

    pub fn parsed_timeout_secs(&self) -> Result<Option<u64>> {
        self.timeout_secs
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ControllerError::InvalidConfigValueError {
                        field: "FLEET_TIMEOUT_SECS".to_string(),
                        value: raw.to_string(),
                        reason: format!("not a number of seconds: {}", e),
                    })
            })
            .transpose()
    }
}

impl FleetSettings {
    /// 從環境變數讀取 (FLEET_ENDPOINT, FLEET_TIMEOUT_SECS)，缺少時使用預設值
    pub fn from_env() -> Result<Self> {
        let env = FleetEnv::read();
        let settings = Self {
            endpoint: env
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_FLEET_ENDPOINT.to_string()),
            timeout_secs: env.parsed_timeout_secs()?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            endpoint: config.fleet_endpoint().to_string(),
            timeout_secs: config.timeout_secs(),
        }
    }
}

impl Validate for FleetSettings {
    fn validate(&self) -> Result<()> {
        validate_fleet_endpoint("fleet_endpoint", &self.endpoint)?;
        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DesiredStateRequest<'a> {
    desired_state: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<UnitOption>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FleetUnit {
    name: String,
    #[serde(default)]
    current_state: String,
    #[serde(default)]
    desired_state: String,
    #[serde(default, rename = "machineID")]
    machine_id: String,
}

#[derive(Deserialize)]
struct StatePage {
    #[serde(default)]
    states: Vec<MachineState>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`FleetClient`] speaking fleet's v1 HTTP API.
#[derive(Debug, Clone)]
pub struct HttpFleetClient {
    client: Client,
    endpoint: Url,
}

impl HttpFleetClient {
    pub fn new(settings: &FleetSettings) -> std::result::Result<Self, FleetError> {
        let invalid = |reason: String| FleetError::InvalidEndpoint {
            endpoint: settings.endpoint.clone(),
            reason,
        };

        let endpoint = Url::parse(&settings.endpoint).map_err(|e| invalid(e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(invalid("endpoint cannot carry a path".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client, endpoint })
    }

    fn api_url(&self, segments: &[&str]) -> std::result::Result<Url, FleetError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| FleetError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                reason: "endpoint cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["fleet", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn unit_url(&self, name: &str) -> std::result::Result<Url, FleetError> {
        self.api_url(&["units", name])
    }

    async fn set_desired_state(
        &self,
        name: &str,
        body: &DesiredStateRequest<'_>,
    ) -> std::result::Result<(), FleetError> {
        let url = self.unit_url(name)?;
        tracing::debug!("PUT {} desiredState={}", url, body.desired_state);

        let response = self.client.put(url).json(body).send().await?;
        check_response(name, response).await?;
        Ok(())
    }
}

async fn check_response(name: &str, response: Response) -> std::result::Result<Response, FleetError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(FleetError::UnitNotFound(name.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);

    Err(FleetError::UnexpectedResponse {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FleetClient for HttpFleetClient {
    async fn submit(&self, name: &str, content: &str) -> std::result::Result<(), FleetError> {
        let options = parse_unit_file(name, content)?;
        let body = DesiredStateRequest {
            desired_state: STATE_LOADED,
            options: Some(options),
        };
        self.set_desired_state(name, &body).await
    }

    async fn start(&self, name: &str) -> std::result::Result<(), FleetError> {
        let body = DesiredStateRequest {
            desired_state: STATE_LAUNCHED,
            options: None,
        };
        self.set_desired_state(name, &body).await
    }

    async fn stop(&self, name: &str) -> std::result::Result<(), FleetError> {
        let body = DesiredStateRequest {
            desired_state: STATE_LOADED,
            options: None,
        };
        self.set_desired_state(name, &body).await
    }

    async fn destroy(&self, name: &str) -> std::result::Result<(), FleetError> {
        let url = self.unit_url(name)?;
        tracing::debug!("DELETE {}", url);

        let response = self.client.delete(url).send().await?;
        check_response(name, response).await?;
        Ok(())
    }

    async fn get_status(&self, name: &str) -> std::result::Result<UnitStatus, FleetError> {
        let url = self.unit_url(name)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let unit: FleetUnit = check_response(name, response).await?.json().await?;

        let mut state_url = self.api_url(&["state"])?;
        state_url.query_pairs_mut().append_pair("unitName", name);
        tracing::debug!("GET {}", state_url);
        let response = self.client.get(state_url).send().await?;
        let page: StatePage = check_response(name, response).await?.json().await?;

        Ok(UnitStatus {
            name: unit.name,
            current_state: unit.current_state,
            desired_state: unit.desired_state,
            machine_id: unit.machine_id,
            machines: page.states,
        })
    }
}
