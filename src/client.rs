use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;
use wreq::{Client, RequestBuilder, header};

use crate::config::CarrierConfig;
use crate::error::{CarrierError, Result};
use crate::label;
use crate::session::{Session, Token, WaybillId};
use crate::types::{COUNTRY_ID, County, Locality, LoginRequest, label_format};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const LOGIN_PATH: &str = "/LoginUser";
const COUNTIES_PATH: &str = "/Counties";
const LOCALITIES_PATH: &str = "/Localities";
const AWBS_PATH: &str = "/Awbs";
const AWB_DOCUMENTS_PATH: &str = "/AwbDocuments";

/// Keys checked, in order, for the waybill barcode when `/Awbs` answers
/// with an object instead of a bare value.
const WAYBILL_ID_KEYS: [&str; 4] = ["id", "Id", "BarCode", "barCode"];

/// Result of a successful [`CarrierClient::create_waybill`] call.
#[derive(Debug, Clone)]
pub struct CreatedWaybill {
    /// The caller's session with the new waybill recorded.
    pub session: Session,
    pub waybill_id: WaybillId,
    /// Full response payload from `/Awbs`.
    pub response: Value,
}

/// Client for the carrier's REST API.
///
/// The client holds no session state. Every operation borrows a [`Session`]
/// and the ones that change it return the updated value, so a failed call
/// leaves the caller's session untouched.
#[derive(Clone)]
pub struct CarrierClient {
    http: Client,
    config: CarrierConfig,
}

impl CarrierClient {
    pub fn new(config: CarrierConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Build a client from `CARGUS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(CarrierConfig::from_env()?)
    }

    pub fn config(&self) -> &CarrierConfig {
        &self.config
    }

    /// Authenticate and return `session` with the issued token.
    pub async fn login(
        &self,
        session: &Session,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        let body = LoginRequest {
            user_name: username,
            password,
        };
        let request = self
            .http
            .post(&self.config.endpoint(LOGIN_PATH))
            .header(SUBSCRIPTION_KEY_HEADER, self.config.subscription_key.as_str())
            .json(&body);

        let result = self.send(LOGIN_PATH, request).await.and_then(|text| {
            let token = unquote(&text);
            if token.is_empty() {
                return Err(CarrierError::InvalidResponse {
                    endpoint: LOGIN_PATH,
                    reason: "empty token".to_string(),
                });
            }
            Ok(Token::new(token))
        });

        match result {
            Ok(token) => {
                info!(user = username, token_len = token.as_str().len(), "login succeeded");
                Ok(session.with_token(token))
            }
            Err(e) => {
                warn!(user = username, error = %e, "login failed");
                Err(e)
            }
        }
    }

    pub async fn fetch_counties(&self, session: &Session) -> Result<Vec<County>> {
        self.try_fetch_counties(session)
            .await
            .inspect(|counties| debug!(count = counties.len(), "fetched counties"))
            .inspect_err(|e| warn!(error = %e, "fetching counties failed"))
    }

    pub async fn fetch_localities(
        &self,
        session: &Session,
        county_id: &str,
    ) -> Result<Vec<Locality>> {
        self.try_fetch_localities(session, county_id)
            .await
            .inspect(|localities| {
                debug!(county_id, count = localities.len(), "fetched localities")
            })
            .inspect_err(|e| warn!(county_id, error = %e, "fetching localities failed"))
    }

    /// Create a waybill from a payload in the service's AWB schema.
    ///
    /// The payload is sent as is; schema compliance is the caller's concern.
    pub async fn create_waybill<T>(&self, session: &Session, waybill: &T) -> Result<CreatedWaybill>
    where
        T: Serialize + ?Sized,
    {
        self.try_create_waybill(session, waybill)
            .await
            .inspect(|created| info!(waybill_id = %created.waybill_id, "waybill created"))
            .inspect_err(|e| warn!(error = %e, "creating waybill failed"))
    }

    /// Download the label for the session's waybill and save it as
    /// `<waybill_id>.pdf` in the configured output directory.
    ///
    /// Returns the path written; with the default configuration this is the
    /// bare file name in the working directory.
    pub async fn fetch_label_document(&self, session: &Session) -> Result<PathBuf> {
        self.try_fetch_label_document(session)
            .await
            .inspect(|path| info!(path = %path.display(), "label saved"))
            .inspect_err(|e| warn!(error = %e, "fetching label document failed"))
    }

    async fn try_fetch_counties(&self, session: &Session) -> Result<Vec<County>> {
        let token = require_token(session)?;
        let country = COUNTRY_ID.to_string();
        let url = self.url(COUNTIES_PATH, &[("countryId", country.as_str())])?;
        let text = self.send(COUNTIES_PATH, self.authorized_get(&url, token)).await?;
        parse_json(COUNTIES_PATH, &text)
    }

    async fn try_fetch_localities(
        &self,
        session: &Session,
        county_id: &str,
    ) -> Result<Vec<Locality>> {
        let token = require_token(session)?;
        let country = COUNTRY_ID.to_string();
        let url = self.url(
            LOCALITIES_PATH,
            &[("countryId", country.as_str()), ("countyId", county_id)],
        )?;
        let text = self.send(LOCALITIES_PATH, self.authorized_get(&url, token)).await?;
        parse_json(LOCALITIES_PATH, &text)
    }

    async fn try_create_waybill<T>(&self, session: &Session, waybill: &T) -> Result<CreatedWaybill>
    where
        T: Serialize + ?Sized,
    {
        let token = require_token(session)?;
        let request = self
            .http
            .post(&self.config.endpoint(AWBS_PATH))
            .header(SUBSCRIPTION_KEY_HEADER, self.config.subscription_key.as_str())
            .header(header::AUTHORIZATION, token.bearer())
            .json(waybill);
        let text = self.send(AWBS_PATH, request).await?;

        let response = parse_lenient(&text);
        let waybill_id =
            waybill_id_from(&response).ok_or_else(|| CarrierError::InvalidResponse {
                endpoint: AWBS_PATH,
                reason: format!("no waybill id in {}", response),
            })?;
        // The id names the label file later on
        if !waybill_id.is_plain_file_stem() {
            return Err(CarrierError::InvalidResponse {
                endpoint: AWBS_PATH,
                reason: format!("waybill id {:?} is not a plain file name", waybill_id.as_str()),
            });
        }
        let session = session
            .with_waybill(waybill_id.clone())
            .ok_or(CarrierError::Unauthenticated)?;

        Ok(CreatedWaybill {
            session,
            waybill_id,
            response,
        })
    }

    async fn try_fetch_label_document(&self, session: &Session) -> Result<PathBuf> {
        let token = require_token(session)?;
        let waybill_id = session.waybill_id().ok_or(CarrierError::MissingWaybill)?;
        let url = self.url(
            AWB_DOCUMENTS_PATH,
            &[
                ("barCodes", waybill_id.as_str()),
                ("type", label_format::TYPE_PDF),
                ("format", label_format::FORMAT_A4_SINGLE),
            ],
        )?;
        let text = self
            .send(AWB_DOCUMENTS_PATH, self.authorized_get(&url, token))
            .await?;

        let bytes = label::decode_document(&text)?;
        label::write_document(&self.config.output_dir, waybill_id, &bytes).await
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        Ok(Url::parse_with_params(&self.config.endpoint(path), query)?)
    }

    fn authorized_get(&self, url: &Url, token: &Token) -> RequestBuilder {
        self.http
            .get(url.as_str())
            .header(SUBSCRIPTION_KEY_HEADER, self.config.subscription_key.as_str())
            .header(header::AUTHORIZATION, token.bearer())
    }

    /// Send a request and return the body text of a success response.
    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CarrierError::Status {
                endpoint,
                status: status.as_u16(),
                body: parse_lenient(&text),
            });
        }
        Ok(text)
    }
}

fn require_token(session: &Session) -> Result<&Token> {
    session.token().ok_or(CarrierError::Unauthenticated)
}

fn parse_json<T: serde::de::DeserializeOwned>(endpoint: &'static str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| CarrierError::InvalidResponse {
        endpoint,
        reason: e.to_string(),
    })
}

/// Parse a body as JSON, falling back to a string value for plain text.
fn parse_lenient(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Strip a JSON string wrapper if present, otherwise return the trimmed text.
pub(crate) fn unquote(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.starts_with('"')
        && let Ok(Value::String(inner)) = serde_json::from_str(trimmed)
    {
        return inner;
    }
    trimmed.to_string()
}

fn waybill_id_from(response: &Value) -> Option<WaybillId> {
    match response {
        Value::String(s) if !s.trim().is_empty() => Some(WaybillId::new(s.trim())),
        // Barcodes are integers; anything parsed as a float lost digits
        Value::Number(n) if !n.is_f64() => Some(WaybillId::new(n.to_string())),
        Value::Object(map) => WAYBILL_ID_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|v| match v {
                Value::String(_) | Value::Number(_) => waybill_id_from(v),
                _ => None,
            }),
        _ => None,
    }
}
