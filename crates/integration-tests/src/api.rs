//! Client for the site's JSON API.
//!
//! The API answers every request with HTTP 200 and reports the real outcome
//! in a `responseCode` field of the body, so callers assert on
//! [`ApiResponse::response_code`] rather than on the HTTP status.

use std::sync::Arc;

use automation_exercise_core::{Price, PriceError};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SuiteConfig;

/// Errors from the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("API response is not JSON ({source}): {body}")]
    Body {
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Body of every API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "responseCode")]
    pub response_code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub products: Vec<ApiProduct>,
    #[serde(default)]
    pub brands: Vec<ApiBrand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiProduct {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub brand: String,
    pub category: ApiCategory,
}

impl ApiProduct {
    /// # Errors
    ///
    /// Returns `PriceError` if the label is not a known currency and amount.
    pub fn parsed_price(&self) -> Result<Price, PriceError> {
        Price::parse(&self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiCategory {
    pub usertype: ApiUserType,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiUserType {
    pub usertype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiBrand {
    pub id: u32,
    pub brand: String,
}

/// HTTP client bound to the configured API root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<SuiteConfig>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: Arc<SuiteConfig>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.action_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// `GET productsList`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn products_list(&self) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("productsList")?;
        self.send(self.client.get(url)).await
    }

    /// `POST productsList`; the API rejects the method.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn post_products_list(&self) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("productsList")?;
        self.send(self.client.post(url)).await
    }

    /// `GET brandsList`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn brands_list(&self) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("brandsList")?;
        self.send(self.client.get(url)).await
    }

    /// `PUT brandsList`; the API rejects the method.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn put_brands_list(&self) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("brandsList")?;
        self.send(self.client.put(url)).await
    }

    /// `POST searchProduct`. Leaving out `term` omits the parameter.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn search_product(&self, term: Option<&str>) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("searchProduct")?;
        let form: Vec<(&str, &str)> = term.map(|t| ("search_product", t)).into_iter().collect();
        self.send(self.client.post(url).form(&form)).await
    }

    /// `POST verifyLogin`. Absent fields are omitted from the form.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn verify_login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("verifyLogin")?;
        let form: Vec<(&str, &str)> = [("email", email), ("password", password)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        self.send(self.client.post(url).form(&form)).await
    }

    /// `DELETE verifyLogin`; the API rejects the method.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn delete_verify_login(&self) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint("verifyLogin")?;
        self.send(self.client.delete(url)).await
    }

    fn endpoint(&self, name: &str) -> Result<Url, url::ParseError> {
        self.config.api_url(name)
    }

    #[instrument(skip_all)]
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;
        let parsed = parse_response(body)?;
        debug!(
            %url,
            http_status = status.as_u16(),
            response_code = parsed.response_code,
            "API response"
        );
        Ok(parsed)
    }
}

/// Parse a response body.
///
/// # Errors
///
/// Returns `ApiError::Body` with the raw body if it is not the expected JSON.
pub fn parse_response(body: String) -> Result<ApiResponse, ApiError> {
    match serde_json::from_str(&body) {
        Ok(parsed) => Ok(parsed),
        Err(source) => Err(ApiError::Body { body, source }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_products() {
        let body = r#"{"responseCode": 200, "products": [
            {"id": 1, "name": "Blue Top", "price": "Rs. 500", "brand": "Polo",
             "category": {"usertype": {"usertype": "Women"}, "category": "Tops"}}
        ]}"#;
        let parsed = parse_response(body.to_string()).unwrap();
        assert_eq!(parsed.response_code, 200);
        assert_eq!(parsed.products.len(), 1);

        let product = &parsed.products[0];
        assert_eq!(product.name, "Blue Top");
        assert_eq!(product.category.usertype.usertype, "Women");
        assert_eq!(product.parsed_price().unwrap().amount, Decimal::from(500));
        assert!(parsed.brands.is_empty());
    }

    #[test]
    fn test_parse_rejection() {
        let body = r#"{"responseCode": 405, "message": "This request method is not supported."}"#;
        let parsed = parse_response(body.to_string()).unwrap();
        assert_eq!(parsed.response_code, 405);
        assert_eq!(
            parsed.message.as_deref(),
            Some("This request method is not supported.")
        );
        assert!(parsed.products.is_empty());
    }

    #[test]
    fn test_parse_html_is_an_error() {
        let err = parse_response("<html>502</html>".to_string()).unwrap_err();
        assert!(matches!(err, ApiError::Body { ref body, .. } if body == "<html>502</html>"));
    }

    #[test]
    fn test_endpoints_join_api_root() {
        let client = ApiClient::new(Arc::new(SuiteConfig::default())).unwrap();
        assert_eq!(
            client.endpoint("verifyLogin").unwrap().as_str(),
            "https://automationexercise.com/api/verifyLogin"
        );
    }
}
