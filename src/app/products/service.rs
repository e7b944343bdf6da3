//! 产品 REST 服务

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use super::model::{Product, ProductPayload};
use crate::core::config::ApiConfig;
use crate::core::error::ApiError;

/// 与 `encodeURIComponent` 保留字符一致的编码集
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 产品资源的六个 REST 调用
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// GET {endpoint}
    async fn list(&self) -> Result<Vec<Product>, ApiError>;
    /// GET {endpoint}/search?name={term}
    async fn search(&self, name: &str) -> Result<Vec<Product>, ApiError>;
    /// GET {endpoint}/{id}
    async fn get(&self, id: i64) -> Result<Product, ApiError>;
    /// POST {endpoint}
    async fn create(&self, payload: &ProductPayload) -> Result<(), ApiError>;
    /// PUT {endpoint}/{id}
    async fn update(&self, id: i64, payload: &ProductPayload) -> Result<(), ApiError>;
    /// DELETE {endpoint}/{id}
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

pub fn search_path(endpoint: &str, term: &str) -> String {
    format!(
        "{}/search?name={}",
        endpoint,
        utf8_percent_encode(term, URI_COMPONENT)
    )
}

/// 基于 reqwest 的实现
#[derive(Clone)]
pub struct HttpProductService {
    client: Client,
    products_url: String,
}

impl HttpProductService {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            products_url: config.products_url(),
        })
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.products_url, id)
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<&ProductPayload>,
    ) -> Result<Response, ApiError> {
        debug!("{} {}", method, url);

        let mut request: RequestBuilder = self.client.request(method.clone(), &url);
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} 请求失败: {}", method, url, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} {} 返回 {}", method, url, status);
            return Err(ApiError::Status(status.as_u16()));
        }

        debug!("{} {} - {}", method, url, status);
        Ok(response)
    }
}

#[async_trait]
impl ProductApi for HttpProductService {
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.send(Method::GET, self.products_url.clone(), None).await?;
        Ok(response.json().await?)
    }

    async fn search(&self, name: &str) -> Result<Vec<Product>, ApiError> {
        let url = search_path(&self.products_url, name);
        let response = self.send(Method::GET, url, None).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: i64) -> Result<Product, ApiError> {
        let response = self.send(Method::GET, self.item_url(id), None).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        self.send(Method::POST, self.products_url.clone(), Some(payload))
            .await?;
        Ok(())
    }

    async fn update(&self, id: i64, payload: &ProductPayload) -> Result<(), ApiError> {
        self.send(Method::PUT, self.item_url(id), Some(payload)).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.send(Method::DELETE, self.item_url(id), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_path_encodes_like_uri_component() {
        assert_eq!(
            search_path("/api/products", "red widget"),
            "/api/products/search?name=red%20widget"
        );
        assert_eq!(
            search_path("/api/products", "a&b=c/d"),
            "/api/products/search?name=a%26b%3Dc%2Fd"
        );
        assert_eq!(
            search_path("/api/products", "it's-(ok)_*.~!"),
            "/api/products/search?name=it's-(ok)_*.~!"
        );
        assert_eq!(search_path("/api/products", "café"), "/api/products/search?name=caf%C3%A9");
    }

    #[test]
    fn test_service_urls() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9999/".to_string(),
            ..ApiConfig::default()
        };
        let service = HttpProductService::new(&config).unwrap();
        assert_eq!(service.products_url(), "http://127.0.0.1:9999/api/products");
        assert_eq!(service.item_url(7), "http://127.0.0.1:9999/api/products/7");
    }
}
