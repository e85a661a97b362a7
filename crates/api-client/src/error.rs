use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(
        "Shopify credentials not configured. Please set SHOPIFY_STORE_DOMAIN and SHOPIFY_ADMIN_API_TOKEN"
    )]
    NotConfigured,

    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("The GraphQL query failed: {0}")]
    GraphQl(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
