//! Raw scan payloads as delivered by the backend poll, and their validation

use serde::{Deserialize, Serialize};

use super::error::{ScanError, ScanResult};
use super::types::Product;

/// Poll response body. Both fields are optional on the wire so that a
/// malformed payload can be reported as `InvalidScan` instead of failing
/// deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl ScanPayload {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
        }
    }

    /// Turn the payload into a product, rejecting empty names and missing,
    /// negative or non-finite prices.
    pub fn validate(self) -> ScanResult<Product> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ScanError::InvalidScan {
                    reason: "missing product name".to_string(),
                })
            }
        };

        match self.price {
            Some(price) if price.is_finite() && price >= 0.0 => Ok(Product { name, price }),
            Some(price) => Err(ScanError::InvalidScan {
                reason: format!("invalid price {price} for '{name}'"),
            }),
            None => Err(ScanError::InvalidScan {
                reason: format!("missing price for '{name}'"),
            }),
        }
    }
}

impl TryFrom<ScanPayload> for Product {
    type Error = ScanError;

    fn try_from(payload: ScanPayload) -> ScanResult<Self> {
        payload.validate()
    }
}
