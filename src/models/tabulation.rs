use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Service product category handled by the call center. Each category maps to
/// a fixed number of business days for the promise-date calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Cartao,
    Comercial,
    Habitacional,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Cartao => "cartao",
            ProductType::Comercial => "comercial",
            ProductType::Habitacional => "habitacional",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cartao" => Some(ProductType::Cartao),
            "comercial" => Some(ProductType::Comercial),
            "habitacional" => Some(ProductType::Habitacional),
            _ => None,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded attendance outcome. The promise date is computed server-side
/// when the tabulation is recorded and stored as `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tabulation {
    pub id: String,
    pub operator_id: String,
    pub product: ProductType,
    pub outcome: String,
    pub remarks: Option<String>,
    pub promise_date: String,
    pub created_at: String,
}

impl Tabulation {
    pub fn new(
        operator_id: String,
        product: ProductType,
        outcome: String,
        remarks: Option<String>,
        promise_date: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operator_id,
            product,
            outcome,
            remarks,
            promise_date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTabulationRequest {
    pub product: ProductType,
    pub outcome: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TabulationListResponse {
    pub tabulations: Vec<Tabulation>,
    pub pagination: crate::models::user::PaginationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_type_round_trip() {
        for s in ["cartao", "comercial", "habitacional"] {
            assert_eq!(ProductType::parse(s).unwrap().as_str(), s);
        }
        assert_eq!(ProductType::parse("consignado"), None);
    }

    #[test]
    fn product_type_serde_is_lowercase() {
        let json = serde_json::to_string(&ProductType::Cartao).unwrap();
        assert_eq!(json, "\"cartao\"");
        let back: ProductType = serde_json::from_str("\"habitacional\"").unwrap();
        assert_eq!(back, ProductType::Habitacional);
    }
}
