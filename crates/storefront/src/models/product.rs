//! Catalog product.

use serde::{Deserialize, Serialize};

use scooter_shop_core::{Price, ProductCode, ProductId};

/// A product in the catalog.
///
/// Nothing here enforces uniqueness of `id` or `code` beyond what the code
/// generator guarantees. Products written before codes existed have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ProductCode>,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "descripcion")]
    pub description: String,
    /// Price in whole pesos.
    #[serde(alias = "precio")]
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, alias = "categoria")]
    pub category: String,
    #[serde(default, alias = "marca")]
    pub brand: String,
    /// Image URL or inline `data:` URI.
    #[serde(default, alias = "img")]
    pub image: String,
}

impl Product {
    /// The product code for display, `-` when it has none.
    #[must_use]
    pub fn code_label(&self) -> &str {
        self.code.as_ref().map_or("-", ProductCode::as_str)
    }

    /// Returns `true` if the image is embedded as a `data:` URI.
    #[must_use]
    pub fn has_inline_image(&self) -> bool {
        self.image.starts_with("data:")
    }

    /// Returns `true` if at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_spanish_field_names() {
        let json = r#"{
            "id": 1,
            "code": "ACC-0001",
            "nombre": "Acelerador pulgar",
            "precio": 12990,
            "stock": 15,
            "img": "data:image/svg+xml;base64,AAAA"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Acelerador pulgar");
        assert_eq!(product.price, Price::new(12_990));
        assert!(product.has_inline_image());
        assert!(product.in_stock());
        assert!(product.brand.is_empty());
        assert_eq!(product.code.unwrap().as_str(), "ACC-0001");
    }

    #[test]
    fn test_reads_uncoded_products_with_large_ids() {
        let json = r#"{"id":1717171717171,"nombre":"Faro LED + Bocina","precio":14990,"stock":20,"img":""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1_717_171_717_171));
        assert!(product.code.is_none());

        let written = serde_json::to_string(&product).unwrap();
        assert!(!written.contains("code"));
    }
}
