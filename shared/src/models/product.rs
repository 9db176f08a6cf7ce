//! Product Model
//!
//! Affiliate gear shown in the shop. Only the admin creates or edits these.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Shop category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    Featured,
    Batteries,
    Inverters,
    ChargeControllers,
    SolarPanels,
    SolarRacks,
    MiniSplits,
    SolarGenerators,
    WaterHeaters,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 9] = [
        Self::Featured,
        Self::Batteries,
        Self::Inverters,
        Self::ChargeControllers,
        Self::SolarPanels,
        Self::SolarRacks,
        Self::MiniSplits,
        Self::SolarGenerators,
        Self::WaterHeaters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Batteries => "batteries",
            Self::Inverters => "inverters",
            Self::ChargeControllers => "charge-controllers",
            Self::SolarPanels => "solar-panels",
            Self::SolarRacks => "solar-racks",
            Self::MiniSplits => "mini-splits",
            Self::SolarGenerators => "solar-generators",
            Self::WaterHeaters => "water-heaters",
        }
    }

    /// Human readable tab label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Batteries => "Batteries",
            Self::Inverters => "Inverters",
            Self::ChargeControllers => "Charge Controllers",
            Self::SolarPanels => "Solar Panels",
            Self::SolarRacks => "Solar Racks",
            Self::MiniSplits => "Mini Splits",
            Self::SolarGenerators => "Solar Generators",
            Self::WaterHeaters => "Water Heaters",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ModelError::invalid("category", format!("unknown category '{s}'")))
    }
}

/// Label/value row of a product's specifications table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub label: String,
    pub value: String,
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    /// Outbound affiliate URL
    pub link: String,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
    pub category: ProductCategory,
    #[serde(default, deserialize_with = "nullable")]
    pub featured: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub highlights: Vec<String>,
    /// Lower sorts first; absent sorts after every explicit value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub specs: Vec<ProductSpec>,
}

/// Create product payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default)]
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    pub link: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
    pub category: ProductCategory,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub specs: Vec<ProductSpec>,
}

impl ProductCreate {
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        if self.link.trim().is_empty() {
            return Err(ModelError::MissingField("link"));
        }
        Ok(())
    }

    /// Attach a server-assigned id.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            short_description: self.short_description,
            price: self.price,
            original_price: self.original_price,
            coupon_code: self.coupon_code,
            discount: self.discount,
            link: self.link,
            thumbnail: self.thumbnail,
            gallery_images: self.gallery_images,
            category: self.category,
            featured: self.featured,
            highlights: self.highlights,
            sort_order: self.sort_order,
            specs: self.specs,
        }
    }
}

/// Update product payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specs: Option<Vec<ProductSpec>>,
}

impl ProductUpdate {
    pub fn validate(&self) -> ModelResult<()> {
        if matches!(self.name.as_deref(), Some(n) if n.trim().is_empty()) {
            return Err(ModelError::MissingField("name"));
        }
        if matches!(self.link.as_deref(), Some(l) if l.trim().is_empty()) {
            return Err(ModelError::MissingField("link"));
        }
        Ok(())
    }

    /// Merge this patch into `product`.
    pub fn apply_to(&self, product: &mut Product) {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(v) = &self.$field { product.$field = v.clone(); })*
            };
        }
        macro_rules! merge_opt {
            ($($field:ident),*) => {
                $(if self.$field.is_some() { product.$field = self.$field.clone(); })*
            };
        }
        merge!(name, description, price, link, thumbnail, category, featured, highlights, specs);
        merge_opt!(short_description, original_price, coupon_code, discount, gallery_images, sort_order);
    }
}

/// Featured products shown on the home page
pub const HOMEPAGE_FEATURED_PRODUCTS: usize = 6;

/// Sort for display: ascending `sort_order`, unordered items last.
///
/// The sort is stable, so ties keep their incoming order.
pub fn sort_for_display(products: &mut [Product]) {
    products.sort_by_key(|p| (p.sort_order.is_none(), p.sort_order.unwrap_or_default()));
}

/// Products shown under `category`, in display order.
///
/// The `featured` tab lists every product flagged as featured, whatever its
/// own category is.
pub fn filter_by_category(products: &[Product], category: ProductCategory) -> Vec<Product> {
    let mut selected: Vec<Product> = products
        .iter()
        .filter(|p| match category {
            ProductCategory::Featured => p.featured,
            other => p.category == other,
        })
        .cloned()
        .collect();
    sort_for_display(&mut selected);
    selected
}

/// Treat an explicit JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, featured: bool, sort_order: Option<i64>) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: String::new(),
            short_description: None,
            price: "$10".into(),
            original_price: None,
            coupon_code: None,
            discount: None,
            link: "https://example.com".into(),
            thumbnail: String::new(),
            gallery_images: None,
            category: ProductCategory::Batteries,
            featured,
            highlights: vec![],
            sort_order,
            specs: vec![],
        }
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_value(ProductCategory::ChargeControllers).unwrap(),
            json!("charge-controllers")
        );
        assert_eq!(
            "mini-splits".parse::<ProductCategory>().unwrap(),
            ProductCategory::MiniSplits
        );
        assert!("toasters".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_featured_filter_sorted_with_unordered_last() {
        let products = vec![
            product("a", true, None),
            product("b", false, Some(0)),
            product("c", true, Some(5)),
            product("d", true, Some(-1)),
            product("e", true, None),
        ];
        let ids: Vec<_> = filter_by_category(&products, ProductCategory::Featured)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["d", "c", "a", "e"]);
    }

    #[test]
    fn test_category_filter_matches_category() {
        let mut inverter = product("inv", false, None);
        inverter.category = ProductCategory::Inverters;
        let products = vec![product("bat", false, None), inverter];
        let selected = filter_by_category(&products, ProductCategory::Inverters);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "inv");
    }

    #[test]
    fn test_null_lists_are_empty() {
        let parsed: Product = serde_json::from_value(json!({
            "id": "p1",
            "name": "Battery",
            "link": "https://example.com",
            "category": "batteries",
            "highlights": null,
            "featured": null
        }))
        .unwrap();
        assert!(parsed.highlights.is_empty());
        assert!(!parsed.featured);
    }

    #[test]
    fn test_update_merges_present_fields() {
        let mut p = product("p1", false, Some(3));
        ProductUpdate {
            price: Some("$8".into()),
            featured: Some(true),
            ..Default::default()
        }
        .apply_to(&mut p);
        assert_eq!(p.price, "$8");
        assert!(p.featured);
        assert_eq!(p.sort_order, Some(3));
    }
}
