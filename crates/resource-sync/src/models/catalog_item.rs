//! Catalog Item entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::form::{FieldReader, FieldSpec, FieldWidget, FormFields};
use crate::kind::ResourceKind;
use crate::resource::Resource;

/// Categories the form offers, `(value, label)`
pub const CATEGORIES: &[(&str, &str)] = &[
    ("beauty", "Beauty"),
    ("fragrance", "Fragrance"),
    ("furniture", "Furniture"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {} cm", self.width, self.height, self.depth)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub rating: f64,
    pub comment: String,
    pub date: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogItem {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: u32,
    pub tags: Vec<String>,
    pub brand: Option<String>,
    pub sku: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub warranty_information: String,
    pub shipping_information: String,
    pub availability_status: String,
    pub reviews: Vec<Review>,
    pub return_policy: String,
    pub minimum_order_quantity: u32,
    pub images: Vec<String>,
    pub thumbnail: String,
}

impl Review {
    /// `4/5 by Jane: Great product!`
    pub fn summary(&self) -> String {
        format!("{}/5 by {}: {}", self.rating, self.reviewer_name, self.comment)
    }
}

impl CatalogItem {
    /// Price before the discount was applied
    pub fn original_price(&self) -> Option<f64> {
        if self.discount_percentage > 0.0 && self.discount_percentage < 100.0 {
            Some(self.price / (1.0 - self.discount_percentage / 100.0))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemDraft {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub discount_percentage: f64,
}

/// `Resource` binding for catalog items
pub struct CatalogItems;

impl Resource for CatalogItems {
    const KIND: ResourceKind = ResourceKind::CatalogItem;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title", FieldWidget::Text).required("Title is required"),
        FieldSpec::new("description", "Description", FieldWidget::TextArea)
            .required("Description is required"),
        FieldSpec::new("price", "Price", FieldWidget::Number).required("Price is required"),
        FieldSpec::new("category", "Category", FieldWidget::Select(CATEGORIES))
            .required("Category is required"),
        FieldSpec::new("discountPercentage", "Discount (%)", FieldWidget::Number)
            .required("Discount is required"),
    ];

    type Entity = CatalogItem;
    type Draft = CatalogItemDraft;

    fn entity_id(entity: &CatalogItem) -> u32 {
        entity.id
    }

    fn title(entity: &CatalogItem) -> String {
        entity.title.clone()
    }

    fn detail_rows(entity: &CatalogItem) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(brand) = &entity.brand {
            rows.push(("Brand", brand.clone()));
        }
        if let Some(original) = entity.original_price() {
            rows.push(("Original price", format!("{:.2}", original)));
        }
        rows.push(("Rating", entity.rating.to_string()));
        rows.push(("Stock", entity.stock.to_string()));
        rows.push(("Dimensions", entity.dimensions.to_string()));
        let texts = [
            ("SKU", &entity.sku),
            ("Availability", &entity.availability_status),
            ("Warranty", &entity.warranty_information),
            ("Shipping", &entity.shipping_information),
            ("Return policy", &entity.return_policy),
        ];
        rows.extend(
            texts
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(label, value)| (label, value.clone())),
        );
        if entity.minimum_order_quantity > 0 {
            rows.push(("Minimum order", entity.minimum_order_quantity.to_string()));
        }
        rows.extend(entity.images.iter().map(|url| ("Image", url.clone())));
        rows.extend(entity.reviews.iter().map(|review| ("Review", review.summary())));
        rows
    }

    fn to_form_fields(entity: &CatalogItem) -> FormFields {
        FormFields::new()
            .with("title", entity.title.as_str())
            .with("description", entity.description.as_str())
            .with("price", entity.price.to_string())
            .with("category", entity.category.as_str())
            .with("discountPercentage", entity.discount_percentage.to_string())
    }

    fn from_form_fields(
        fields: &FormFields,
        _previous: Option<&CatalogItem>,
    ) -> Result<CatalogItemDraft, ValidationErrors> {
        let mut reader = FieldReader::new(fields, Self::FIELDS);
        let draft = CatalogItemDraft {
            title: reader.text("title"),
            description: reader.text("description"),
            price: reader.number("price"),
            category: reader.text("category"),
            discount_percentage: reader.number("discountPercentage"),
        };
        reader.finish(draft)
    }
}
