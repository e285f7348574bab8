use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::validation::{
    at_least, normalize_slug, optional_text, required_number, required_text, ValidationError,
};

/// Variant categories a product can offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Color,
    Storage,
    Finish,
}

impl VariantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Color => "color",
            VariantKind::Storage => "storage",
            VariantKind::Finish => "finish",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "color" => Some(VariantKind::Color),
            "storage" => Some(VariantKind::Storage),
            "finish" => Some(VariantKind::Finish),
            _ => None,
        }
    }
}

/// One selectable option, embedded in its product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    #[serde(rename = "type")]
    pub kind: VariantKind,
    pub label: String,
    pub value: String,
    /// Signed delta applied to the product price when this option is picked
    pub price_modifier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variants {
    #[serde(default, alias = "color")]
    pub colors: Vec<VariantOption>,
    #[serde(default)]
    pub storage: Vec<VariantOption>,
    #[serde(default)]
    pub finish: Vec<VariantOption>,
}

impl Variants {
    pub fn len(&self) -> usize {
        self.colors.len() + self.storage.len() + self.finish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Catalog product as stored and served
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub base_variant: String,
    pub variants: Variants,
    pub mrp: f64,
    pub price: f64,
    pub image: String,
    pub images: Vec<String>,
    /// Ids of the plans owned by this product, in display order
    pub emi_plans: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Full-document replacement. Identity, plan list and creation time survive.
    pub fn replace_with(&mut self, new: NewProduct) {
        self.name = new.name;
        self.slug = new.slug;
        self.base_variant = new.base_variant;
        self.variants = new.variants;
        self.mrp = new.mrp;
        self.price = new.price;
        self.image = new.image;
        self.images = new.images;
        self.updated_at = Utc::now();
    }
}

/// Raw write payload for a variant option. Everything is optional so that
/// missing fields surface as a `ValidationError` rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionInput {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
    pub price_modifier: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantsInput {
    #[serde(default, alias = "color")]
    pub colors: Vec<VariantOptionInput>,
    #[serde(default)]
    pub storage: Vec<VariantOptionInput>,
    #[serde(default)]
    pub finish: Vec<VariantOptionInput>,
}

/// Raw write payload for a product (create, replace or field update)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub base_variant: Option<String>,
    pub variants: Option<VariantsInput>,
    pub mrp: Option<f64>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ProductInput {
    /// Fill every field the caller left out from the stored product.
    pub fn overlay(self, existing: &Product) -> ProductInput {
        let base = ProductInput::from(existing);
        ProductInput {
            name: self.name.or(base.name),
            slug: self.slug.or(base.slug),
            base_variant: self.base_variant.or(base.base_variant),
            variants: self.variants.or(base.variants),
            mrp: self.mrp.or(base.mrp),
            price: self.price.or(base.price),
            image: self.image.or(base.image),
            images: self.images.or(base.images),
        }
    }

    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let name = required_text("name", self.name, "Product name is required")?;
        let slug = required_text("slug", self.slug, "Product slug is required")?;
        let base_variant =
            required_text("baseVariant", self.base_variant, "Base variant is required")?;

        let variants = validate_variants(self.variants.unwrap_or_default())?;

        let mrp = required_number("mrp", self.mrp, "MRP is required")?;
        let mrp = at_least("mrp", mrp, 0.0, "MRP cannot be negative")?;
        let price = required_number("price", self.price, "Price is required")?;
        let price = at_least("price", price, 0.0, "Price cannot be negative")?;

        let image = required_text("image", self.image, "Product image is required")?;
        let images = self
            .images
            .unwrap_or_default()
            .into_iter()
            .filter_map(|i| optional_text(Some(i)))
            .collect();

        Ok(NewProduct {
            name,
            slug: normalize_slug(&slug),
            base_variant,
            variants,
            mrp,
            price,
            image,
            images,
        })
    }
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        let options = |list: &[VariantOption]| -> Vec<VariantOptionInput> {
            list.iter()
                .map(|o| VariantOptionInput {
                    kind: Some(o.kind.as_str().to_string()),
                    label: Some(o.label.clone()),
                    value: Some(o.value.clone()),
                    price_modifier: Some(o.price_modifier),
                    image: o.image.clone(),
                })
                .collect()
        };

        ProductInput {
            name: Some(product.name.clone()),
            slug: Some(product.slug.clone()),
            base_variant: Some(product.base_variant.clone()),
            variants: Some(VariantsInput {
                colors: options(product.variants.colors.as_slice()),
                storage: options(product.variants.storage.as_slice()),
                finish: options(product.variants.finish.as_slice()),
            }),
            mrp: Some(product.mrp),
            price: Some(product.price),
            image: Some(product.image.clone()),
            images: Some(product.images.clone()),
        }
    }
}

fn validate_variants(input: VariantsInput) -> Result<Variants, ValidationError> {
    let list = |group: &str, options: Vec<VariantOptionInput>| {
        options
            .into_iter()
            .enumerate()
            .map(|(i, option)| validate_option(&format!("variants.{}[{}]", group, i), option))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(Variants {
        colors: list("colors", input.colors)?,
        storage: list("storage", input.storage)?,
        finish: list("finish", input.finish)?,
    })
}

fn validate_option(
    path: &str,
    input: VariantOptionInput,
) -> Result<VariantOption, ValidationError> {
    let type_field = format!("{}.type", path);
    let raw_kind = required_text(&type_field, input.kind, "Variant type is required")?;
    let kind = VariantKind::parse(&raw_kind).ok_or_else(|| {
        ValidationError::new(
            &type_field,
            format!("'{}' is not a valid variant type (color, storage, finish)", raw_kind),
        )
    })?;

    let label = required_text(&format!("{}.label", path), input.label, "Variant label is required")?;
    let value = required_text(&format!("{}.value", path), input.value, "Variant value is required")?;

    let price_modifier = required_number(
        &format!("{}.priceModifier", path),
        Some(input.price_modifier.unwrap_or(0.0)),
        "Price modifier is required",
    )?;

    Ok(VariantOption {
        kind,
        label,
        value,
        price_modifier,
        image: optional_text(input.image),
    })
}

/// A product payload that passed validation; the only way to build one is
/// [`ProductInput::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    slug: String,
    base_variant: String,
    variants: Variants,
    mrp: f64,
    price: f64,
    image: String,
    images: Vec<String>,
}

impl NewProduct {
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn into_product(self) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: self.name,
            slug: self.slug,
            base_variant: self.base_variant,
            variants: self.variants,
            mrp: self.mrp,
            price: self.price,
            image: self.image,
            images: self.images,
            emi_plans: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn iphone_input() -> ProductInput {
        serde_json::from_value(json!({
            "name": "  Apple iPhone 17 Pro ",
            "slug": " IPhone-17-Pro ",
            "baseVariant": "Silver, 256GB",
            "variants": {
                "colors": [
                    { "type": "color", "label": "Silver", "value": "silver", "image": "/img/silver.jpg" }
                ],
                "storage": [
                    { "type": "storage", "label": "128 GB", "value": "128gb", "priceModifier": -10000 }
                ]
            },
            "mrp": 134900,
            "price": 129900,
            "image": "/img/silver.jpg"
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let product = iphone_input().validate().unwrap().into_product();

        assert_eq!(product.name, "Apple iPhone 17 Pro");
        assert_eq!(product.slug, "iphone-17-pro");
        assert_eq!(product.variants.colors[0].price_modifier, 0.0);
        assert_eq!(product.variants.storage[0].price_modifier, -10000.0);
        assert!(product.variants.finish.is_empty());
        assert!(product.images.is_empty());
        assert!(product.emi_plans.is_empty());
    }

    #[test]
    fn test_missing_image_is_rejected() {
        let mut input = iphone_input();
        input.image = None;

        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "image");
        assert_eq!(err.message, "Product image is required");
    }

    #[test]
    fn test_negative_prices_are_rejected() {
        let mut input = iphone_input();
        input.mrp = Some(-1.0);
        assert_eq!(input.validate().unwrap_err().field, "mrp");

        let mut input = iphone_input();
        input.price = Some(-0.5);
        assert_eq!(input.validate().unwrap_err().field, "price");
    }

    #[test]
    fn test_blank_images_are_dropped() {
        let mut input = iphone_input();
        input.images = Some(vec![" /img/back.jpg ".into(), "".into(), "   ".into()]);

        let product = input.validate().unwrap().into_product();
        assert_eq!(product.images, vec!["/img/back.jpg"]);
    }

    #[test]
    fn test_price_above_mrp_is_allowed() {
        let mut input = iphone_input();
        input.price = Some(200000.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_unknown_variant_type_names_the_field() {
        let mut input = iphone_input();
        input.variants.as_mut().unwrap().storage[0].kind = Some("size".into());

        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "variants.storage[0].type");
    }

    #[test]
    fn test_color_alias_is_accepted() {
        let input: ProductInput = serde_json::from_value(json!({
            "variants": { "color": [{ "type": "color", "label": "Black", "value": "black" }] }
        }))
        .unwrap();

        assert_eq!(input.variants.unwrap().colors.len(), 1);
    }

    #[test]
    fn test_overlay_keeps_stored_fields() {
        let stored = iphone_input().validate().unwrap().into_product();
        let patch = ProductInput {
            price: Some(119900.0),
            ..Default::default()
        };

        let merged = patch.overlay(&stored).validate().unwrap();
        let mut updated = stored.clone();
        updated.replace_with(merged);

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.price, 119900.0);
        assert_eq!(updated.name, stored.name);
        assert_eq!(updated.variants, stored.variants);
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = iphone_input().validate().unwrap().into_product();
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["baseVariant"], "Silver, 256GB");
        assert_eq!(value["variants"]["colors"][0]["type"], "color");
        assert_eq!(value["variants"]["storage"][0]["priceModifier"], -10000.0);
        assert!(value["emiPlans"].as_array().unwrap().is_empty());
    }
}
