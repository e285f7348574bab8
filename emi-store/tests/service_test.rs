use emi_catalog::{EmiPlanInput, ProductInput};
use emi_core::{CatalogService, CoreError};
use emi_store::Repositories;
use serde_json::json;
use uuid::Uuid;

fn product_input(name: &str, slug: &str) -> ProductInput {
    serde_json::from_value(json!({
        "name": name,
        "slug": slug,
        "baseVariant": "Silver, 256GB",
        "variants": {
            "colors": [{ "type": "color", "label": "Silver", "value": "silver" }],
            "storage": [{ "type": "storage", "label": "256 GB", "value": "256gb" }]
        },
        "mrp": 134900,
        "price": 129900,
        "image": "/images/products/iphone-silver.jpg"
    }))
    .unwrap()
}

fn plan_input(monthly: f64, tenure: f64, rate: f64) -> EmiPlanInput {
    EmiPlanInput {
        monthly_amount: Some(monthly),
        tenure_months: Some(tenure),
        interest_rate: Some(rate),
        cashback: None,
    }
}

fn service() -> CatalogService {
    Repositories::in_memory().service()
}

#[tokio::test]
async fn test_duplicate_slug_names_slug() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let err = service
        .create_product(product_input("Another Phone", " IPHONE-17-PRO "))
        .await
        .unwrap_err();

    match err {
        CoreError::Validation(v) => assert_eq!(v.field, "slug"),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(service.count_products().await.unwrap(), 1);
}

#[tokio::test]
async fn test_lookup_by_id_or_slug() {
    let service = service();
    let created = service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let by_id = service.get_product(&created.product.id.to_string()).await.unwrap();
    let by_slug = service.get_product("IPhone-17-Pro").await.unwrap();
    assert_eq!(by_id.product.id, by_slug.product.id);

    assert!(matches!(
        service.get_product("does-not-exist").await,
        Err(CoreError::NotFound { .. })
    ));
    assert!(matches!(
        service.get_product(&Uuid::new_v4().to_string()).await,
        Err(CoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_plans_resolve_in_list_order() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let created = service
        .create_plans(
            "iphone-17-pro",
            vec![plan_input(43300.0, 3.0, 0.0), plan_input(21650.0, 6.0, 0.0)],
        )
        .await
        .unwrap();

    let details = service.get_product("iphone-17-pro").await.unwrap();
    let ids: Vec<_> = details.plans.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![created[0].id, created[1].id]);
    assert_eq!(details.product.emi_plans, ids);
}

#[tokio::test]
async fn test_invalid_plan_writes_nothing() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let err = service
        .create_plans(
            "iphone-17-pro",
            vec![plan_input(43300.0, 3.0, 0.0), plan_input(21650.0, 0.0, 0.0)],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation(ref v) if v.field == "tenureMonths"));
    assert_eq!(service.count_plans().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_plan_batch_is_rejected() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let err = service.create_plans("iphone-17-pro", vec![]).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(ref v) if v.field == "emiPlans"));
}

#[tokio::test]
async fn test_update_merges_fields() {
    let service = service();
    let created = service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let patch = ProductInput {
        price: Some(119900.0),
        ..Default::default()
    };
    let updated = service.update_product("iphone-17-pro", patch).await.unwrap();

    assert_eq!(updated.product.id, created.product.id);
    assert_eq!(updated.product.price, 119900.0);
    assert_eq!(updated.product.name, "Apple iPhone 17 Pro");
    assert_eq!(updated.product.created_at, created.product.created_at);
}

#[tokio::test]
async fn test_replace_requires_full_document() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let partial = ProductInput {
        price: Some(119900.0),
        ..Default::default()
    };
    let err = service.replace_product("iphone-17-pro", partial).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(ref v) if v.field == "name"));
}

#[tokio::test]
async fn test_slug_change_checks_uniqueness() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();
    service
        .create_product(product_input("Samsung Galaxy S24 Ultra", "samsung-s24-ultra"))
        .await
        .unwrap();

    // keeping its own slug is fine
    service
        .replace_product("iphone-17-pro", product_input("iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();

    let taken = ProductInput {
        slug: Some("samsung-s24-ultra".into()),
        ..Default::default()
    };
    let err = service.update_product("iphone-17-pro", taken).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation(ref v) if v.field == "slug"));
}

#[tokio::test]
async fn test_delete_product_and_plan() {
    let service = service();
    service
        .create_product(product_input("Apple iPhone 17 Pro", "iphone-17-pro"))
        .await
        .unwrap();
    let plans = service
        .create_plans("iphone-17-pro", vec![plan_input(1.0, 3.0, 0.0), plan_input(1.0, 6.0, 0.0)])
        .await
        .unwrap();

    service.delete_plan("iphone-17-pro", plans[0].id).await.unwrap();
    assert!(matches!(
        service.delete_plan("iphone-17-pro", plans[0].id).await,
        Err(CoreError::NotFound { .. })
    ));
    assert_eq!(service.list_plans("iphone-17-pro").await.unwrap().len(), 1);

    service.delete_product("iphone-17-pro").await.unwrap();
    assert_eq!(service.count_products().await.unwrap(), 0);
    assert_eq!(service.count_plans().await.unwrap(), 0);
}
