//! Catalog mirrors against the in-process backend

mod common;

use common::{Backend, PASSWORD, png};
use dwellings_client::{
    ClientError, ImageSource, ProductCatalog, ProductCategory, ProductCreate, ProductUpdate,
    RigCatalog, RigDraft, RigStatus, RigUpdate, StoreClient,
};

async fn login(store: &StoreClient<dwellings_client::OneshotHttpClient>) {
    assert!(store.verify_admin_password(PASSWORD).await.unwrap());
}

fn draft(title: &str) -> RigDraft {
    RigDraft {
        title: title.into(),
        rig_type: "Van".into(),
        price: "42,000".into(),
        location: "Austin, TX".into(),
        external_link: "https://marketplace/listing".into(),
        ..Default::default()
    }
}

fn photos() -> Vec<ImageSource> {
    vec![
        ImageSource::Bytes(png(64, 48, [200, 30, 30])),
        ImageSource::Bytes(png(48, 64, [30, 30, 200])),
    ]
}

fn product(name: &str, featured: bool, sort_order: Option<i64>) -> ProductCreate {
    ProductCreate {
        name: name.into(),
        description: String::new(),
        short_description: None,
        price: "$99".into(),
        original_price: None,
        coupon_code: None,
        discount: None,
        link: "https://shop/item".into(),
        thumbnail: String::new(),
        gallery_images: None,
        category: ProductCategory::Batteries,
        featured,
        highlights: vec![],
        sort_order,
        specs: vec![],
    }
}

#[tokio::test]
async fn test_new_listing_is_available_and_unfeatured() {
    let backend = Backend::start();
    let catalog = RigCatalog::load(backend.store()).await;
    assert!(catalog.rigs().is_empty());

    let rig = catalog
        .add_rig_with_photos(draft("1998 Blue Bird"), photos())
        .await
        .unwrap();

    assert_eq!(rig.status, RigStatus::Available);
    assert!(!rig.featured);
    assert_eq!(rig.price, "$42,000");
    assert_eq!(rig.gallery_images.len(), 2);
    assert_eq!(rig.thumbnail, rig.gallery_images[0]);
    assert!(rig.gallery_images.iter().all(|url| url.starts_with("http")));

    let mirrored = catalog.find("1998-blue-bird").unwrap();
    assert_eq!(mirrored, rig);
}

#[tokio::test]
async fn test_empty_patch_leaves_record_unchanged() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = RigCatalog::new(store);
    let rig = catalog.add_rig_with_photos(draft("Sprinter"), photos()).await.unwrap();

    let after = catalog.update_rig(&rig.id, RigUpdate::default()).await.unwrap();
    assert_eq!(after, rig);
    assert_eq!(catalog.find(&rig.id).unwrap(), rig);
}

#[tokio::test]
async fn test_reordered_gallery_moves_thumbnail() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = RigCatalog::new(store);
    let rig = catalog.add_rig_with_photos(draft("Box Truck"), photos()).await.unwrap();

    let reversed: Vec<String> = rig.gallery_images.iter().rev().cloned().collect();
    let patch = RigUpdate {
        gallery_images: Some(reversed.clone()),
        ..Default::default()
    };
    let updated = catalog.update_rig(&rig.id, patch).await.unwrap();

    assert_eq!(updated.gallery_images, reversed);
    assert_eq!(updated.thumbnail, reversed[0]);
    assert_eq!(catalog.find(&rig.id).unwrap().thumbnail, reversed[0]);
}

#[tokio::test]
async fn test_fourth_feature_evicts_oldest() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = RigCatalog::new(store);

    let mut ids = Vec::new();
    for title in ["A", "B", "C", "D"] {
        let rig = catalog.add_rig_with_photos(draft(title), photos()).await.unwrap();
        catalog.toggle_featured(&rig.id).await;
        ids.push(rig.id);
    }

    let featured: Vec<String> = catalog.featured().into_iter().map(|r| r.id).collect();
    assert_eq!(featured, ids[1..].to_vec());
    let evicted = catalog.find(&ids[0]).unwrap();
    assert!(!evicted.featured);
    assert_eq!(evicted.featured_order, None);

    // Unfeaturing frees a slot without touching the others
    catalog.toggle_featured(&ids[2]).await;
    let featured: Vec<String> = catalog.featured().into_iter().map(|r| r.id).collect();
    assert_eq!(featured, vec![ids[1].clone(), ids[3].clone()]);
}

#[tokio::test]
async fn test_mutations_without_login_leave_catalog_alone() {
    let backend = Backend::start();
    let catalog = RigCatalog::new(backend.store());
    let rig = catalog.add_rig_with_photos(draft("Skoolie"), photos()).await.unwrap();

    catalog.update_rig_status(&rig.id, RigStatus::Sold).await;
    catalog.toggle_featured(&rig.id).await;
    catalog.delete_rig(&rig.id).await;

    let current = catalog.find(&rig.id).unwrap();
    assert_eq!(current.status, RigStatus::Available);
    assert!(!current.featured);

    let err = catalog
        .update_rig(&rig.id, RigUpdate { title: Some("New".into()), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 403, .. }), "{err:?}");
}

#[tokio::test]
async fn test_status_and_delete_after_login() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = RigCatalog::new(store);
    let rig = catalog.add_rig_with_photos(draft("Airstream"), photos()).await.unwrap();

    catalog.update_rig_status(&rig.id, RigStatus::Pending).await;
    assert_eq!(catalog.with_status(RigStatus::Pending).len(), 1);
    assert!(catalog.available().is_empty());

    catalog.delete_rig(&rig.id).await;
    assert!(catalog.find(&rig.id).is_none());
    assert!(catalog.rigs().is_empty());
}

#[tokio::test]
async fn test_featured_products_tab_order() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = ProductCatalog::load(store).await;

    let a = catalog.add_product(product("A", true, None)).await.unwrap();
    catalog.add_product(product("B", false, Some(0))).await.unwrap();
    let c = catalog.add_product(product("C", true, Some(5))).await.unwrap();
    let d = catalog.add_product(product("D", true, Some(-1))).await.unwrap();

    let tab: Vec<String> = catalog
        .by_category(ProductCategory::Featured)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(tab, vec![d.id.clone(), c.id.clone(), a.id.clone()]);

    // A fresh mirror sees the same thing
    catalog.refresh().await;
    assert_eq!(catalog.by_category(ProductCategory::Featured).len(), 3);
    assert_eq!(catalog.by_category(ProductCategory::Batteries).len(), 4);
}

#[tokio::test]
async fn test_product_edit_and_delete() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = ProductCatalog::new(store);

    let created = catalog.add_product(product("Inverter", false, None)).await.unwrap();
    let updated = catalog
        .update_product_with_thumbnail(
            &created.id,
            ProductUpdate {
                price: Some("$89".into()),
                ..Default::default()
            },
            ImageSource::Bytes(png(120, 40, [10, 200, 10])),
        )
        .await
        .unwrap();
    assert_eq!(updated.price, "$89");
    assert!(updated.thumbnail.starts_with("http"));
    assert_eq!(catalog.get(&created.id).unwrap(), updated);

    catalog.toggle_featured(&created.id).await;
    assert!(catalog.get(&created.id).unwrap().featured);

    catalog.delete_product(&created.id).await;
    assert!(catalog.get(&created.id).is_none());
    catalog.refresh().await;
    assert!(catalog.products().is_empty());
}

#[tokio::test]
async fn test_new_product_gets_uploaded_cover() {
    let backend = Backend::start();
    let store = backend.store();
    login(&store).await;
    let catalog = ProductCatalog::new(store);

    let created = catalog
        .add_product_with_thumbnail(
            product("Mini Split", true, Some(1)),
            ImageSource::Bytes(png(300, 100, [250, 250, 0])),
        )
        .await
        .unwrap();
    assert!(created.thumbnail.starts_with("http"));
    assert_eq!(catalog.featured(6), vec![created]);
}
