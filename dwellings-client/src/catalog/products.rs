//! Product Catalog

use shared::{Product, ProductCategory, ProductCreate, ProductUpdate, filter_by_category, sort_for_display};

use super::Mirror;
use crate::http::HttpClient;
use crate::image::{self, ImageSource};
use crate::store::StoreClient;
use crate::{ClientError, ClientResult, NetworkHttpClient};

/// Affiliate products mirrored from the store
///
/// Mutations trust the record the server sends back instead of refetching:
/// creates append, updates replace by id, deletes filter out.
#[derive(Debug)]
pub struct ProductCatalog<C = NetworkHttpClient> {
    store: StoreClient<C>,
    mirror: Mirror<Product>,
}

impl<C: HttpClient> ProductCatalog<C> {
    pub fn new(store: StoreClient<C>) -> Self {
        Self {
            store,
            mirror: Mirror::new(),
        }
    }

    pub async fn load(store: StoreClient<C>) -> Self {
        let catalog = Self::new(store);
        catalog.refresh().await;
        catalog
    }

    pub fn store(&self) -> &StoreClient<C> {
        &self.store
    }

    /// All products in display order
    pub fn products(&self) -> Vec<Product> {
        let mut products = self.mirror.snapshot();
        sort_for_display(&mut products);
        products
    }

    /// Products under one shop tab, in display order
    pub fn by_category(&self, category: ProductCategory) -> Vec<Product> {
        filter_by_category(&self.mirror.read().items, category)
    }

    /// Featured products for the home page, at most `limit`
    pub fn featured(&self, limit: usize) -> Vec<Product> {
        let mut featured = self.by_category(ProductCategory::Featured);
        featured.truncate(limit);
        featured
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.mirror.read().items.iter().find(|p| p.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.mirror.is_loading()
    }

    pub async fn refresh(&self) {
        self.mirror.set_loading(true);
        match self.store.list_products().await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Fetched products");
                self.mirror.replace(products);
            }
            Err(e) => {
                tracing::error!(endpoint = "/deals", error = %e, "Failed to fetch products");
                self.mirror.replace(Vec::new());
            }
        }
    }

    /// Errors propagate.
    pub async fn add_product(&self, product: ProductCreate) -> ClientResult<Product> {
        product.validate()?;
        let created = self.store.create_product(&product).await.map_err(|e| {
            tracing::error!(endpoint = "/deals", name = %product.name, error = %e, "Failed to create product");
            e
        })?;
        self.mirror.write().items.push(created.clone());
        Ok(created)
    }

    /// Errors propagate.
    pub async fn update_product(&self, id: &str, patch: ProductUpdate) -> ClientResult<Product> {
        patch.validate()?;
        let updated = self.store.update_product(id, &patch).await.map_err(|e| {
            tracing::error!(endpoint = "/deals/{id}", product_id = id, error = %e, "Failed to update product");
            e
        })?;
        self.merge(updated.clone());
        Ok(updated)
    }

    /// Upload `thumbnail` as the product's square cover, then create it.
    ///
    /// Nothing is created when the form is invalid or the upload yields no
    /// URL.
    pub async fn add_product_with_thumbnail(
        &self,
        mut product: ProductCreate,
        thumbnail: ImageSource,
    ) -> ClientResult<Product> {
        product.validate()?;
        product.thumbnail = self.upload_thumbnail(thumbnail, None).await?;
        self.add_product(product).await
    }

    /// Swap in a new thumbnail, then apply the rest of `patch`.
    ///
    /// The image is squared to 800x800 and uploaded first; nothing is saved
    /// when the upload yields no URL.
    pub async fn update_product_with_thumbnail(
        &self,
        id: &str,
        mut patch: ProductUpdate,
        thumbnail: ImageSource,
    ) -> ClientResult<Product> {
        patch.thumbnail = Some(self.upload_thumbnail(thumbnail, Some(id)).await?);
        self.update_product(id, patch).await
    }

    async fn upload_thumbnail(
        &self,
        thumbnail: ImageSource,
        product_id: Option<&str>,
    ) -> ClientResult<String> {
        let encoded = image::compress_square(thumbnail).await?;
        self.upload_image(&encoded, product_id)
            .await?
            .ok_or(ClientError::UploadFailed)
    }

    /// Upload an encoded image for a product form.
    pub async fn upload_image(
        &self,
        encoded_image: &str,
        product_id: Option<&str>,
    ) -> ClientResult<Option<String>> {
        let url = self.store.upload_image(encoded_image, product_id).await?;
        if url.is_none() {
            tracing::warn!(endpoint = "/deals/upload-image", product_id, "Upload returned no URL");
        }
        Ok(url)
    }

    /// Errors are logged, not returned.
    pub async fn delete_product(&self, id: &str) {
        match self.store.delete_product(id).await {
            Ok(()) => self.mirror.write().items.retain(|p| p.id != id),
            Err(e) => {
                tracing::error!(endpoint = "/deals/{id}", product_id = id, error = %e, "Failed to delete product");
            }
        }
    }

    /// Flip `featured`. No cap applies to products. Errors are logged.
    pub async fn toggle_featured(&self, id: &str) {
        let Some(current) = self.get(id) else {
            tracing::warn!(product_id = id, "Cannot toggle unknown product");
            return;
        };
        let patch = ProductUpdate {
            featured: Some(!current.featured),
            ..Default::default()
        };
        match self.store.update_product(id, &patch).await {
            Ok(updated) => self.merge(updated),
            Err(e) => {
                tracing::error!(endpoint = "/deals/{id}", product_id = id, error = %e, "Failed to toggle product featured");
            }
        }
    }

    /// Replace the entry with the same id; append when it is new.
    fn merge(&self, product: Product) {
        let mut state = self.mirror.write();
        match state.items.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => state.items.push(product),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oneshot::OneshotHttpClient;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use shared::HOMEPAGE_FEATURED_PRODUCTS;

    fn product(id: &str, sort_order: Option<i64>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "link": "https://shop",
            "category": "batteries",
            "sortOrder": sort_order
        }))
        .unwrap()
    }

    #[test]
    fn test_products_in_display_order() {
        let catalog = ProductCatalog::new(StoreClient::new(OneshotHttpClient::new(Router::new())));
        catalog
            .mirror
            .replace(vec![product("c", None), product("b", Some(2)), product("a", Some(1))]);
        let ids: Vec<_> = catalog.products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        catalog.merge(product("b", Some(0)));
        let ids: Vec<_> = catalog.products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_entry() {
        let catalog = ProductCatalog::new(StoreClient::new(OneshotHttpClient::new(Router::new())));
        catalog.mirror.replace(vec![product("a", None)]);
        catalog.delete_product("a").await;
        assert!(catalog.get("a").is_some());
    }

    #[test]
    fn test_featured_is_capped() {
        let catalog = ProductCatalog::new(StoreClient::new(OneshotHttpClient::new(Router::new())));
        let mut items: Vec<Product> = (0..8).map(|i| product(&format!("p{i}"), Some(8 - i))).collect();
        items[0].featured = false;
        for p in items.iter_mut().skip(1) {
            p.featured = true;
        }
        catalog.mirror.replace(items);

        let ids: Vec<_> = catalog
            .featured(HOMEPAGE_FEATURED_PRODUCTS)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p7", "p6", "p5", "p4", "p3", "p2"]);
        assert_eq!(catalog.featured(2).len(), 2);
    }

    #[tokio::test]
    async fn test_refused_thumbnail_upload_creates_nothing() {
        let router = Router::new().route(
            "/deals/upload-image",
            post(|| async { Json(json!({ "success": false })) }),
        );
        let catalog = ProductCatalog::new(StoreClient::new(OneshotHttpClient::new(router)));
        let create: ProductCreate = serde_json::from_value(json!({
            "name": "Panel",
            "link": "https://shop/panel",
            "category": "solar-panels"
        }))
        .unwrap();

        let mut png = Vec::new();
        ::image::DynamicImage::new_rgb8(20, 10)
            .write_to(&mut std::io::Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();
        let err = catalog
            .add_product_with_thumbnail(create, ImageSource::Bytes(png))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UploadFailed), "{err:?}");
        assert!(catalog.products().is_empty());
    }

    #[tokio::test]
    async fn test_bad_thumbnail_aborts_update() {
        let catalog = ProductCatalog::new(StoreClient::new(OneshotHttpClient::new(Router::new())));
        let err = catalog
            .update_product_with_thumbnail(
                "a",
                ProductUpdate::default(),
                ImageSource::Bytes(b"garbage".to_vec()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Image(_)));
    }
}
