//! Product catalogue.

use reqwest::Method;
use tracing::info;

use sapore_core::validation::validate_name;
use sapore_core::Product;

use crate::error::ClientResult;
use crate::http::ApiClient;

fn validate_product(product: &Product) -> ClientResult<()> {
    validate_name("name", &product.name)?;
    validate_name("category", &product.category)?;
    Ok(())
}

impl ApiClient {
    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get_json("/products").await
    }

    pub async fn get_product(&self, id: &str) -> ClientResult<Product> {
        self.get_json(&format!("/products/{}", id)).await
    }

    pub async fn create_product(&self, product: &Product) -> ClientResult<Product> {
        validate_product(product)?;
        let created: Product = self.send_json(Method::POST, "/products", product).await?;
        info!(id = ?created.id, name = %created.name, "Product created");
        Ok(created)
    }

    pub async fn update_product(&self, id: &str, product: &Product) -> ClientResult<Product> {
        validate_product(product)?;
        let updated = self
            .send_json(Method::PUT, &format!("/products/{}", id), product)
            .await?;
        info!(id, "Product updated");
        Ok(updated)
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/products/{}", id)).await?;
        info!(id, "Product deleted");
        Ok(())
    }
}
