//! Pricing screen: the two product lists, simulation, commit and recipe
//! lines.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use sapore_core::pricing::{CommitRequest, SimulationRequest, SimulationResult};
use sapore_core::validation::validate_recipe_quantity;
use sapore_core::{Product, Unit};

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Body for adding an ingredient to a product's recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLineInput {
    pub ingredient_id: String,
    pub quantity: f64,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApiClient {
    /// Products that have not been priced yet.
    pub async fn pending_products(&self) -> ClientResult<Vec<Product>> {
        self.get_json("/pricing/products/pending").await
    }

    /// Products with a committed price.
    pub async fn priced_products(&self) -> ClientResult<Vec<Product>> {
        self.get_json("/pricing/products/priced").await
    }

    /// Asks the backend to price a product. Nothing is persisted.
    pub async fn simulate_pricing(
        &self,
        product_id: &str,
        request: &SimulationRequest,
    ) -> ClientResult<SimulationResult> {
        let start = Instant::now();
        let result: SimulationResult = self
            .send_json(
                Method::POST,
                &format!("/pricing/products/{}/simulate", product_id),
                request,
            )
            .await?;
        debug!(
            product_id,
            strategy = %request.strategy(),
            suggested_price = %result.suggested_price,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Pricing simulated"
        );
        Ok(result)
    }

    /// Persists simulated figures as the product's price.
    ///
    /// See [`crate::board::PricingBoard::commit`] for the optimistic list
    /// update that normally wraps this.
    pub async fn commit_pricing(&self, product_id: &str, commit: &CommitRequest) -> ClientResult<()> {
        self.send_json_empty(
            Method::POST,
            &format!("/pricing/products/{}/pricing", product_id),
            commit,
        )
        .await?;
        info!(product_id, sale_price = %commit.sale_price, "Pricing committed");
        Ok(())
    }

    pub async fn add_recipe_line(&self, product_id: &str, line: &RecipeLineInput) -> ClientResult<Product> {
        validate_recipe_quantity(line.quantity)?;
        let product: Product = self
            .send_json(
                Method::POST,
                &format!("/pricing/products/{}/ingredients", product_id),
                line,
            )
            .await?;
        info!(product_id, ingredient_id = %line.ingredient_id, "Recipe line added");
        Ok(product)
    }

    pub async fn remove_recipe_line(&self, product_id: &str, line_id: &str) -> ClientResult<()> {
        self.delete(&format!("/pricing/products/{}/ingredients/{}", product_id, line_id))
            .await?;
        info!(product_id, line_id, "Recipe line removed");
        Ok(())
    }
}
