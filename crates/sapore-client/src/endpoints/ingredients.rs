//! Ingredient registry, kept under the pricing resource.

use reqwest::Method;
use std::time::Instant;
use tracing::{debug, info};

use sapore_core::validation::{
    ensure_ingredient_unused, validate_name, validate_search_query, validate_unit_cost,
};
use sapore_core::Ingredient;

use crate::error::ClientResult;
use crate::http::ApiClient;

fn validate_ingredient(ingredient: &Ingredient) -> ClientResult<()> {
    validate_name("name", &ingredient.name)?;
    validate_unit_cost(ingredient.unit_cost)?;
    Ok(())
}

impl ApiClient {
    pub async fn list_ingredients(&self) -> ClientResult<Vec<Ingredient>> {
        self.get_json("/pricing/ingredients").await
    }

    /// Searches by name. A blank query lists everything.
    pub async fn search_ingredients(&self, query: &str) -> ClientResult<Vec<Ingredient>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return self.list_ingredients().await;
        }

        let start = Instant::now();
        let results: Vec<Ingredient> = self
            .get_json_query("/pricing/ingredients", &[("search", query.as_str())])
            .await?;
        debug!(
            query = %query,
            result_count = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Ingredient search completed"
        );
        Ok(results)
    }

    pub async fn create_ingredient(&self, ingredient: &Ingredient) -> ClientResult<Ingredient> {
        validate_ingredient(ingredient)?;
        let created: Ingredient = self
            .send_json(Method::POST, "/pricing/ingredients", ingredient)
            .await?;
        info!(id = ?created.id, name = %created.name, unit = %created.unit, "Ingredient created");
        Ok(created)
    }

    pub async fn update_ingredient(&self, id: &str, ingredient: &Ingredient) -> ClientResult<Ingredient> {
        validate_ingredient(ingredient)?;
        self.send_json(Method::PUT, &format!("/pricing/ingredients/{}", id), ingredient)
            .await
    }

    /// Deletes an ingredient no product recipe uses.
    ///
    /// The product list is fetched first; if any recipe references the
    /// ingredient, nothing is deleted.
    pub async fn delete_ingredient(&self, id: &str) -> ClientResult<()> {
        let products = self.list_products().await?;
        ensure_ingredient_unused(id, &products)?;

        self.delete(&format!("/pricing/ingredients/{}", id)).await?;
        info!(id, "Ingredient deleted");
        Ok(())
    }
}
