//! Operating expenses.

use reqwest::Method;
use tracing::info;

use sapore_core::validation::{validate_name, validate_price_centavos};
use sapore_core::Expense;

use crate::error::ClientResult;
use crate::http::ApiClient;

fn validate_expense(expense: &Expense) -> ClientResult<()> {
    validate_name("description", &expense.description)?;
    validate_price_centavos(expense.amount.centavos())?;
    Ok(())
}

impl ApiClient {
    pub async fn list_expenses(&self) -> ClientResult<Vec<Expense>> {
        self.get_json("/expenses").await
    }

    pub async fn get_expense(&self, id: &str) -> ClientResult<Expense> {
        self.get_json(&format!("/expenses/{}", id)).await
    }

    pub async fn create_expense(&self, expense: &Expense) -> ClientResult<Expense> {
        validate_expense(expense)?;
        let created: Expense = self.send_json(Method::POST, "/expenses", expense).await?;
        info!(id = ?created.id, amount = %created.amount, "Expense recorded");
        Ok(created)
    }

    pub async fn update_expense(&self, id: &str, expense: &Expense) -> ClientResult<Expense> {
        validate_expense(expense)?;
        self.send_json(Method::PUT, &format!("/expenses/{}", id), expense)
            .await
    }

    pub async fn delete_expense(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/expenses/{}", id)).await?;
        info!(id, "Expense deleted");
        Ok(())
    }
}
