//! Customer registration.

use reqwest::Method;
use tracing::info;

use sapore_core::validation::{validate_document, validate_email, validate_name};
use sapore_core::Customer;

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Checks a customer before it is sent.
pub fn validate_customer(customer: &Customer) -> ClientResult<()> {
    validate_name("name", &customer.name)?;
    validate_document(&customer.document)?;
    if let Some(email) = customer.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }
    Ok(())
}

impl ApiClient {
    pub async fn list_customers(&self) -> ClientResult<Vec<Customer>> {
        self.get_json("/customers").await
    }

    pub async fn get_customer(&self, id: &str) -> ClientResult<Customer> {
        self.get_json(&format!("/customers/{}", id)).await
    }

    pub async fn create_customer(&self, customer: &Customer) -> ClientResult<Customer> {
        validate_customer(customer)?;
        let created: Customer = self.send_json(Method::POST, "/customers", customer).await?;
        info!(id = ?created.id, name = %created.name, "Customer created");
        Ok(created)
    }

    pub async fn update_customer(&self, id: &str, customer: &Customer) -> ClientResult<Customer> {
        validate_customer(customer)?;
        let updated = self
            .send_json(Method::PUT, &format!("/customers/{}", id), customer)
            .await?;
        info!(id, "Customer updated");
        Ok(updated)
    }

    pub async fn delete_customer(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/customers/{}", id)).await?;
        info!(id, "Customer deleted");
        Ok(())
    }
}
