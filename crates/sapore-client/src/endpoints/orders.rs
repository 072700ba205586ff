//! Orders and their status transitions.

use reqwest::Method;
use serde::Serialize;
use tracing::info;

use sapore_core::validation::validate_quantity;
use sapore_core::{CoreError, Order, OrderStatus};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

impl ApiClient {
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.get_json("/orders").await
    }

    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.get_json(&format!("/orders/{}", id)).await
    }

    /// Sends a new order, usually built with [`sapore_core::OrderDraft`].
    pub async fn create_order(&self, order: &Order) -> ClientResult<Order> {
        if order.items.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }
        for item in &order.items {
            validate_quantity(item.quantity)?;
        }

        let created: Order = self.send_json(Method::POST, "/orders", order).await?;
        info!(
            id = ?created.id,
            items = created.items.len(),
            total = %created.total,
            "Order created"
        );
        Ok(created)
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
        let updated = self
            .send_json(
                Method::PATCH,
                &format!("/orders/{}/status", id),
                &StatusUpdate { status },
            )
            .await?;
        info!(id, status = status.as_str(), "Order status updated");
        Ok(updated)
    }

    pub async fn delete_order(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/orders/{}", id)).await?;
        info!(id, "Order deleted");
        Ok(())
    }
}
