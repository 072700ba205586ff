//! # Pricing Board
//!
//! The pricing screen shows two lists: products still to price and products
//! already priced. The board holds both and is the only place they change.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Salvar" on product P                                                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  POST /pricing/products/P/pricing ──fail──► error, lists untouched      │
//! │     │ ok                                                                │
//! │     ▼                                                                   │
//! │  move P: pending ──► priced   (optimistic, immediate)                   │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  spawn refetch ──► GET pending + GET priced ──► replace BOTH lists      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lists are always replaced whole on refetch; there is no merging.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sapore_core::pricing::CommitRequest;
use sapore_core::Product;

use crate::error::ClientResult;
use crate::http::ApiClient;

/// Both lists of the pricing screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardLists {
    pub pending: Vec<Product>,
    pub priced: Vec<Product>,
}

impl BoardLists {
    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.pending
            .iter()
            .chain(self.priced.iter())
            .find(|p| p.id.as_deref() == Some(product_id))
    }
}

/// Shared pricing board state.
#[derive(Debug, Default)]
pub struct PricingBoard {
    lists: Mutex<BoardLists>,
}

impl PricingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> BoardLists {
        self.lists.lock().await.clone()
    }

    /// Replaces both lists wholesale.
    pub async fn replace(&self, lists: BoardLists) {
        let mut guard = self.lists.lock().await;
        debug!(
            pending = lists.pending.len(),
            priced = lists.priced.len(),
            "Pricing board replaced"
        );
        *guard = lists;
    }

    /// Moves a product from pending to priced with the committed figures.
    ///
    /// Returns false if the product was not on the pending list.
    pub async fn move_to_priced(&self, product_id: &str, commit: &CommitRequest) -> bool {
        let mut guard = self.lists.lock().await;

        let Some(index) = guard
            .pending
            .iter()
            .position(|p| p.id.as_deref() == Some(product_id))
        else {
            return false;
        };

        let mut product = guard.pending.remove(index);
        commit.apply_to(&mut product);
        guard.priced.push(product);
        true
    }

    /// Fetches both lists and replaces the board with them.
    pub async fn refresh(&self, client: &ApiClient) -> ClientResult<()> {
        let (pending, priced) =
            tokio::try_join!(client.pending_products(), client.priced_products())?;
        self.replace(BoardLists { pending, priced }).await;
        Ok(())
    }

    /// Commits a price, moves the product optimistically, and starts the
    /// background refetch.
    ///
    /// The returned handle resolves when the refetch has replaced the lists.
    /// Dropping it leaves the refetch running.
    pub async fn commit(
        self: &Arc<Self>,
        client: &ApiClient,
        product_id: &str,
        commit: &CommitRequest,
    ) -> ClientResult<JoinHandle<ClientResult<()>>> {
        client.commit_pricing(product_id, commit).await?;

        if !self.move_to_priced(product_id, commit).await {
            debug!(product_id, "Committed product was not on the pending list");
        }
        info!(product_id, "Product moved to priced list");

        let board = Arc::clone(self);
        let client = client.clone();
        Ok(tokio::spawn(async move {
            let result = board.refresh(&client).await;
            if let Err(ref e) = result {
                warn!(error = %e, "Pricing board refetch failed, keeping optimistic lists");
            }
            result
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapore_core::pricing::{PricingInputs, PricingStrategy, SimulationRequest, SimulationResult};
    use sapore_core::Money;

    fn product(id: &str) -> Product {
        let mut p = Product::new(format!("Produto {}", id), "Doces");
        p.id = Some(id.to_string());
        p
    }

    fn commit() -> CommitRequest {
        let request = SimulationRequest::build(&PricingInputs {
            strategy: PricingStrategy::Markup,
            markup_percent: Some(100.0),
            ..Default::default()
        })
        .unwrap();
        let result = SimulationResult {
            ingredient_cost: 10.0,
            cost_per_unit: 1.0,
            suggested_price: Money::from_centavos(200),
            unit_profit: Money::from_centavos(100),
            profit_margin: 50.0,
            markup: 100.0,
        };
        CommitRequest::new(&request, &result)
    }

    #[tokio::test]
    async fn test_move_to_priced() {
        let board = PricingBoard::new();
        board
            .replace(BoardLists {
                pending: vec![product("1"), product("2")],
                priced: vec![],
            })
            .await;

        assert!(board.move_to_priced("2", &commit()).await);
        assert!(!board.move_to_priced("9", &commit()).await);

        let lists = board.snapshot().await;
        assert_eq!(lists.pending.len(), 1);
        assert_eq!(lists.priced.len(), 1);
        let moved = lists.find("2").unwrap();
        assert!(moved.is_priced());
        assert_eq!(moved.sale_price, Some(Money::from_centavos(200)));
    }
}
