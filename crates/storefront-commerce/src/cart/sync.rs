//! Optimistic mirroring of cart changes to the backend.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cart::{CartCommand, CartStore};
use crate::error::CommerceError;
use crate::ids::UserId;

/// Backend endpoint that mirrors cart changes.
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Send one command for a user's server-side cart.
    async fn push(&self, user_id: &UserId, command: &CartCommand) -> Result<(), CommerceError>;
}

/// Applies cart commands locally first, then confirms them with the backend.
///
/// A rejected command is rolled back with its compensation so the local
/// cart matches what the backend accepted. Nothing is retried.
pub struct CartSync<G> {
    gateway: G,
    user_id: UserId,
}

impl<G: CartGateway> CartSync<G> {
    /// Create a sync for a user.
    pub fn new(gateway: G, user_id: UserId) -> Self {
        Self { gateway, user_id }
    }

    /// The user whose cart is mirrored.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Apply a command and push it; roll back if the push fails.
    pub async fn dispatch(
        &self,
        store: &mut CartStore,
        command: CartCommand,
    ) -> Result<(), CommerceError> {
        let compensation = store.apply(&command);
        if compensation.is_noop() {
            debug!(?command, "cart command changed nothing, not pushing");
            return Ok(());
        }

        match self.gateway.push(&self.user_id, &command).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, ?command, "cart sync failed, rolling back");
                store.compensate(compensation);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductRef;
    use crate::ids::ProductId;
    use crate::money::{Currency, Money};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGateway {
        fail: bool,
        pushed: Mutex<Vec<CartCommand>>,
    }

    #[async_trait]
    impl CartGateway for FakeGateway {
        async fn push(&self, _user_id: &UserId, command: &CartCommand) -> Result<(), CommerceError> {
            self.pushed.lock().unwrap().push(command.clone());
            if self.fail {
                Err(CommerceError::gateway("connection refused"))
            } else {
                Ok(())
            }
        }
    }

    fn watch() -> ProductRef {
        ProductRef::new("p1", "Watch", Money::new(1000, Currency::PKR))
    }

    #[tokio::test]
    async fn test_accepted_command_sticks() {
        let sync = CartSync::new(FakeGateway::default(), UserId::guest());
        let mut store = CartStore::new(Currency::PKR);

        sync.dispatch(&mut store, CartCommand::Add { product: watch(), quantity: 2 })
            .await
            .unwrap();

        assert_eq!(store.cart().total().amount_cents, 2000);
        assert_eq!(sync.gateway.pushed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_command_rolls_back() {
        let sync = CartSync::new(
            FakeGateway {
                fail: true,
                ..Default::default()
            },
            UserId::guest(),
        );
        let mut store = CartStore::new(Currency::PKR);
        store.add_item(&watch(), 1);
        let before = store.cart().clone();

        let result = sync
            .dispatch(
                &mut store,
                CartCommand::UpdateQuantity {
                    product_id: ProductId::new("p1"),
                    quantity: 4,
                },
            )
            .await;

        assert!(matches!(result, Err(CommerceError::Gateway(_))));
        assert_eq!(store.cart(), &before);
    }

    #[tokio::test]
    async fn test_noop_command_is_not_pushed() {
        let sync = CartSync::new(FakeGateway::default(), UserId::guest());
        let mut store = CartStore::new(Currency::PKR);

        sync.dispatch(
            &mut store,
            CartCommand::Remove {
                product_id: ProductId::new("missing"),
            },
        )
        .await
        .unwrap();

        assert!(sync.gateway.pushed.lock().unwrap().is_empty());
    }
}
