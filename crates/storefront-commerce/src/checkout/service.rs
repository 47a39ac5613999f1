//! Order placement.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::cart::{CartStore, CartSummary, Coupon};
use crate::checkout::{
    CustomerInfo, OrderConfirmation, OrderRequest, OrderResponse, PaymentMethod,
    PaymentScreenshot,
};
use crate::error::CommerceError;
use crate::ids::UserId;

/// Backend order-creation endpoint.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order. `Err` means the request never got an answer.
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CommerceError>;
}

/// Everything the checkout form collects besides the cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkout {
    pub user_id: Option<UserId>,
    pub customer: CustomerInfo,
    pub payment_method: PaymentMethod,
    pub screenshot: Option<PaymentScreenshot>,
    pub coupon: Option<Coupon>,
    pub accepted_terms: bool,
}

impl Checkout {
    /// Start a checkout for a customer.
    pub fn new(customer: CustomerInfo) -> Self {
        Self {
            customer,
            ..Default::default()
        }
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_screenshot(mut self, screenshot: PaymentScreenshot) -> Self {
        self.screenshot = Some(screenshot);
        self
    }

    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupon = Some(coupon);
        self
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn accept_terms(mut self) -> Self {
        self.accepted_terms = true;
        self
    }

    /// Validate the form, independent of the cart.
    pub fn validate(&self) -> Result<(), CommerceError> {
        self.customer.validate()?;
        if let Some(ref screenshot) = self.screenshot {
            screenshot.validate()?;
        }
        if !self.accepted_terms {
            return Err(CommerceError::validation(
                "You must agree to the terms and conditions",
            ));
        }
        Ok(())
    }
}

/// Places orders for the cart in a [`CartStore`].
pub struct CheckoutService<G> {
    gateway: G,
}

impl<G: OrderGateway> CheckoutService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Access the gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Submit the current cart as an order.
    ///
    /// The cart is cleared only after the backend acknowledges the order.
    /// On any failure it is left exactly as it was so the customer can
    /// retry; nothing is retried here.
    pub async fn place_order(
        &self,
        store: &mut CartStore,
        checkout: &Checkout,
    ) -> Result<OrderConfirmation, CommerceError> {
        if store.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        checkout.validate()?;

        let summary = CartSummary::compute(store.cart(), checkout.coupon.as_ref());
        let request = OrderRequest::build(
            checkout.user_id.clone().unwrap_or_else(UserId::guest),
            store.cart(),
            &summary,
            &checkout.customer,
            checkout.payment_method,
            checkout.screenshot.as_ref(),
        );

        let response = match self.gateway.create_order(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "order submission failed, cart kept");
                return Err(e);
            }
        };

        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Unknown error occurred".to_string());
            warn!(error = %message, "order rejected, cart kept");
            return Err(CommerceError::OrderRejected(message));
        }

        let order_id = response.resolved_order_id();
        info!(
            order_id = order_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            total = %summary.total,
            items = summary.item_count,
            "order placed"
        );
        store.clear();

        Ok(OrderConfirmation {
            order_id,
            order: response.order,
            summary,
            payment_method: checkout.payment_method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CouponBook;
    use crate::catalog::ProductRef;
    use crate::ids::OrderId;
    use crate::money::{Currency, Money};
    use std::sync::Mutex;

    enum Reply {
        Accept,
        Reject(Option<&'static str>),
        Unreachable,
    }

    struct FakeOrders {
        reply: Reply,
        received: Mutex<Vec<OrderRequest>>,
    }

    impl FakeOrders {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                received: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OrderGateway for FakeOrders {
        async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CommerceError> {
            self.received.lock().unwrap().push(request.clone());
            match self.reply {
                Reply::Accept => Ok(OrderResponse::accepted(OrderId::new("ord-1"))),
                Reply::Reject(Some(msg)) => Ok(OrderResponse::rejected(msg)),
                Reply::Reject(None) => Ok(OrderResponse::default()),
                Reply::Unreachable => Err(CommerceError::gateway("connection reset")),
            }
        }
    }

    fn filled_store() -> CartStore {
        let mut store = CartStore::new(Currency::PKR);
        store.add_item(&ProductRef::new("p1", "Watch", Money::new(100000, Currency::PKR)), 2);
        store
    }

    fn checkout() -> Checkout {
        Checkout::new(CustomerInfo::new(
            "Ali",
            "ali@example.com",
            "0300-1234567",
            "Lahore",
        ))
        .accept_terms()
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let service = CheckoutService::new(FakeOrders::new(Reply::Accept));
        let mut store = filled_store();
        let coupon = CouponBook::default().redeem("GNSONS20").unwrap().clone();

        let confirmation = service
            .place_order(&mut store, &checkout().with_coupon(coupon))
            .await
            .unwrap();

        assert!(store.is_empty());
        assert_eq!(confirmation.order_id, Some(OrderId::new("ord-1")));
        assert_eq!(confirmation.summary.total.amount_cents, 160000);

        let sent = service.gateway().received.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].items.len(), 1);
        assert_eq!(sent[0].coupon_code.as_deref(), Some("GNSONS20"));
    }

    #[tokio::test]
    async fn test_rejection_keeps_cart() {
        let service = CheckoutService::new(FakeOrders::new(Reply::Reject(Some("Out of stock"))));
        let mut store = filled_store();
        let before = store.cart().clone();

        let err = service.place_order(&mut store, &checkout()).await.unwrap_err();
        assert_eq!(err, CommerceError::OrderRejected("Out of stock".to_string()));
        assert_eq!(store.cart(), &before);
    }

    #[tokio::test]
    async fn test_rejection_without_message() {
        let service = CheckoutService::new(FakeOrders::new(Reply::Reject(None)));
        let mut store = filled_store();

        let err = service.place_order(&mut store, &checkout()).await.unwrap_err();
        assert_eq!(
            err,
            CommerceError::OrderRejected("Unknown error occurred".to_string())
        );
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_cart() {
        let service = CheckoutService::new(FakeOrders::new(Reply::Unreachable));
        let mut store = filled_store();
        let before = store.cart().clone();

        let err = service.place_order(&mut store, &checkout()).await.unwrap_err();
        assert!(matches!(err, CommerceError::Gateway(_)));
        assert_eq!(store.cart(), &before);
    }

    #[tokio::test]
    async fn test_empty_cart_is_not_submitted() {
        let service = CheckoutService::new(FakeOrders::new(Reply::Accept));
        let mut store = CartStore::new(Currency::PKR);

        let err = service.place_order(&mut store, &checkout()).await.unwrap_err();
        assert_eq!(err, CommerceError::EmptyCart);
        assert!(service.gateway().received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_submitted() {
        let service = CheckoutService::new(FakeOrders::new(Reply::Accept));
        let mut store = filled_store();
        let unaccepted = Checkout {
            accepted_terms: false,
            ..checkout()
        };

        let err = service.place_order(&mut store, &unaccepted).await.unwrap_err();
        assert!(matches!(err, CommerceError::Validation(_)));
        assert!(service.gateway().received.lock().unwrap().is_empty());
        assert!(!store.is_empty());
    }
}
