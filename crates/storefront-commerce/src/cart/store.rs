//! The cart store.
//!
//! One `CartStore` is created per browsing session and handed to every view
//! that shows or changes the cart. It owns the [`Cart`] value and is the only
//! way to change it; every mutation recomputes the total and then notifies
//! subscribers before returning.

use std::fmt;

use crate::cart::{Cart, LineItem};
use crate::catalog::ProductRef;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::Serialize;
use tracing::{debug, warn};

/// What changed in the last mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    /// Quantity was added for a product, new line or existing.
    ItemAdded { product_id: ProductId, quantity: i64 },
    /// A line was removed.
    ItemRemoved { product_id: ProductId },
    /// A line's quantity was replaced.
    QuantityUpdated { product_id: ProductId, quantity: i64 },
    /// All lines were removed.
    Cleared,
    /// A compensation put back an earlier state.
    Restored,
    /// The cart panel was opened or closed.
    PanelToggled { open: bool },
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&CartEvent, &Cart)>;

/// A cart mutation as data.
///
/// Used where a mutation has to be described before it is applied, e.g. to
/// mirror it to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    Add { product: ProductRef, quantity: i64 },
    Remove { product_id: ProductId },
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    Clear,
}

impl CartCommand {
    /// Product the command targets, `None` for `Clear`.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartCommand::Add { product, .. } => Some(&product.id),
            CartCommand::Remove { product_id } => Some(product_id),
            CartCommand::UpdateQuantity { product_id, .. } => Some(product_id),
            CartCommand::Clear => None,
        }
    }
}

/// The inverse of an applied [`CartCommand`].
#[derive(Debug, Clone, PartialEq)]
pub struct Compensation(Undo);

#[derive(Debug, Clone, PartialEq)]
enum Undo {
    Nothing,
    Line {
        product_id: ProductId,
        position: usize,
        previous: Option<LineItem>,
    },
    Items(Vec<LineItem>),
}

impl Compensation {
    /// True if the command changed nothing and there is nothing to undo.
    pub fn is_noop(&self) -> bool {
        matches!(self.0, Undo::Nothing)
    }
}

/// Session-scoped cart state.
pub struct CartStore {
    cart: Cart,
    is_open: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartStore {
    /// Create an empty store pricing everything in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            cart: Cart::empty(currency),
            is_open: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether the cart panel is shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Show or hide the cart panel.
    pub fn set_is_open(&mut self, open: bool) {
        if self.is_open == open {
            return;
        }
        self.is_open = open;
        self.notify(CartEvent::PanelToggled { open });
    }

    /// Flip the cart panel.
    pub fn toggle_open(&mut self) {
        self.set_is_open(!self.is_open);
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line accumulates; otherwise a new line is appended with
    /// the product's current name, price and first image. Non-positive
    /// quantities, negative prices and products priced in another currency
    /// are ignored.
    pub fn add_item(&mut self, product: &ProductRef, quantity: i64) {
        if quantity <= 0 {
            warn!(product_id = %product.id, quantity, "ignoring non-positive add");
            return;
        }
        if product.price.is_negative() {
            warn!(product_id = %product.id, price = %product.price, "ignoring product with a negative price");
            return;
        }
        if product.price.currency != self.cart.currency() {
            warn!(
                product_id = %product.id,
                currency = %product.price.currency,
                cart_currency = %self.cart.currency(),
                "ignoring product priced in another currency"
            );
            return;
        }

        match self.cart.position(&product.id) {
            Some(index) => {
                let item = &mut self.cart.items_mut()[index];
                item.quantity = item.quantity.saturating_add(quantity);
            }
            None => self
                .cart
                .items_mut()
                .push(LineItem::snapshot(product, quantity)),
        }
        self.cart.recompute_total();

        debug!(product_id = %product.id, quantity, total = %self.cart.total(), "cart item added");
        self.notify(CartEvent::ItemAdded {
            product_id: product.id.clone(),
            quantity,
        });
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: &ProductRef) {
        self.add_item(product, 1);
    }

    /// Remove a product's line. Returns whether a line was removed.
    ///
    /// Unknown ids are a silent no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let Some(index) = self.cart.position(product_id) else {
            return false;
        };
        self.cart.items_mut().remove(index);
        self.cart.recompute_total();

        debug!(product_id = %product_id, total = %self.cart.total(), "cart item removed");
        self.notify(CartEvent::ItemRemoved {
            product_id: product_id.clone(),
        });
        true
    }

    /// Replace a product's quantity. Returns whether the line existed.
    ///
    /// A quantity of zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        let Some(index) = self.cart.position(product_id) else {
            return false;
        };
        self.cart.items_mut()[index].quantity = quantity;
        self.cart.recompute_total();

        debug!(product_id = %product_id, quantity, total = %self.cart.total(), "cart quantity updated");
        self.notify(CartEvent::QuantityUpdated {
            product_id: product_id.clone(),
            quantity,
        });
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart = Cart::empty(self.cart.currency());
        debug!("cart cleared");
        self.notify(CartEvent::Cleared);
    }

    /// Apply a command and return its inverse.
    pub fn apply(&mut self, command: &CartCommand) -> Compensation {
        let undo = match command {
            CartCommand::Add { product, quantity } => {
                let previous = self.cart.get_item(&product.id).cloned();
                let position = self
                    .cart
                    .position(&product.id)
                    .unwrap_or(self.cart.unique_item_count());
                let before = self.cart.clone();
                self.add_item(product, *quantity);
                if self.cart == before {
                    Undo::Nothing
                } else {
                    Undo::Line {
                        product_id: product.id.clone(),
                        position,
                        previous,
                    }
                }
            }
            CartCommand::Remove { product_id } => self.line_undo(product_id, |store| {
                store.remove_item(product_id);
            }),
            CartCommand::UpdateQuantity {
                product_id,
                quantity,
            } => self.line_undo(product_id, |store| {
                store.update_quantity(product_id, *quantity);
            }),
            CartCommand::Clear => {
                let items = self.cart.items().to_vec();
                self.clear();
                if items.is_empty() {
                    Undo::Nothing
                } else {
                    Undo::Items(items)
                }
            }
        };
        Compensation(undo)
    }

    /// Undo a previously applied command.
    ///
    /// The affected line is put back at its old position (or dropped if it
    /// did not exist before); a compensated `Clear` restores every cleared
    /// line ahead of any line added since.
    pub fn compensate(&mut self, compensation: Compensation) {
        match compensation.0 {
            Undo::Nothing => return,
            Undo::Line {
                product_id,
                position,
                previous,
            } => {
                let items = self.cart.items_mut();
                items.retain(|i| i.product_id != product_id);
                if let Some(line) = previous {
                    let at = position.min(items.len());
                    items.insert(at, line);
                }
            }
            Undo::Items(lines) => {
                let items = self.cart.items_mut();
                let later: Vec<LineItem> = items
                    .drain(..)
                    .filter(|item| !lines.iter().any(|l| l.product_id == item.product_id))
                    .collect();
                *items = lines;
                items.extend(later);
            }
        }
        self.cart.recompute_total();
        debug!(total = %self.cart.total(), "cart restored");
        self.notify(CartEvent::Restored);
    }

    fn line_undo(&mut self, product_id: &ProductId, mutate: impl FnOnce(&mut Self)) -> Undo {
        let Some(position) = self.cart.position(product_id) else {
            return Undo::Nothing;
        };
        let previous = self.cart.items()[position].clone();
        mutate(self);
        Undo::Line {
            product_id: product_id.clone(),
            position,
            previous: Some(previous),
        }
    }

    /// Register a listener called after every change.
    pub fn subscribe(&mut self, listener: impl Fn(&CartEvent, &Cart) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Detach a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < len_before
    }

    fn notify(&self, event: CartEvent) {
        for (_, listener) in &self.listeners {
            listener(&event, &self.cart);
        }
    }

    // Read-through helpers for views.

    /// Total item count, shown on the header badge.
    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.cart.unique_item_count()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Get the line for a product.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.cart.get_item(product_id)
    }

    /// Price times quantity for one product's line.
    pub fn line_total(&self, product_id: &ProductId) -> Option<Money> {
        self.cart.get_item(product_id).map(LineItem::line_total)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("is_open", &self.is_open)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
