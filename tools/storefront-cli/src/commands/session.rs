//! Replay a scripted shopping session.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context as _, Result};
use dialoguer::Confirm;
use serde::Serialize;
use tracing::{debug, info};

use storefront_commerce::cart::{
    Cart, CartCommand, CartEvent, CartStore, CartSummary, CartSync, Coupon,
};
use storefront_commerce::catalog::ProductRef;
use storefront_commerce::chat::{ChatMessage, ChatSession};
use storefront_commerce::checkout::{
    Checkout, CheckoutService, OrderConfirmation, PaymentMethod, PaymentScreenshot,
};
use storefront_commerce::contact::{ContactService, CONTACT_FAILED, CONTACT_SENT};
use storefront_commerce::{ProductId, UserId};

use super::SessionArgs;
use crate::context::Context;
use crate::gateway::{Gateway, OfflineGateway};
use crate::script::{find_product, Action, SessionScript};

/// Result of a session, printed with `--json`.
#[derive(Serialize)]
struct SessionReport<'a> {
    user_id: &'a UserId,
    gateway: String,
    cart: &'a Cart,
    summary: CartSummary,
    is_open: bool,
    events: Vec<CartEvent>,
    orders: Vec<OrderConfirmation>,
    chat: &'a [ChatMessage],
    warnings: Vec<String>,
}

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    let script = SessionScript::load(&path)?;

    let currency = ctx.config.currency()?;
    let catalog = script.catalog(currency);
    let coupons = ctx.config.coupon_book();
    let user_id = UserId::new(
        args.user
            .clone()
            .or_else(|| script.user_id.clone())
            .unwrap_or_else(|| ctx.config.api.user_id.clone()),
    );

    let gateway = if args.offline {
        Gateway::Offline(OfflineGateway)
    } else {
        Gateway::from_config(&ctx.config.api)?
    };
    info!(user_id = %user_id, gateway = %gateway.describe(), "starting session");

    let sync = CartSync::new(gateway.clone(), user_id.clone());
    let checkout_service = CheckoutService::new(gateway.clone());
    let contact_service = ContactService::new(gateway.clone());
    let mut chat = ChatSession::new();

    let mut store = CartStore::new(currency);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    store.subscribe(move |event: &CartEvent, cart: &Cart| {
        debug!(?event, total = %cart.total(), "cart changed");
        sink.borrow_mut().push(event.clone());
    });

    let mut coupon: Option<Coupon> = None;
    let mut orders = Vec::new();
    let mut warnings = Vec::new();

    ctx.output.header(&format!("Session {}", path.display()));
    let total = script.actions.len();

    for (i, action) in script.actions.iter().enumerate() {
        ctx.output.step(i + 1, total, &action.label());

        match action {
            Action::Add { product, quantity } => {
                let product = lookup(&catalog, product)?;
                let command = CartCommand::Add {
                    product: product.clone(),
                    quantity: *quantity,
                };
                push(&sync, &mut store, command, ctx, &mut warnings).await;
            }
            Action::Remove { product } => {
                let command = CartCommand::Remove {
                    product_id: ProductId::new(product.as_str()),
                };
                push(&sync, &mut store, command, ctx, &mut warnings).await;
            }
            Action::Update { product, quantity } => {
                let command = CartCommand::UpdateQuantity {
                    product_id: ProductId::new(product.as_str()),
                    quantity: *quantity,
                };
                push(&sync, &mut store, command, ctx, &mut warnings).await;
            }
            Action::Clear => {
                if !args.yes && !confirm_clear()? {
                    ctx.output.info("Kept cart");
                    continue;
                }
                push(&sync, &mut store, CartCommand::Clear, ctx, &mut warnings).await;
            }
            Action::Open => store.set_is_open(true),
            Action::Close => store.set_is_open(false),
            Action::Coupon { code } => match coupons.redeem(code) {
                Ok(found) => {
                    ctx.output.success(&format!("Coupon {} applied", found.code));
                    coupon = Some(found.clone());
                }
                Err(e) => {
                    ctx.output.warn(&e.to_string());
                    warnings.push(e.to_string());
                    coupon = None;
                }
            },
            Action::Checkout {
                payment,
                screenshot,
                accept_terms,
            } => {
                let method = match payment {
                    Some(code) => PaymentMethod::from_code(code)
                        .ok_or_else(|| anyhow!("Unknown payment method: {}", code))?,
                    None => PaymentMethod::default(),
                };
                if method.is_transfer() {
                    if let Some(account) = ctx.config.account_for(method) {
                        ctx.output.kv(&account.name, &account.number);
                    }
                }

                let mut checkout = Checkout::new(script.customer.clone().unwrap_or_default())
                    .with_payment_method(method)
                    .with_user(user_id.clone());
                checkout.accepted_terms = *accept_terms;
                if let Some(coupon) = coupon.clone() {
                    checkout = checkout.with_coupon(coupon);
                }
                if let Some(file) = screenshot {
                    checkout = checkout.with_screenshot(read_screenshot(ctx, file)?);
                }

                let spinner = ctx.output.spinner("Placing order...");
                let placed = checkout_service.place_order(&mut store, &checkout).await;
                spinner.finish_and_clear();

                let confirmation = placed.context("Error creating order")?;
                let order_id = confirmation
                    .order_id
                    .as_ref()
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                ctx.output.success(&format!(
                    "Order {} placed, {} via {}",
                    order_id,
                    confirmation.summary.total,
                    confirmation.payment_method.display_name()
                ));
                coupon = None;
                orders.push(confirmation);
            }
            Action::Chat { name, message } => {
                chat.set_customer_name(name.as_str());
                if let Err(e) = chat.send(message, &gateway).await {
                    ctx.output.warn(&e.to_string());
                    warnings.push(e.to_string());
                }
            }
            Action::Contact(form) => {
                let mut form = form.clone();
                match contact_service.submit(&mut form).await {
                    Ok(()) => ctx.output.success(CONTACT_SENT),
                    Err(e) => {
                        ctx.output.warn(CONTACT_FAILED);
                        warnings.push(e.to_string());
                    }
                }
            }
        }
    }

    let summary = CartSummary::compute(store.cart(), coupon.as_ref());
    let events = events.borrow().clone();

    if ctx.output.is_json() {
        ctx.output.json(&SessionReport {
            user_id: &user_id,
            gateway: gateway.describe(),
            cart: store.cart(),
            summary,
            is_open: store.is_open(),
            events,
            orders,
            chat: chat.messages(),
            warnings,
        });
        return Ok(());
    }

    ctx.output.header("Cart");
    ctx.output.cart(store.cart(), &summary);
    ctx.output.debug(&format!("{} cart event(s)", events.len()));
    if !orders.is_empty() {
        ctx.output.info(&format!("{} order(s) placed", orders.len()));
    }
    if !warnings.is_empty() {
        ctx.output.warn(&format!("{} action(s) did not go through", warnings.len()));
    }

    Ok(())
}

fn lookup<'a>(catalog: &'a [ProductRef], id: &str) -> Result<&'a ProductRef> {
    match find_product(catalog, id) {
        Some(product) => Ok(product),
        None => bail!("Unknown product: {}", id),
    }
}

async fn push(
    sync: &CartSync<Gateway>,
    store: &mut CartStore,
    command: CartCommand,
    ctx: &Context,
    warnings: &mut Vec<String>,
) {
    if let Err(e) = sync.dispatch(store, command).await {
        let msg = format!("Cart not updated: {}", e);
        ctx.output.warn(&msg);
        warnings.push(msg);
    }
}

fn confirm_clear() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Clear all items from the cart?")
        .default(false)
        .interact()?)
}

fn read_screenshot(ctx: &Context, file: &str) -> Result<PaymentScreenshot> {
    let path = ctx.resolve_path(file);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    let content_type = PaymentScreenshot::content_type_for(&file_name)
        .ok_or_else(|| anyhow!("Please upload a valid image file (JPG, PNG, WebP)"))?;
    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read screenshot: {}", path.display()))?;
    Ok(PaymentScreenshot::from_bytes(file_name, content_type, &bytes)?)
}
