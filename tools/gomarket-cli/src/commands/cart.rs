//! Cart commands.

use anyhow::Result;
use gomarket_cart::{use_cart, CartManager, CartProvider, ProductDescriptor, ProductId};

use super::{AddArgs, ProductArgs};
use crate::context::Context;

/// Print the cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart().await?;
    ctx.output.header("Cart");
    ctx.output.cart(&cart.state());
    Ok(())
}

/// Add a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let descriptor = ProductDescriptor::new(args.id, args.title, args.image_url, args.price);
    let message = format!("Added {}", descriptor.id);
    mutate(ctx, &message, move |cart| cart.add(descriptor)).await
}

/// Add one unit of a product.
pub async fn increment(args: ProductArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.id);
    let message = format!("Incremented {}", id);
    mutate(ctx, &message, |cart| {
        note_if_missing(ctx, cart, &id);
        cart.increment(&id);
    })
    .await
}

/// Remove one unit of a product.
pub async fn decrement(args: ProductArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.id);
    let message = format!("Decremented {}", id);
    mutate(ctx, &message, |cart| {
        note_if_missing(ctx, cart, &id);
        cart.decrement(&id);
    })
    .await
}

/// Run one mutation inside a provider scope, wait for it to persist and
/// print the result.
async fn mutate<F>(ctx: &Context, message: &str, op: F) -> Result<()>
where
    F: FnOnce(&CartManager),
{
    let manager = ctx.open_cart().await?;

    let cart = CartProvider::scope(manager, async move {
        let cart = use_cart()?;
        op(&cart);
        cart.flush().await;
        Ok::<_, anyhow::Error>(cart)
    })
    .await?;

    ctx.output.success(message);
    ctx.output.cart(&cart.state());
    Ok(())
}

fn note_if_missing(ctx: &Context, cart: &CartManager, id: &ProductId) {
    if !cart.state().contains(id) {
        ctx.output
            .info(&format!("{} is not in the cart; nothing to change", id));
    }
}
