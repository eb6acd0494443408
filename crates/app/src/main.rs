use std::rc::Rc;

use anyhow::Context;

use storefront_app::Storefront;
use storefront_auth::{Credentials, MemorySessionAuthority, ProfileCompletion, RoutePaths};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let paths = RoutePaths::from_env().context("invalid STOREFRONT_* route configuration")?;

    let authority = Rc::new(MemorySessionAuthority::new());
    authority.register("admin@example.com", "admin", "Store Admin", "admin");
    authority.register("courier@example.com", "courier", "Courier", "delivery");
    authority.register("shopper@example.com", "shopper", "Shopper", "user");

    let mut storefront = Storefront::new(authority.clone(), paths);
    let session = storefront.session();

    let screen = storefront.navigate("/checkout?cart=42").await?;
    tracing::info!(?screen, "anonymous checkout");

    session
        .login(&Credentials::new("shopper@example.com", "shopper"))
        .await
        .context("demo login failed")?;
    let screen = storefront.resume().await?;
    tracing::info!(?screen, "shopper resumed");

    let screen = storefront.navigate("/admin/dashboard").await?;
    tracing::info!(?screen, "shopper in admin area");

    session.logout();
    authority.sign_in_with_google("new.customer@example.com", "New Customer");
    let screen = storefront.navigate("/account/orders").await?;
    tracing::info!(?screen, "google sign-in before completion");

    session
        .complete_social_profile(&ProfileCompletion::new("555-0100", "1 Market St"))
        .await
        .context("demo profile completion failed")?;
    let screen = storefront.resume().await?;
    tracing::info!(?screen, "google user after completion");

    session.logout();
    session
        .login(&Credentials::new("courier@example.com", "courier"))
        .await
        .context("demo courier login failed")?;
    let screen = storefront.navigate("/auth/login").await?;
    tracing::info!(?screen, "courier on login view");

    Ok(())
}
