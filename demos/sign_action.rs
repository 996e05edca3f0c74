//! Sign an action and print the exchange request body.
//!
//! Run with:
//! ```
//! HYPERLIQUID_PRIVATE_KEY=0x... HYPERLIQUID_NETWORK=testnet cargo run --example sign_action
//! ```
//!
//! Nothing is sent to the exchange.

use std::time::{SystemTime, UNIX_EPOCH};

use hyperliquid_core::actions::{l1, user_signed, Grouping, OrderRequest, OrderType, Tif};
use hyperliquid_core::config::Config;
use hyperliquid_core::signing::SigningContext;
use hyperliquid_core::ExchangePayload;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;
use wallet::TradingWallet;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let ctx: SigningContext = config.signing_context()?;
    tracing::info!(network = %config.network, api_url = %config.api_url, "Loaded configuration");

    let wallet = TradingWallet::from_env()?;
    tracing::info!(address = %wallet.address_string(), "Loaded wallet");

    let nonce = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;

    // A resting post-only bid on asset 0.
    let order = OrderRequest {
        asset: 0,
        is_buy: true,
        limit_px: Decimal::new(1000, 0),
        sz: Decimal::new(1, 2),
        reduce_only: false,
        order_type: OrderType::Limit { tif: Tif::Alo },
        cloid: None,
    };
    let order_action = l1::order(&[order], Grouping::Na, None)?;
    let signed = wallet.sign_action(&ctx, &order_action, nonce)?;
    println!("{}", serde_json::to_string_pretty(&ExchangePayload::from(signed))?);

    let transfer = user_signed::usd_class_transfer(Decimal::ONE, true, nonce, ctx.vault_address.as_ref())?;
    let signed = ctx
        .sign_with_wallet(&wallet.local_wallet(), &transfer, nonce, hyperliquid_core::ActionCategory::of(&transfer))
        .await?;
    println!("{}", serde_json::to_string_pretty(&signed.into_payload())?);

    Ok(())
}
