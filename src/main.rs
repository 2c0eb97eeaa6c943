use tracing_subscriber::EnvFilter;
use vitex::exchanges::vitex::TokenQuery;
use vitex::{ExchangeConfig, MarketDataSource, OrderParams, VitexBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Credentials are optional: without them only public endpoints work
    let config = load_config();
    let vitex = VitexBuilder::new().with_config(config).build()?;

    println!("Testing connection...");
    let status = vitex.market.test_connection().await?;
    println!(
        "Server time: {:?}, USD/CNY: {:?}",
        status.server_time, status.usd_cny_rate
    );

    let query = TokenQuery {
        symbol_like: Some("EPIC".to_string()),
        limit: Some(5),
        ..TokenQuery::default()
    };
    match vitex.market.get_all_tokens(&query).await {
        Ok(tokens) => {
            println!("Found {} tokens", tokens.len());
            for token in &tokens {
                println!("  {} ({})", token.symbol, token.id);
            }
        }
        Err(e) => println!("Error fetching tokens: {}", e),
    }

    for pair in vitex.get_trading_pair("EPIC-002_BTC-000").await? {
        println!(
            "{}: price precision {:?}, amount precision {:?}, min order {:?}",
            pair, pair.price_precision, pair.quantity_precision, pair.min_order_size
        );
    }

    // Local validation only; nothing is sent
    let order = vitex.trading.prepare_order(
        &OrderParams::new("EPIC-002_BTC-000")
            .amount("5")
            .price("0.00006000")
            .side("sell")
            .test(true),
    )?;
    println!("Prepared {}", order);

    if vitex.trading_enabled() {
        let submitted = vitex.trading.execute_order(&order).await?;
        println!(
            "Test order validated at {} (signature {})",
            submitted.timestamp(),
            submitted.signature()
        );
    }

    Ok(())
}

#[cfg(feature = "env-file")]
fn load_config() -> ExchangeConfig {
    ExchangeConfig::from_env_file("VITEX").unwrap_or_else(|_| ExchangeConfig::read_only())
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> ExchangeConfig {
    ExchangeConfig::from_env("VITEX").unwrap_or_else(|_| ExchangeConfig::read_only())
}
