
use integration_test_config::mock::{
    error, ok, public_connector, server_time_connector, signed_connector, FIXTURE_SIGNATURE,
    FIXTURE_TIMESTAMP,
};
use mockito::Matcher;
use serde_json::json;
use vitex::{ExchangeError, Numeric, Order, OrderParams, OrderSide, OrderStatus, TradingPair};

const FIXTURE_ORDER_BODY: &str = "amount=5&key=abc&price=0.00006000&side=1\
    &symbol=EPIC-002_BTC-000&timestamp=1635423044469\
    &signature=6dc08971130347d14e37b9ff0a9e989611d7d9baeba456e810015812a28f5984";

/// `key=abc&symbol=EPIC-002_BTC-000&timestamp=1635423044469` signed with `xyz`
const FIXTURE_CANCEL_ALL_SIGNATURE: &str =
    "3220a610e9e9eeeb3eb066664a404bc70e9a627000a97c21d056cb9be9413240";

fn fixture_params() -> OrderParams {
    OrderParams::new("EPIC-002_BTC-000")
        .amount("5")
        .price("0.00006000")
        .side(OrderSide::Sell)
}

#[tokio::test]
async fn test_execute_order_signs_fixture() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/order")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(FIXTURE_ORDER_BODY)
        .with_body(ok(json!({
            "symbol": "EPIC-002_BTC-000",
            "orderId": "0dfbafac33fbccf5c65d44d5d80c1a4d",
            "status": 1
        })))
        .create_async()
        .await;

    let connector = signed_connector(server.url());
    let order = connector.trading.prepare_order(&fixture_params()).unwrap();
    let submitted = connector
        .trading
        .execute_order_at(&order, FIXTURE_TIMESTAMP)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(submitted.signature(), FIXTURE_SIGNATURE);
    assert_eq!(submitted.timestamp(), FIXTURE_TIMESTAMP);
    assert_eq!(submitted.order_id(), Some("0dfbafac33fbccf5c65d44d5d80c1a4d"));
    assert_eq!(
        submitted.ack.as_ref().map(|ack| ack.status),
        Some(OrderStatus::PendingRequest)
    );
    assert_eq!(submitted.order, order);
}

#[tokio::test]
async fn test_test_order_uses_same_signing_path() {
    let mut server = mockito::Server::new_async().await;
    let live = server
        .mock("POST", "/api/v2/order")
        .expect(0)
        .create_async()
        .await;
    let test = server
        .mock("POST", "/api/v2/order/test")
        .match_body(FIXTURE_ORDER_BODY)
        .with_body(ok(json!(null)))
        .create_async()
        .await;

    let connector = signed_connector(server.url());
    let order = connector
        .trading
        .prepare_order(&fixture_params().test(true))
        .unwrap();
    assert!(order.is_test());

    let submitted = connector
        .trading
        .execute_order_at(&order, FIXTURE_TIMESTAMP)
        .await
        .unwrap();

    test.assert_async().await;
    live.assert_async().await;
    assert_eq!(submitted.signature(), FIXTURE_SIGNATURE);
    assert!(submitted.ack.is_none());
    assert_eq!(submitted.signed.get("key"), Some("abc"));
}

#[tokio::test]
async fn test_invalid_order_never_reaches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let connector = signed_connector(server.url());
    for params in [
        fixture_params().amount("0"),
        fixture_params().price("-0.00006"),
        fixture_params().side("long"),
    ] {
        let err = connector
            .trading
            .prepare_order_with_precision(&params)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidOrderParameters(_)));
        assert!(err.is_local());
    }

    let err = connector
        .trading
        .prepare_order(&fixture_params().amount("5,0"))
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidNumericFormat(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_prepare_order_with_market_precision() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/market")
        .match_query(Matcher::UrlEncoded("symbol".into(), "EPIC-002_BTC-000".into()))
        .with_body(ok(json!({
            "symbol": "EPIC-002_BTC-000",
            "pricePrecision": 8,
            "amountPrecision": 2
        })))
        .create_async()
        .await;

    let order = signed_connector(server.url())
        .trading
        .prepare_order_with_precision(&fixture_params().amount("5.129").price("0.00006"))
        .await
        .unwrap();

    assert_eq!(order.amount().to_string(), "5.13");
    assert_eq!(order.price().to_string(), "0.00006000");
}

#[tokio::test]
async fn test_prepare_order_precision_falls_back_to_default() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/market")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let order = signed_connector(server.url())
        .trading
        .prepare_order_with_precision(&fixture_params().amount("1.123456789"))
        .await
        .unwrap();

    assert_eq!(order.amount().to_string(), "1.12345679");
    assert_eq!(order.price().to_string(), "0.00006000");
}

#[tokio::test]
async fn test_amount_rounded_to_zero_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _market = server
        .mock("GET", "/api/v2/market")
        .match_query(Matcher::UrlEncoded("symbol".into(), "EPIC-002_BTC-000".into()))
        .with_body(ok(json!({
            "symbol": "EPIC-002_BTC-000",
            "pricePrecision": 8,
            "amountPrecision": 2
        })))
        .create_async()
        .await;
    let submit = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = signed_connector(server.url())
        .trading
        .prepare_order_with_precision(&fixture_params().amount("0.001"))
        .await
        .unwrap_err();

    assert!(matches!(err, ExchangeError::InvalidOrderParameters(_)));
    assert!(err.is_local());
    submit.assert_async().await;
}

#[tokio::test]
async fn test_hand_built_order_is_validated_before_signing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = Order::new(
        "",
        OrderSide::Buy,
        Numeric::from(-1),
        Numeric::ZERO,
        false,
    )
    .unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidOrderParameters(_)));

    // Orders built directly go through the same checks as prepared ones
    let built = Order::new(
        "EPIC-002_BTC-000",
        OrderSide::Sell,
        Numeric::parse("0.00006000").unwrap(),
        Numeric::from(5),
        true,
    )
    .unwrap();
    let connector = signed_connector(server.url());
    assert_eq!(
        built,
        connector
            .trading
            .prepare_order(&fixture_params().test(true))
            .unwrap()
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_trading_without_credentials_fails_before_io() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let connector = public_connector(server.url());
    let order = connector.trading.prepare_order(&fixture_params()).unwrap();

    let err = connector.trading.execute_order(&order).await.unwrap_err();
    assert!(matches!(err, ExchangeError::MissingCredentials(_)));

    let err = connector
        .trading
        .cancel_all_orders("EPIC-002_BTC-000")
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::MissingCredentials(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_all_orders_accepts_symbol_or_pair() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/v2/orders")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "EPIC-002_BTC-000".into()),
            Matcher::UrlEncoded("key".into(), "abc".into()),
            Matcher::Regex("signature=[0-9a-f]{64}".to_string()),
        ]))
        .with_body(ok(json!([{
            "symbol": "EPIC-002_BTC-000",
            "orderId": "0dfbafac33fbccf5c65d44d5d80c1a4d",
            "cancelRequest": "355b6fab007d86e7ff09b0793fbb205e82d3880b64d948ff628ea8ea8f7a2b2a",
            "status": 6
        }])))
        .expect(3)
        .create_async()
        .await;

    let connector = signed_connector(server.url());
    let pair = TradingPair::new("EPIC-002_BTC-000");
    let order = connector.trading.prepare_order(&fixture_params()).unwrap();

    let by_symbol = connector
        .trading
        .cancel_all_orders("EPIC-002_BTC-000")
        .await
        .unwrap();
    let by_pair = connector.trading.cancel_all_orders(&pair).await.unwrap();
    let by_order = connector.trading.cancel_all_orders(&order).await.unwrap();

    mock.assert_async().await;
    assert_eq!(by_symbol, by_pair);
    assert_eq!(by_pair, by_order);
    assert_eq!(by_symbol[0].status, OrderStatus::PendingCancel);
}

#[tokio::test]
async fn test_cancel_all_orders_with_server_time() {
    let mut server = mockito::Server::new_async().await;
    let _time = server
        .mock("GET", "/api/v2/time")
        .with_body(ok(json!(FIXTURE_TIMESTAMP)))
        .create_async()
        .await;
    let cancel = server
        .mock("DELETE", "/api/v2/orders")
        .match_body(
            format!(
                "key=abc&symbol=EPIC-002_BTC-000&timestamp=1635423044469&signature={}",
                FIXTURE_CANCEL_ALL_SIGNATURE
            )
            .as_str(),
        )
        .with_body(ok(json!([])))
        .create_async()
        .await;

    let cancelled = server_time_connector(server.url())
        .trading
        .cancel_all_orders("EPIC-002_BTC-000")
        .await
        .unwrap();

    cancel.assert_async().await;
    assert!(cancelled.is_empty());
}

#[tokio::test]
async fn test_cancel_terminated_order_keeps_remote_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/api/v2/order")
        .match_body(Matcher::UrlEncoded(
            "orderId".into(),
            "0dfbafac33fbccf5c65d44d5d80c1a4d".into(),
        ))
        .with_body(error(1, "The order status has been terminated"))
        .create_async()
        .await;

    let err = signed_connector(server.url())
        .trading
        .cancel_order("EPIC-002_BTC-000", "0dfbafac33fbccf5c65d44d5d80c1a4d")
        .await
        .unwrap_err();

    assert!(err.is_order_terminated());
    assert!(matches!(
        err,
        ExchangeError::RemoteError { ref message, .. }
            if message == "The order status has been terminated"
    ));
}

#[tokio::test]
async fn test_out_of_quota_is_recognized() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v2/order")
        .with_body(error(1, "out of quota"))
        .create_async()
        .await;

    let connector = signed_connector(server.url());
    let order = connector.trading.prepare_order(&fixture_params()).unwrap();
    let err = connector
        .trading
        .execute_order_at(&order, FIXTURE_TIMESTAMP)
        .await
        .unwrap_err();

    assert!(err.is_out_of_quota());
    assert!(!err.is_local());
}

#[tokio::test]
async fn test_empty_pair_is_rejected_locally() {
    let connector = signed_connector("http://127.0.0.1:9".to_string());
    let err = connector.trading.cancel_all_orders("  ").await.unwrap_err();
    assert!(matches!(err, ExchangeError::InvalidOrderParameters(_)));
}
