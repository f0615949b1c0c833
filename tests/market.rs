use alloy::primitives::U256;
use fastnum::udec128;
use hundredx_sdk::{
    ErrorKind, nonce,
    testing::{self, MockGateway, MockTransport},
    types::{Interval, KlineQuery, MarginQuery, OrderBookQuery},
};
use serde_json::{Value, json};

fn products() -> Value {
    json!([
        {
            "id": 1003,
            "type": "PERP",
            "symbol": "btcperp",
            "active": true,
            "baseAsset": "WBTC",
            "quoteAsset": "USDB",
            "minQuantity": "1000000000000000",
            "maxQuantity": "1000000000000000000000000",
            "increment": "100000000000000",
            "takerFee": "500000000000000",
            "makerFee": "300000000000000",
            "isMakerRebate": true,
            "initialLongWeight": "900000000000000000",
            "initialShortWeight": "1100000000000000000",
            "maintenanceLongWeight": "950000000000000000",
            "maintenanceShortWeight": "1050000000000000000",
            "baseAssetAddress": "0xdc2f16a474a969056e6a559629b46d01f8675a1a",
            "quoteAssetAddress": "0x79a59c326c715ac2d31c169c85d1232319e341ce",
            "markPrice": "72581488537710140836821",
        },
        {
            "id": 1002,
            "type": "PERP",
            "symbol": "ethperp",
            "active": true,
            "baseAsset": "WETH",
            "quoteAsset": "USDB",
            "minQuantity": "100000000000000",
            "maxQuantity": "100000000000000000000000",
            "increment": "10000000000000",
            "takerFee": "200000000000000",
            "makerFee": "50000000000000",
            "isMakerRebate": true,
            "initialLongWeight": "950000000000000000",
            "initialShortWeight": "1050000000000000000",
            "maintenanceLongWeight": "970000000000000000",
            "maintenanceShortWeight": "1030000000000000000",
            "baseAssetAddress": "0x4200000000000000000000000000000000000023",
            "quoteAssetAddress": "0x79a59c326c715ac2d31c169c85d1232319e341ce",
            "markPrice": "3399999999999999999772",
        }
    ])
}

#[tokio::test]
async fn test_get_products() {
    let transport = MockTransport::default().with_fallback(products());
    let client = testing::client(transport.clone(), MockGateway::default());

    let response = client.get_products().await;

    assert!(response.is_success());
    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].symbol, "btcperp");
    assert_eq!(
        response.data[1].increment_wei().unwrap(),
        U256::from(10_000_000_000_000u64)
    );
    assert_eq!(transport.last_request().unwrap().path, "products");
}

#[tokio::test]
async fn test_get_product_by_id_and_symbol() {
    let transport = MockTransport::default();
    transport
        .push_response(products()[0].clone())
        .push_response(products()[1].clone());
    let client = testing::client(transport.clone(), MockGateway::default());

    let btc = client.get_product(1003u32).await.data.unwrap();
    let eth = client.get_product("ethperp").await.data.unwrap();

    assert_eq!(btc.id, 1003);
    assert_eq!(eth.id, 1002);
    let paths = transport
        .requests()
        .into_iter()
        .map(|r| r.path)
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["products/product-by-id/1003", "products/ethperp"]);
}

#[tokio::test]
async fn test_get_server_time() {
    let transport = MockTransport::default();
    transport
        .push_response(json!({ "serverTime": 1709829760000u64 }))
        .push_failure("An unknown error occurred");
    let client = testing::client(transport.clone(), MockGateway::default());

    assert_eq!(client.get_server_time().await.data, Some(1709829760000));
    let failed = client.get_server_time().await;
    assert_eq!(failed.data, None);
    assert_eq!(failed.error.unwrap().kind, ErrorKind::Unknown);
    assert_eq!(transport.requests()[0].path, "time");
}

#[tokio::test]
async fn test_get_tickers() {
    let transport = MockTransport::default();
    transport
        .push_response(json!([{ "productSymbol": "btcperp" }, { "productSymbol": "ethperp" }]))
        .push_response(json!({ "productSymbol": "ethperp", "lastPrice": "3400000000000000000000" }));
    let client = testing::client(transport.clone(), MockGateway::default());

    assert_eq!(client.get_tickers(None).await.data.len(), 2);
    let single = client.get_tickers(Some("ethperp")).await.data;
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].last_price, "3400000000000000000000");

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "ticker/24hr");
    assert_eq!(request.query_value("symbol"), Some("ethperp"));
}

#[tokio::test]
async fn test_get_klines() {
    let transport = MockTransport::default().with_fallback(json!([]));
    let client = testing::client(transport.clone(), MockGateway::default());
    let now = nonce::now_ms();

    let response = client
        .get_klines(
            "ethperp",
            KlineQuery {
                start_time: Some(now - 3_600_000),
                end_time: Some(now),
                interval: Some(Interval::M5),
                limit: Some(12),
            },
        )
        .await;
    assert!(response.is_success());

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "uiKlines");
    assert_eq!(request.query_value("symbol"), Some("ethperp"));
    assert_eq!(request.query_value("interval"), Some("5m"));
    assert_eq!(request.query_value("limit"), Some("12"));
    assert_eq!(
        request.query_value("startTime"),
        Some((now - 3_600_000).to_string().as_str())
    );
}

#[tokio::test]
async fn test_get_klines_validation_skips_network() {
    let transport = MockTransport::default().with_fallback(json!([]));
    let client = testing::client(transport.clone(), MockGateway::default());
    let now = nonce::now_ms();

    let invalid = [
        KlineQuery {
            limit: Some(1001),
            ..Default::default()
        },
        KlineQuery {
            limit: Some(0),
            ..Default::default()
        },
        KlineQuery {
            start_time: Some(now + 86_400_000),
            ..Default::default()
        },
        KlineQuery {
            start_time: Some(now - 1_000),
            end_time: Some(now - 2_000),
            ..Default::default()
        },
    ];
    for query in invalid {
        let response = client.get_klines("ethperp", query).await;
        assert_eq!(response.error.unwrap().kind, ErrorKind::Validation);
        assert!(response.data.is_empty());
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_get_order_book() {
    let transport = MockTransport::default().with_fallback(json!({
        "bids": [["3399000000000000000000", "5000000000000000000"]],
        "asks": [["3401000000000000000000", "2000000000000000000"]],
    }));
    let client = testing::client(transport.clone(), MockGateway::default());

    let book = client
        .get_order_book(
            "ethperp",
            OrderBookQuery {
                limit: Some(5),
                granularity: Some(10),
            },
        )
        .await
        .data
        .unwrap();
    assert_eq!(book.bids.len(), 1);
    assert_eq!(book.asks[0].1, "2000000000000000000");

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "depth");
    assert_eq!(request.query_value("granularity"), Some("10"));

    let invalid = client
        .get_order_book(
            "ethperp",
            OrderBookQuery {
                limit: Some(1001),
                granularity: None,
            },
        )
        .await;
    assert_eq!(invalid.error.unwrap().kind, ErrorKind::Validation);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_get_trade_history() {
    let transport = MockTransport::default().with_fallback(json!([{
        "id": "1",
        "productId": 1002,
        "price": "3400000000000000000000",
        "quantity": "1000000000000000",
    }]));
    let client = testing::client(transport.clone(), MockGateway::default());

    let trades = client.get_trade_history("ethperp", 10).await.data;
    assert_eq!(trades.len(), 1);

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "trade-history");
    assert_eq!(request.query_value("lookback"), Some("10"));
    assert_eq!(
        request.query_value("account"),
        Some(testing::ADDRESS.to_string().as_str())
    );
    assert_eq!(request.query_value("subAccountId"), Some("1"));

    let invalid = client.get_trade_history("ethperp", 0).await;
    assert_eq!(invalid.error.unwrap().kind, ErrorKind::Validation);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_calculate_margin_requirement() {
    let transport =
        MockTransport::default().with_fallback(json!({ "margin": "172500000000000000" }));
    let client = testing::client(transport.clone(), MockGateway::default());

    let response = client
        .calculate_margin_requirement(MarginQuery {
            product_id: 1002,
            is_buy: true,
            price: udec128!(3450),
            quantity: udec128!(0.001),
        })
        .await;
    assert_eq!(response.data, Some(U256::from(172_500_000_000_000_000u64)));

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "new-order-margin");
    assert_eq!(request.query_value("isBuy"), Some("true"));
    assert_eq!(request.query_value("price"), Some("3450000000000000000000"));
    assert_eq!(request.query_value("quantity"), Some("1000000000000000"));
    assert_eq!(request.query_value("productId"), Some("1002"));

    let invalid = client
        .calculate_margin_requirement(MarginQuery {
            product_id: 1002,
            is_buy: true,
            price: udec128!(0),
            quantity: udec128!(1),
        })
        .await;
    assert_eq!(invalid.error.unwrap().kind, ErrorKind::Validation);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_get_product_symbol_is_path_encoded() {
    let transport = MockTransport::default().with_fallback(products()[1].clone());
    let client = testing::client(transport.clone(), MockGateway::default());

    assert!(client.get_product("eth/perp?x=1").await.is_success());

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "products/eth%2Fperp%3Fx%3D1");
    assert!(request.query.is_empty());
    let url = request
        .url(&url::Url::parse("https://api.ciaobella.dev/v1").unwrap())
        .unwrap();
    assert_eq!(url.path(), "/v1/products/eth%2Fperp%3Fx%3D1");
    assert_eq!(url.query(), None);
}
