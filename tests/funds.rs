use alloy::primitives::{U256, address, bytes};
use fastnum::udec128;
use hundredx_sdk::{
    Chain, Config, ErrorKind,
    abi::eip712,
    deposit::{DepositRequest, ReceiptPolicy},
    nonce,
    response::UNKNOWN_ERROR_MESSAGE,
    signing,
    testing::{self, GatewayCall, MockGateway, MockTransport},
};
use serde_json::json;

fn scaled(units: u64) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(18u64))
}

fn approvals(gateway: &MockGateway) -> usize {
    gateway
        .calls()
        .iter()
        .filter(|call| matches!(call, GatewayCall::Approve { .. }))
        .count()
}

#[tokio::test(start_paused = true)]
async fn test_deposit_approves_then_deposits() {
    let chain = Chain::testnet();
    let gateway = MockGateway::default().with_allowance(scaled(10));
    gateway.push_receipt(None);
    let client = testing::client(MockTransport::default(), gateway.clone());

    let response = client.deposit(udec128!(100), None).await;

    assert!(response.is_success());
    assert_eq!(response.data, Some(testing::DEPOSIT_TX_HASH));

    let calls = gateway.calls();
    let approve = calls
        .iter()
        .position(|call| matches!(call, GatewayCall::Approve { .. }))
        .unwrap();
    let deposit = calls
        .iter()
        .position(|call| matches!(call, GatewayCall::Deposit { .. }))
        .unwrap();
    assert!(approve < deposit);
    assert_eq!(
        calls[approve],
        GatewayCall::Approve {
            token: chain.usdb(),
            spender: chain.exchange(),
            amount: scaled(100),
        }
    );
    assert_eq!(
        calls[deposit],
        GatewayCall::Deposit {
            exchange: chain.exchange(),
            request: DepositRequest {
                account: testing::ADDRESS,
                sub_account_id: 1,
                quantity: scaled(100),
                asset: chain.usdb(),
            },
        }
    );
}

#[tokio::test]
async fn test_deposit_skips_approval_with_sufficient_allowance() {
    let gateway = MockGateway::default().with_allowance(scaled(100));
    let client = testing::client(MockTransport::default(), gateway.clone());

    let response = client.deposit(udec128!(100), None).await;

    assert!(response.is_success());
    assert_eq!(approvals(&gateway), 0);
    assert!(
        gateway
            .calls()
            .iter()
            .any(|call| matches!(call, GatewayCall::Deposit { .. }))
    );
}

#[tokio::test]
async fn test_deposit_known_revert() {
    let gateway = MockGateway::default()
        .with_allowance(scaled(100))
        .with_deposit_revert(bytes!("5220d104"));
    let client = testing::client(MockTransport::default(), gateway);

    let response = client.deposit(udec128!(0), None).await;

    assert!(response.data.is_none());
    let error = response.error.unwrap();
    assert_eq!(error.kind, ErrorKind::Revert);
    assert_eq!(error.error_name.as_deref(), Some("DepositQuantityInvalid"));
    assert_eq!(error.message, "Invalid deposit quantity.");
}

#[tokio::test]
async fn test_deposit_unknown_failure() {
    let gateway = MockGateway::default()
        .with_allowance(scaled(100))
        .with_deposit_failure("nonce too low");
    let client = testing::client(MockTransport::default(), gateway);

    let error = client.deposit(udec128!(1), None).await.error.unwrap();

    assert_eq!(error.kind, ErrorKind::Unknown);
    assert_eq!(error.message, UNKNOWN_ERROR_MESSAGE);
    assert!(error.error_name.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_deposit_bounded_receipt_policy() {
    let gateway = MockGateway::default().with_allowance(scaled(100));
    for _ in 0..3 {
        gateway.push_receipt(None);
    }
    let config = Config::default().with_receipt_policy(ReceiptPolicy::bounded(2));
    let client = testing::client_with_config(MockTransport::default(), gateway, &config);

    let error = client.deposit(udec128!(1), None).await.error.unwrap();

    assert_eq!(error.kind, ErrorKind::Unknown);
}

#[tokio::test]
async fn test_withdraw() {
    let transport = MockTransport::default().with_fallback(json!({ "success": true }));
    let client = testing::client(transport.clone(), MockGateway::default());

    let before = nonce::now_ms();
    let response = client.withdraw(udec128!(100), None).await;
    assert!(response.is_success());

    let request = transport.last_request().unwrap();
    assert_eq!(request.path, "withdraw");
    let body = request.body.unwrap();
    assert_eq!(body["quantity"], "100000000000000000000");
    assert_eq!(body["subAccountId"], 1);

    let nonce = body["nonce"].as_u64().unwrap();
    assert!(nonce >= before * 10_000);

    let message = eip712::Withdraw {
        account: testing::ADDRESS,
        subAccountId: 1,
        asset: address!("0x79a59c326c715ac2d31c169c85d1232319e341ce"),
        quantity: 100_000_000_000_000_000_000,
        nonce,
    };
    assert_eq!(
        signing::recover(body["signature"].as_str().unwrap(), &message, client.domain()).unwrap(),
        testing::ADDRESS
    );
}

#[tokio::test]
async fn test_withdraw_errors() {
    let transport = MockTransport::default();
    transport
        .push_response(json!({ "error": "A known error occurred" }))
        .push_failure("An unknown error occurred");
    let client = testing::client(transport, MockGateway::default());

    let known = client.withdraw(udec128!(100), None).await.error.unwrap();
    assert_eq!(known.kind, ErrorKind::Api);
    assert_eq!(known.message, "A known error occurred");

    let unknown = client.withdraw(udec128!(100), None).await.error.unwrap();
    assert_eq!(unknown.kind, ErrorKind::Unknown);
    assert_eq!(unknown.message, UNKNOWN_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_add_referee() {
    let transport = MockTransport::default().with_fallback(json!({ "success": true }));
    let client = testing::client(transport.clone(), MockGateway::default());

    assert!(client.add_referee("eaglesx").await.is_success());
    assert_eq!(
        client.add_referee("").await.error.unwrap().kind,
        ErrorKind::Validation
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "referral/add-referee");
    let body = requests[0].body.as_ref().unwrap();
    let message = eip712::Referral {
        account: testing::ADDRESS,
        code: "eaglesx".to_string(),
    };
    assert_eq!(
        signing::recover(body["signature"].as_str().unwrap(), &message, client.domain()).unwrap(),
        testing::ADDRESS
    );
}
