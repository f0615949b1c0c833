#[allow(clippy::too_many_arguments)]
pub mod erc20 {
    alloy::sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        interface IERC20 {
            function allowance(address owner, address spender) external view returns (uint256);
            function approve(address spender, uint256 amount) external returns (bool);
        }
    );
}

#[allow(clippy::too_many_arguments)]
pub mod ciao {
    alloy::sol!(
        /// Exchange contract holding the margin collateral.
        #[derive(Debug, PartialEq, Eq)]
        #[sol(rpc)]
        interface Ciao {
            function deposit(address account, uint8 subAccountId, uint256 quantity, address asset) external;

            error BalanceInsufficient();
            error DepositQuantityInvalid();
            error InvalidInitialization();
            error NotInitializing();
            error ProductInvalid();
            error ReentrancyGuardReentrantCall();
            error SenderInvalid();
            error WithdrawQuantityInvalid();
        }
    );
}

/// EIP-712 schemas of the signed API messages.
pub mod eip712 {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        struct Order {
            address account;
            uint8 subAccountId;
            uint32 productId;
            bool isBuy;
            uint8 orderType;
            uint8 timeInForce;
            uint64 expiration;
            uint128 price;
            uint128 quantity;
            uint64 nonce;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct CancelOrders {
            address account;
            uint8 subAccountId;
            uint32 productId;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct CancelOrder {
            address account;
            uint8 subAccountId;
            uint32 productId;
            string orderId;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Withdraw {
            address account;
            uint8 subAccountId;
            address asset;
            uint128 quantity;
            uint64 nonce;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Referral {
            address account;
            string code;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct SignedAuthentication {
            address account;
            uint8 subAccountId;
        }
    );
}
