// Testing utils. See tests folder for actual tests.

use cosmwasm_std::{Addr, Attribute, Coin, Int128};
use cw_multi_test::{App, BankSudo, ContractWrapper, Executor, SudoMsg};

/// The native denom used in tests. 18 decimals like wei.
pub const DENOM: &str = "aeth";
pub const NATIVE_DECIMALS: u32 = 18;
pub const FEED_DECIMALS: u32 = 8;
/// Staleness limit of the deployed ledger in seconds
pub const MAX_PRICE_AGE: u64 = 3600;

/// Gets the value of the first attribute with the given key
pub fn first_attr(data: impl AsRef<[Attribute]>, search_key: &str) -> Option<String> {
    data.as_ref().iter().find_map(|a| {
        if a.key == search_key {
            Some(a.value.clone())
        } else {
            None
        }
    })
}

pub fn mint_native(app: &mut App, beneficiary: &Addr, denom: &str, amount: u128) {
    app.sudo(SudoMsg::Bank(BankSudo::Mint {
        to_address: beneficiary.to_string(),
        amount: vec![Coin::new(amount, denom)],
    }))
    .unwrap();
}

pub fn query_balance_native(app: &App, address: &Addr, denom: &str) -> Coin {
    app.wrap().query_balance(address, denom).unwrap()
}

/// Addresses of a deployed ledger and its price feed
pub struct Deployment {
    pub ledger: Addr,
    pub feed: Addr,
    /// Instantiator of the feed, allowed to publish prices
    pub feed_owner: Addr,
    pub manager: Addr,
}

/// Deploys a price feed answering `answer` (8 decimals) and a ledger reading from it
pub fn deploy(app: &mut App, answer: i128) -> Deployment {
    let feed_owner = app.api().addr_make("feed owner");
    let manager = app.api().addr_make("manager");

    let code_feed = ContractWrapper::new(
        price_feed_mock::contract::execute,
        price_feed_mock::contract::instantiate,
        price_feed_mock::contract::query,
    );
    let code_id_feed = app.store_code(Box::new(code_feed));
    let feed = app
        .instantiate_contract(
            code_id_feed,
            feed_owner.clone(),
            &price_feed_mock::msg::InstantiateMsg {
                decimals: FEED_DECIMALS,
                initial_answer: Int128::new(answer),
            },
            &[],
            "ETH/USD",
            None,
        )
        .unwrap();

    let code_ledger = ContractWrapper::new(
        job_ledger::contract::execute,
        job_ledger::contract::instantiate,
        job_ledger::contract::query,
    );
    let code_id_ledger = app.store_code(Box::new(code_ledger));
    let ledger = app
        .instantiate_contract(
            code_id_ledger,
            manager.clone(),
            &job_ledger::InstantiateMsg {
                manager: manager.to_string(),
                price_feed: feed.to_string(),
                denom: DENOM.to_string(),
                native_decimals: NATIVE_DECIMALS,
                max_price_age: Some(MAX_PRICE_AGE),
            },
            &[],
            "Job Ledger",
            None,
        )
        .unwrap();

    Deployment {
        ledger,
        feed,
        feed_owner,
        manager,
    }
}
