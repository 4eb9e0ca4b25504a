use cosmwasm_schema::write_api;

use job_ledger::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};

fn main() {
    write_api! {
        instantiate: InstantiateMsg,
        query: QueryMsg,
        execute: ExecuteMsg,
        migrate: cosmwasm_std::Empty,
    }
}
