use cosmwasm_std::{
    ensure_eq, to_json_binary, Deps, DepsMut, Env, Int128, MessageInfo, QueryResponse, Response,
    StdError, StdResult, Timestamp,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use price_feed::{DecimalsResponse, RoundDataResponse};

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::state::{Config, CONFIG, LATEST_ROUND};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    CONFIG.save(
        deps.storage,
        &Config {
            owner: info.sender.clone(),
            decimals: msg.decimals,
        },
    )?;
    LATEST_ROUND.save(
        deps.storage,
        &RoundDataResponse {
            round_id: 1,
            answer: msg.initial_answer,
            started_at: env.block.time,
            updated_at: env.block.time,
        },
    )?;
    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("owner", info.sender)
        .add_attribute("answer", msg.initial_answer.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateAnswer { answer } => {
            let round_id = LATEST_ROUND
                .load(deps.storage)?
                .round_id
                .checked_add(1)
                .ok_or_else(|| StdError::generic_err("Round ID overflow"))?;
            execute_update_round(
                deps,
                info,
                round_id,
                answer,
                env.block.time,
                env.block.time,
            )
        }
        ExecuteMsg::UpdateRoundData {
            round_id,
            answer,
            started_at,
            updated_at,
        } => execute_update_round(deps, info, round_id, answer, started_at, updated_at),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    match msg {
        QueryMsg::LatestRoundData {} => to_json_binary(&LATEST_ROUND.load(deps.storage)?),
        QueryMsg::Decimals {} => to_json_binary(&DecimalsResponse {
            decimals: CONFIG.load(deps.storage)?.decimals,
        }),
    }
}

fn execute_update_round(
    deps: DepsMut,
    info: MessageInfo,
    round_id: u64,
    answer: Int128,
    started_at: Timestamp,
    updated_at: Timestamp,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_eq!(info.sender, config.owner, ContractError::Unauthorized);

    LATEST_ROUND.save(
        deps.storage,
        &RoundDataResponse {
            round_id,
            answer,
            started_at,
            updated_at,
        },
    )?;
    Ok(Response::new()
        .add_attribute("action", "update_round")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("answer", answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::from_json;
    use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env};

    #[test]
    fn instantiate_and_query_works() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let msg = InstantiateMsg {
            decimals: 8,
            initial_answer: Int128::new(3000_00000000),
        };
        instantiate(deps.as_mut(), mock_env(), message_info(&owner, &[]), msg).unwrap();

        let decimals: DecimalsResponse =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::Decimals {}).unwrap()).unwrap();
        assert_eq!(decimals.decimals, 8);

        let round: RoundDataResponse =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::LatestRoundData {}).unwrap())
                .unwrap();
        assert_eq!(
            round,
            RoundDataResponse {
                round_id: 1,
                answer: Int128::new(3000_00000000),
                started_at: mock_env().block.time,
                updated_at: mock_env().block.time,
            }
        );
    }

    #[test]
    fn update_answer_works() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let msg = InstantiateMsg {
            decimals: 8,
            initial_answer: Int128::new(3000_00000000),
        };
        instantiate(deps.as_mut(), mock_env(), message_info(&owner, &[]), msg).unwrap();

        let mut env = mock_env();
        env.block.time = env.block.time.plus_seconds(30);
        let msg = ExecuteMsg::UpdateAnswer {
            answer: Int128::new(2500_00000000),
        };

        let intruder = deps.api.addr_make("intruder");
        let err = execute(
            deps.as_mut(),
            env.clone(),
            message_info(&intruder, &[]),
            msg.clone(),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);

        execute(deps.as_mut(), env.clone(), message_info(&owner, &[]), msg).unwrap();
        let round: RoundDataResponse =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::LatestRoundData {}).unwrap())
                .unwrap();
        assert_eq!(round.round_id, 2);
        assert_eq!(round.answer, Int128::new(2500_00000000));
        assert_eq!(round.updated_at, env.block.time);
    }

    #[test]
    fn update_answer_fails_after_last_round_id() {
        let mut deps = mock_dependencies();
        let owner = deps.api.addr_make("owner");
        let msg = InstantiateMsg {
            decimals: 8,
            initial_answer: Int128::new(3000_00000000),
        };
        instantiate(deps.as_mut(), mock_env(), message_info(&owner, &[]), msg).unwrap();

        let msg = ExecuteMsg::UpdateRoundData {
            round_id: u64::MAX,
            answer: Int128::new(3000_00000000),
            started_at: mock_env().block.time,
            updated_at: mock_env().block.time,
        };
        execute(deps.as_mut(), mock_env(), message_info(&owner, &[]), msg).unwrap();

        let msg = ExecuteMsg::UpdateAnswer {
            answer: Int128::new(2500_00000000),
        };
        let err = execute(deps.as_mut(), mock_env(), message_info(&owner, &[]), msg).unwrap_err();
        assert!(matches!(err, ContractError::Std(StdError::GenericErr { .. })));

        // The last round stays in place
        let round: RoundDataResponse =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::LatestRoundData {}).unwrap())
                .unwrap();
        assert_eq!(round.round_id, u64::MAX);
        assert_eq!(round.answer, Int128::new(3000_00000000));
    }
}
