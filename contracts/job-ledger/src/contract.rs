use cosmwasm_std::{
    ensure, ensure_eq, to_json_binary, BankMsg, Coin, Deps, DepsMut, Empty, Env, Event,
    MessageInfo, Order, QueryResponse, Response, StdError, StdResult, Uint128,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cw_storage_plus::Bound;

use crate::attributes::{
    ATTR_ACTION, ATTR_AMOUNT, ATTR_DATA_URL, ATTR_JOB_ID, ATTR_PROVIDER, ATTR_REFUND,
    ATTR_REQUESTER, ATTR_RESULT_URL, ATTR_REWARD_NATIVE, ATTR_REWARD_USD, ATTR_SCRIPT_URL,
    EVENT_TYPE_JOB_ACCEPTED, EVENT_TYPE_JOB_APPROVED, EVENT_TYPE_JOB_CANCELLED,
    EVENT_TYPE_JOB_POSTED, EVENT_TYPE_JOB_RESULT_SUBMITTED,
};
use crate::conversion::{usd_to_native, MAX_NATIVE_DECIMALS, USD_DECIMALS};
use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ConversionResponse, ExecuteMsg, InstantiateMsg, JobsResponse,
    PostJobResponse, QueryMsg, RateResponse, StatsResponse,
};
use crate::oracle::current_rate;
use crate::payment::{excess_payment, paid_amount, validate_url};
use crate::state::{
    allocate_job_id, job_count, load_job, lock_escrow, release_escrow, total_escrowed, Config,
    Job, JobStatus, CONFIG, JOBS,
};

const CONTRACT_NAME: &str = "crates.io:job-ledger";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let InstantiateMsg {
        manager,
        price_feed,
        denom,
        native_decimals,
        max_price_age,
    } = msg;

    let manager = deps.api.addr_validate(&manager)?;
    let price_feed = deps.api.addr_validate(&price_feed)?;
    if denom.is_empty() {
        return Err(StdError::generic_err("Denom must not be empty").into());
    }
    ensure!(
        native_decimals <= MAX_NATIVE_DECIMALS,
        ContractError::NativeDecimalsTooHigh {
            max: MAX_NATIVE_DECIMALS
        }
    );

    let config = Config {
        manager,
        price_feed,
        denom,
        native_decimals,
        max_price_age: max_price_age.filter(|age| *age != 0),
    };
    CONFIG.save(deps.storage, &config)?;
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "instantiate")
        .add_attribute("price_feed", config.price_feed)
        .add_attribute("denom", config.denom))
}

// This no-op migrate implementation allows us to upgrade within the 0.1 series.
// No state changes expected.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: Empty) -> StdResult<Response> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::PostJob {
            data_url,
            script_url,
            reward_usd,
        } => execute_post_job(deps, env, info, data_url, script_url, reward_usd),
        ExecuteMsg::AcceptJob { job_id } => execute_accept_job(deps, info, job_id),
        ExecuteMsg::SubmitResult { job_id, result_url } => {
            execute_submit_result(deps, info, job_id, result_url)
        }
        ExecuteMsg::ApproveAndPay { job_id } => execute_approve_and_pay(deps, info, job_id),
        ExecuteMsg::CancelJob { job_id } => execute_cancel_job(deps, info, job_id),
        ExecuteMsg::SetConfig {
            manager,
            price_feed,
            max_price_age,
        } => execute_set_config(deps, info, manager, price_feed, max_price_age),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<QueryResponse, ContractError> {
    let response = match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?)?,
        QueryMsg::Job { job_id } => to_json_binary(&load_job(deps.storage, job_id)?)?,
        QueryMsg::JobsAsc { start_after, limit } => {
            to_json_binary(&query_jobs(deps, start_after, limit, Order::Ascending)?)?
        }
        QueryMsg::JobsDesc { start_after, limit } => {
            to_json_binary(&query_jobs(deps, start_after, limit, Order::Descending)?)?
        }
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?)?,
        QueryMsg::CurrentRate {} => to_json_binary(&query_current_rate(deps, &env)?)?,
        QueryMsg::ConvertUsdToNative { usd_amount } => {
            to_json_binary(&query_convert_usd_to_native(deps, &env, usd_amount)?)?
        }
    };
    Ok(response)
}

/// The native amount a USD reward converts to at the current feed price.
/// Posting and estimating share this path so an estimate matches what gets escrowed.
fn required_native(
    deps: Deps,
    env: &Env,
    config: &Config,
    reward_usd: Uint128,
) -> Result<Uint128, ContractError> {
    let rate = current_rate(deps, env, config)?;
    usd_to_native(
        reward_usd,
        USD_DECIMALS,
        rate.price,
        rate.decimals,
        config.native_decimals,
    )
}

fn execute_post_job(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    data_url: String,
    script_url: Option<String>,
    reward_usd: Uint128,
) -> Result<Response, ContractError> {
    ensure!(!reward_usd.is_zero(), ContractError::ZeroReward);
    ensure!(!data_url.is_empty(), ContractError::EmptyDataUrl);
    validate_url(&data_url)?;
    if let Some(script_url) = &script_url {
        validate_url(script_url)?;
    }

    let config = CONFIG.load(deps.storage)?;
    let paid = paid_amount(&info.funds, &config.denom)?;
    let required = required_native(deps.as_ref(), &env, &config, reward_usd)?;
    // A reward worth less than one native unit cannot be escrowed
    ensure!(!required.is_zero(), ContractError::ZeroReward);
    let refund = excess_payment(paid, required)?;

    let job_id = allocate_job_id(deps.storage)?;
    let job = Job {
        id: job_id,
        requester: info.sender.clone(),
        provider: None,
        data_url,
        script_url,
        result_url: None,
        reward_usd,
        reward_native: Coin {
            denom: config.denom.clone(),
            amount: required,
        },
        status: JobStatus::Open,
        posted_at: env.block.time,
    };
    JOBS.save(deps.storage, job_id, &job)?;
    lock_escrow(deps.storage, required)?;

    let mut event = Event::new(EVENT_TYPE_JOB_POSTED)
        .add_attribute(ATTR_JOB_ID, job_id.to_string())
        .add_attribute(ATTR_REQUESTER, &job.requester)
        .add_attribute(ATTR_REWARD_USD, job.reward_usd.to_string())
        .add_attribute(ATTR_REWARD_NATIVE, job.reward_native.to_string())
        .add_attribute(ATTR_DATA_URL, &job.data_url);
    if let Some(script_url) = &job.script_url {
        event = event.add_attribute(ATTR_SCRIPT_URL, script_url);
    }

    let mut res = Response::new()
        .add_attribute(ATTR_ACTION, "post_job")
        .add_event(event)
        .set_data(to_json_binary(&PostJobResponse { job_id })?);
    if !refund.is_zero() {
        res = res.add_message(BankMsg::Send {
            to_address: info.sender.into(),
            amount: vec![Coin {
                denom: config.denom,
                amount: refund,
            }],
        });
    }
    Ok(res)
}

fn execute_accept_job(
    deps: DepsMut,
    info: MessageInfo,
    job_id: u64,
) -> Result<Response, ContractError> {
    let mut job = load_job(deps.storage, job_id)?;
    job.ensure_status(JobStatus::Open)?;

    job.provider = Some(info.sender.clone());
    job.status = JobStatus::InProgress;
    JOBS.save(deps.storage, job_id, &job)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "accept_job")
        .add_event(
            Event::new(EVENT_TYPE_JOB_ACCEPTED)
                .add_attribute(ATTR_JOB_ID, job_id.to_string())
                .add_attribute(ATTR_PROVIDER, info.sender),
        ))
}

fn execute_submit_result(
    deps: DepsMut,
    info: MessageInfo,
    job_id: u64,
    result_url: String,
) -> Result<Response, ContractError> {
    let mut job = load_job(deps.storage, job_id)?;
    job.ensure_status(JobStatus::InProgress)?;
    ensure_eq!(
        job.provider.as_ref(),
        Some(&info.sender),
        ContractError::UnauthorizedSubmit
    );
    ensure!(!result_url.is_empty(), ContractError::EmptyResultUrl);
    validate_url(&result_url)?;

    job.result_url = Some(result_url.clone());
    job.status = JobStatus::PendingApproval;
    JOBS.save(deps.storage, job_id, &job)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "submit_result")
        .add_event(
            Event::new(EVENT_TYPE_JOB_RESULT_SUBMITTED)
                .add_attribute(ATTR_JOB_ID, job_id.to_string())
                .add_attribute(ATTR_PROVIDER, info.sender)
                .add_attribute(ATTR_RESULT_URL, result_url),
        ))
}

fn execute_approve_and_pay(
    deps: DepsMut,
    info: MessageInfo,
    job_id: u64,
) -> Result<Response, ContractError> {
    let mut job = load_job(deps.storage, job_id)?;
    job.ensure_status(JobStatus::PendingApproval)?;
    ensure_eq!(
        info.sender,
        job.requester,
        ContractError::UnauthorizedApprove
    );
    let provider = job
        .provider
        .clone()
        .ok_or_else(|| StdError::generic_err("Job pending approval without provider"))?;

    job.status = JobStatus::Completed;
    JOBS.save(deps.storage, job_id, &job)?;
    release_escrow(deps.storage, job.reward_native.amount)?;

    // If this transfer fails the whole transaction is reverted, leaving the job pending
    // approval with its escrow in place.
    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: provider.to_string(),
            amount: vec![job.reward_native.clone()],
        })
        .add_attribute(ATTR_ACTION, "approve_and_pay")
        .add_event(
            Event::new(EVENT_TYPE_JOB_APPROVED)
                .add_attribute(ATTR_JOB_ID, job_id.to_string())
                .add_attribute(ATTR_PROVIDER, provider)
                .add_attribute(ATTR_AMOUNT, job.reward_native.to_string()),
        ))
}

fn execute_cancel_job(
    deps: DepsMut,
    info: MessageInfo,
    job_id: u64,
) -> Result<Response, ContractError> {
    let mut job = load_job(deps.storage, job_id)?;
    job.ensure_status(JobStatus::Open)?;
    ensure_eq!(
        info.sender,
        job.requester,
        ContractError::UnauthorizedCancel
    );

    job.status = JobStatus::Cancelled;
    JOBS.save(deps.storage, job_id, &job)?;
    release_escrow(deps.storage, job.reward_native.amount)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: job.requester.to_string(),
            amount: vec![job.reward_native.clone()],
        })
        .add_attribute(ATTR_ACTION, "cancel_job")
        .add_event(
            Event::new(EVENT_TYPE_JOB_CANCELLED)
                .add_attribute(ATTR_JOB_ID, job_id.to_string())
                .add_attribute(ATTR_REQUESTER, job.requester)
                .add_attribute(ATTR_REFUND, job.reward_native.to_string()),
        ))
}

fn execute_set_config(
    deps: DepsMut,
    info: MessageInfo,
    manager: Option<String>,
    price_feed: Option<String>,
    max_price_age: Option<u64>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // check the calling address is the manager
    ensure_eq!(info.sender, config.manager, ContractError::Unauthorized);

    let manager = match manager {
        Some(ma) => deps.api.addr_validate(&ma)?,
        None => config.manager,
    };
    let price_feed = match price_feed {
        Some(pf) => deps.api.addr_validate(&pf)?,
        None => config.price_feed,
    };
    let max_price_age = match max_price_age {
        Some(0) => None,
        Some(age) => Some(age),
        None => config.max_price_age,
    };

    let new_config = Config {
        manager,
        price_feed,
        max_price_age,
        // denom and decimals define the meaning of escrowed amounts and never change
        denom: config.denom,
        native_decimals: config.native_decimals,
    };
    CONFIG.save(deps.storage, &new_config)?;

    Ok(Response::new().add_attribute(ATTR_ACTION, "set_config"))
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    CONFIG.load(deps.storage)
}

fn query_jobs(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
    order: Order,
) -> StdResult<JobsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let (low_bound, top_bound) = match order {
        Order::Ascending => (start_after.map(Bound::exclusive), None),
        Order::Descending => (None, start_after.map(Bound::exclusive)),
    };

    let jobs = JOBS
        .range(deps.storage, low_bound, top_bound, order)
        .take(limit)
        .map(|item| item.map(|(_id, job)| job))
        .collect::<StdResult<Vec<Job>>>()?;
    Ok(JobsResponse { jobs })
}

fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(StatsResponse {
        jobs: job_count(deps.storage)?,
        escrowed: Coin {
            denom: config.denom,
            amount: total_escrowed(deps.storage)?,
        },
    })
}

fn query_current_rate(deps: Deps, env: &Env) -> Result<RateResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let rate = current_rate(deps, env, &config)?;
    Ok(RateResponse {
        price: rate.price,
        decimals: rate.decimals,
        updated_at: rate.updated_at,
    })
}

fn query_convert_usd_to_native(
    deps: Deps,
    env: &Env,
    usd_amount: Uint128,
) -> Result<ConversionResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let amount = required_native(deps, env, &config, usd_amount)?;
    Ok(ConversionResponse {
        usd_amount,
        native: Coin {
            denom: config.denom,
            amount,
        },
    })
}
