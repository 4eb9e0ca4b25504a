use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, Coin, Uint128, WasmMsg};
use job_ledger::ExecuteMsg;

use crate::error::EncodeError;

/// The job actions a party can sign without attaching funds
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Action {
    Accept,
    Submit,
    Approve,
    Cancel,
}

/// A request as sent by a client, e.g. `{"action":"submit","job_id":3,"result_url":"ipfs://.."}`
#[cw_serde]
pub struct ActionRequest {
    pub action: Action,
    pub job_id: u64,
    /// Only used by `submit`
    pub result_url: Option<String>,
}

/// Builds the ledger call for an action. The caller signs and broadcasts it.
///
/// Only the shape of the request is checked here. Whether the action is allowed is
/// decided by the ledger when the message executes.
pub fn encode_action(ledger: &Addr, request: &ActionRequest) -> Result<WasmMsg, EncodeError> {
    let job_id = request.job_id;
    let msg = match request.action {
        Action::Accept => ExecuteMsg::AcceptJob { job_id },
        Action::Submit => {
            let result_url = request
                .result_url
                .clone()
                .filter(|url| !url.is_empty())
                .ok_or(EncodeError::MissingResultUrl)?;
            ExecuteMsg::SubmitResult { job_id, result_url }
        }
        Action::Approve => ExecuteMsg::ApproveAndPay { job_id },
        Action::Cancel => ExecuteMsg::CancelJob { job_id },
    };
    Ok(WasmMsg::Execute {
        contract_addr: ledger.to_string(),
        msg: to_json_binary(&msg)?,
        funds: vec![],
    })
}

/// Builds a `PostJob` call paying `payment`, usually the result of a
/// `ConvertUsdToNative` query made right before.
pub fn encode_post_job(
    ledger: &Addr,
    data_url: impl Into<String>,
    script_url: Option<String>,
    reward_usd: Uint128,
    payment: Coin,
) -> Result<WasmMsg, EncodeError> {
    let msg = ExecuteMsg::PostJob {
        data_url: data_url.into(),
        script_url,
        reward_usd,
    };
    Ok(WasmMsg::Execute {
        contract_addr: ledger.to_string(),
        msg: to_json_binary(&msg)?,
        funds: vec![payment],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{coin, from_json, Binary};

    const LEDGER: &str = "ledger";

    fn request(json: &str) -> ActionRequest {
        from_json(json.as_bytes()).unwrap()
    }

    #[test]
    fn encode_action_works() {
        let ledger = Addr::unchecked(LEDGER);

        let msg = encode_action(&ledger, &request(r#"{"action":"accept","job_id":7}"#)).unwrap();
        assert_eq!(
            msg,
            WasmMsg::Execute {
                contract_addr: LEDGER.to_string(),
                msg: Binary::from(br#"{"accept_job":{"job_id":7}}"#),
                funds: vec![],
            }
        );

        let msg = encode_action(
            &ledger,
            &request(r#"{"action":"submit","job_id":7,"result_url":"ipfs://out"}"#),
        )
        .unwrap();
        assert_eq!(
            msg,
            WasmMsg::Execute {
                contract_addr: LEDGER.to_string(),
                msg: Binary::from(br#"{"submit_result":{"job_id":7,"result_url":"ipfs://out"}}"#),
                funds: vec![],
            }
        );

        let msg = encode_action(&ledger, &request(r#"{"action":"approve","job_id":0}"#)).unwrap();
        assert_eq!(
            msg,
            WasmMsg::Execute {
                contract_addr: LEDGER.to_string(),
                msg: Binary::from(br#"{"approve_and_pay":{"job_id":0}}"#),
                funds: vec![],
            }
        );

        let msg = encode_action(&ledger, &request(r#"{"action":"cancel","job_id":1}"#)).unwrap();
        assert_eq!(
            msg,
            WasmMsg::Execute {
                contract_addr: LEDGER.to_string(),
                msg: Binary::from(br#"{"cancel_job":{"job_id":1}}"#),
                funds: vec![],
            }
        );
    }

    #[test]
    fn encode_action_requires_result_url_for_submit() {
        let ledger = Addr::unchecked(LEDGER);

        let err = encode_action(&ledger, &request(r#"{"action":"submit","job_id":7}"#))
            .unwrap_err();
        assert_eq!(err, EncodeError::MissingResultUrl);

        let err = encode_action(
            &ledger,
            &request(r#"{"action":"submit","job_id":7,"result_url":""}"#),
        )
        .unwrap_err();
        assert_eq!(err, EncodeError::MissingResultUrl);
    }

    #[test]
    fn unknown_actions_are_rejected_by_the_parser() {
        from_json::<ActionRequest>(br#"{"action":"steal","job_id":7}"#).unwrap_err();
        from_json::<ActionRequest>(br#"{"action":"accept"}"#).unwrap_err();
    }

    #[test]
    fn encode_post_job_attaches_payment() {
        let ledger = Addr::unchecked(LEDGER);
        let msg = encode_post_job(
            &ledger,
            "ipfs://data",
            None,
            Uint128::new(10_00000000),
            coin(3_333_333_333_333_333, "aeth"),
        )
        .unwrap();
        assert_eq!(
            msg,
            WasmMsg::Execute {
                contract_addr: LEDGER.to_string(),
                msg: Binary::from(
                    br#"{"post_job":{"data_url":"ipfs://data","script_url":null,"reward_usd":"1000000000"}}"#
                ),
                funds: vec![coin(3_333_333_333_333_333, "aeth")],
            }
        );
    }
}
