//! Farm payloads: pool events and position objects.
//!
//! Numbers arrive as JSON strings (u64 does not fit a JS number), type names
//! as `{"name": "..."}` objects without the `0x` prefix.

use crate::decoder::{DecodedValue, RawReturnValue, decode, json_u64, json_u256};
use crate::error::DecodeError;
use crate::rpc::ObjectData;
use primitive_types::U256;
use serde_json::Value;
use suitrump_domain::entities::{LockPosition, StakingPosition};
use suitrump_domain::enums::LockPeriod;
use suitrump_domain::type_tag::{TypeTag, parse_struct_tag};

fn field<'a>(fields: &'a Value, name: &str) -> Result<&'a Value, DecodeError> {
    fields
        .get(name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| DecodeError::MissingField(name.to_string()))
}

/// First present field among `names`.
fn field_any<'a>(fields: &'a Value, names: &[&str]) -> Result<&'a Value, DecodeError> {
    names
        .iter()
        .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
        .ok_or_else(|| DecodeError::MissingField(names.join("|")))
}

fn type_name(value: &Value) -> Result<String, DecodeError> {
    match decode(&RawReturnValue::Scalar(value.clone()))? {
        DecodedValue::Text(name) => Ok(suitrump_domain::type_tag::normalize_type_string(&name)),
        other => Err(DecodeError::UnexpectedShape(format!(
            "expected type name, got {}",
            other
        ))),
    }
}

fn bool_field(fields: &Value, name: &str, default: bool) -> Result<bool, DecodeError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => decode(&RawReturnValue::Scalar(value.clone()))?
            .as_bool()
            .ok_or_else(|| DecodeError::UnexpectedShape(format!("{} is not a bool", name))),
    }
}

fn bps_field(fields: &Value, name: &str) -> Result<u32, DecodeError> {
    let raw = json_u64(field(fields, name)?)?;
    u32::try_from(raw).map_err(|_| DecodeError::Malformed {
        type_tag: "u64".to_string(),
        reason: format!("{} = {} is not a fee in bps", name, raw),
    })
}

/// UID fields render as `{"id": "0x..."}`; plain strings are accepted too.
fn object_id(value: &Value) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => map
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| DecodeError::UnexpectedShape(value.to_string())),
        _ => Err(DecodeError::UnexpectedShape(value.to_string())),
    }
}

/// A pool added to the farm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCreatedEvent {
    /// Canonical type string of the staked coin.
    pub pool_type: String,
    pub allocation_points: u64,
    pub deposit_fee_bps: u32,
    pub withdrawal_fee_bps: u32,
    pub is_lp_token: bool,
    pub is_native_pair: bool,
    pub active: bool,
}

impl PoolCreatedEvent {
    /// Parses the event's `parsedJson`.
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            pool_type: type_name(field(json, "pool_type")?)?,
            allocation_points: json_u64(field(json, "allocation_points")?)?,
            deposit_fee_bps: bps_field(json, "deposit_fee")?,
            withdrawal_fee_bps: bps_field(json, "withdrawal_fee")?,
            is_lp_token: bool_field(json, "is_lp_token", false)?,
            is_native_pair: bool_field(json, "is_native_pair", false)?,
            active: bool_field(json, "active", true)?,
        })
    }
}

/// A change to an existing pool's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolUpdatedEvent {
    pub pool_type: String,
    pub allocation_points: u64,
    pub deposit_fee_bps: u32,
    pub withdrawal_fee_bps: u32,
    pub active: bool,
}

impl PoolUpdatedEvent {
    pub fn from_json(json: &Value) -> Result<Self, DecodeError> {
        Ok(Self {
            pool_type: type_name(field(json, "pool_type")?)?,
            allocation_points: json_u64(field(json, "allocation_points")?)?,
            deposit_fee_bps: bps_field(json, "deposit_fee")?,
            withdrawal_fee_bps: bps_field(json, "withdrawal_fee")?,
            active: bool_field(json, "active", true)?,
        })
    }
}

fn u256_or_zero(fields: &Value, name: &str) -> Result<U256, DecodeError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(U256::zero()),
        Some(value) => json_u256(value),
    }
}

/// First type parameter of the object's type, if any.
fn first_type_param(object: &ObjectData) -> Option<String> {
    let tag = parse_struct_tag(object.type_string()?).ok()?;
    match tag.type_params.into_iter().next()? {
        TypeTag::Struct(inner) => Some(inner.to_string()),
        _ => None,
    }
}

/// Parses a farm stake object.
pub fn parse_staking_position(object: &ObjectData) -> Result<StakingPosition, DecodeError> {
    let fields = object.fields();
    let pool_type = match fields.get("pool_type") {
        Some(value) if !value.is_null() => type_name(value)?,
        _ => first_type_param(object).ok_or_else(|| DecodeError::MissingField("pool_type".to_string()))?,
    };

    Ok(StakingPosition {
        id: object.object_id.clone(),
        pool_type,
        amount: json_u256(field(fields, "amount")?)?,
        reward_debt: u256_or_zero(fields, "reward_debt")?,
        pending_rewards: u256_or_zero(fields, "pending_rewards")?,
        staked_at_ms: match fields.get("stake_timestamp") {
            Some(value) if !value.is_null() => json_u64(value)?,
            _ => 0,
        },
    })
}

/// Parses a token-locker lock object.
pub fn parse_lock_position(object: &ObjectData) -> Result<LockPosition, DecodeError> {
    let fields = object.fields();
    let coin_type = match fields.get("coin_type") {
        Some(value) if !value.is_null() => type_name(value)?,
        _ => first_type_param(object).ok_or_else(|| DecodeError::MissingField("coin_type".to_string()))?,
    };

    let locked_at_ms = json_u64(field_any(fields, &["lock_start", "locked_at"])?)?;
    let unlock_at_ms = json_u64(field_any(fields, &["lock_end", "unlock_at"])?)?;
    let lock_period = match fields.get("lock_period") {
        Some(value) if !value.is_null() => LockPeriod::from_duration_ms(json_u64(value)?),
        _ => LockPeriod::from_duration_ms(unlock_at_ms.saturating_sub(locked_at_ms)),
    };

    Ok(LockPosition {
        id: match fields.get("id") {
            Some(uid) => object_id(uid)?,
            None => object.object_id.clone(),
        },
        coin_type,
        amount: json_u256(field_any(fields, &["amount", "locked_balance"])?)?,
        locked_at_ms,
        unlock_at_ms,
        lock_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SUI_NAME: &str = "0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";

    fn object(object_type: &str, fields: Value) -> ObjectData {
        serde_json::from_value(json!({
            "objectId": "0xfeed",
            "version": "1",
            "digest": "d",
            "type": object_type,
            "content": {"dataType": "moveObject", "type": object_type, "fields": fields}
        }))
        .unwrap()
    }

    #[test]
    fn test_pool_created_event() {
        let event = PoolCreatedEvent::from_json(&json!({
            "pool_type": {"name": SUI_NAME},
            "allocation_points": "400",
            "deposit_fee": "100",
            "withdrawal_fee": 50,
            "is_lp_token": false,
            "is_native_pair": true
        }))
        .unwrap();
        assert!(event.pool_type.starts_with("0x"));
        assert!(event.pool_type.ends_with("::sui::SUI"));
        assert_eq!(event.allocation_points, 400);
        assert_eq!(event.deposit_fee_bps, 100);
        assert_eq!(event.withdrawal_fee_bps, 50);
        assert!(event.active);
        assert!(event.is_native_pair);
    }

    #[test]
    fn test_pool_created_missing_field() {
        let err = PoolCreatedEvent::from_json(&json!({"pool_type": {"name": SUI_NAME}})).unwrap_err();
        assert_eq!(err, DecodeError::MissingField("allocation_points".to_string()));
    }

    #[test]
    fn test_pool_updated_event() {
        let event = PoolUpdatedEvent::from_json(&json!({
            "pool_type": {"name": SUI_NAME},
            "allocation_points": "0",
            "deposit_fee": "0",
            "withdrawal_fee": "0",
            "active": false
        }))
        .unwrap();
        assert!(!event.active);
        assert_eq!(event.allocation_points, 0);
    }

    #[test]
    fn test_staking_position_from_type_param() {
        let obj = object(
            "0x1234::farm::StakedPosition<0xabc::trump::TRUMP>",
            json!({
                "id": {"id": "0xfeed"},
                "amount": "2500000000",
                "reward_debt": "10",
                "stake_timestamp": "1700000000000"
            }),
        );
        let position = parse_staking_position(&obj).unwrap();
        assert_eq!(position.id, "0xfeed");
        assert!(position.pool_type.ends_with("::trump::TRUMP"));
        assert_eq!(position.amount, U256::from(2_500_000_000u64));
        assert_eq!(position.reward_debt, U256::from(10u64));
        assert!(position.pending_rewards.is_zero());
        assert_eq!(position.staked_at_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_lock_position() {
        let week_ms = 7 * 24 * 60 * 60 * 1000u64;
        let obj = object(
            "0x1234::token_locker::Lock<0xabc::trump::TRUMP>",
            json!({
                "id": {"id": "0xlock"},
                "amount": "1000",
                "lock_start": "1000",
                "lock_end": (1000 + week_ms).to_string()
            }),
        );
        let lock = parse_lock_position(&obj).unwrap();
        assert_eq!(lock.id, "0xlock");
        assert_eq!(lock.lock_period, LockPeriod::OneWeek);
        assert_eq!(lock.amount, U256::from(1000u64));
        assert!(lock.coin_type.ends_with("::trump::TRUMP"));
    }

    #[test]
    fn test_lock_position_missing_amount() {
        let obj = object(
            "0x1234::token_locker::Lock<0xabc::trump::TRUMP>",
            json!({"lock_start": "1", "lock_end": "2"}),
        );
        assert!(matches!(
            parse_lock_position(&obj),
            Err(DecodeError::MissingField(_))
        ));
    }
}
