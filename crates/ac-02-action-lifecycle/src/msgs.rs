//! # Messages
//!
//! Transaction messages accepted by the module, in their wire form (string
//! fields, JSON metadata). `validate_basic` performs the stateless checks;
//! anything that needs the store or params happens in the msg server.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Coin};

use crate::domain::entities::ActionType;
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;

fn parse_address(field: &str, value: &str) -> ActionResult<Address> {
    Address::parse(value).map_err(|e| ActionError::InvalidAddress(format!("invalid {field} address ({e})")))
}

fn parse_action_type(value: &str) -> ActionResult<ActionType> {
    match value.parse::<ActionType>()? {
        ActionType::Unspecified => Err(ActionError::InvalidActionType(
            "action type must be specified".into(),
        )),
        action_type => Ok(action_type),
    }
}

fn require_metadata(metadata: &str) -> ActionResult<()> {
    if metadata.trim().is_empty() {
        return Err(ActionError::InvalidMetadata("metadata cannot be empty".into()));
    }
    Ok(())
}

/// Register a new action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRequestAction {
    pub creator: String,
    pub action_type: String,
    /// JSON-encoded type metadata.
    pub metadata: String,
    /// Coin expression, e.g. `10000ulume`.
    pub price: String,
    /// Unix seconds; empty means "block time + expiration duration".
    #[serde(default)]
    pub expiration_time: String,
}

impl MsgRequestAction {
    pub fn new(
        creator: impl Into<String>,
        action_type: impl Into<String>,
        metadata: impl Into<String>,
        price: impl Into<String>,
        expiration_time: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            action_type: action_type.into(),
            metadata: metadata.into(),
            price: price.into(),
            expiration_time: expiration_time.into(),
        }
    }

    pub fn creator(&self) -> ActionResult<Address> {
        parse_address("creator", &self.creator)
    }

    pub fn action_type(&self) -> ActionResult<ActionType> {
        parse_action_type(&self.action_type)
    }

    pub fn price(&self) -> ActionResult<Coin> {
        if self.price.is_empty() {
            return Err(ActionError::InvalidPrice("price cannot be empty".into()));
        }
        Coin::parse(&self.price)
            .map_err(|e| ActionError::InvalidPrice(format!("invalid price format, {e}")))
    }

    /// Requested expiration, if one was given.
    pub fn expiration_time(&self) -> ActionResult<Option<i64>> {
        if self.expiration_time.is_empty() {
            return Ok(None);
        }
        let value: i64 = self.expiration_time.parse().map_err(|e| {
            ActionError::InvalidExpiration(format!("invalid expiration_time format, {e}"))
        })?;
        if value <= 0 {
            return Err(ActionError::InvalidExpiration(
                "expiration_time must be positive".into(),
            ));
        }
        Ok(Some(value))
    }

    pub fn validate_basic(&self) -> ActionResult<()> {
        self.creator()?;
        self.action_type()?;
        self.price()?;
        self.expiration_time()?;
        require_metadata(&self.metadata)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRequestActionResponse {
    pub action_id: String,
    pub status: String,
}

/// Submit a supernode's results for an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgFinalizeAction {
    /// The finalizing supernode account.
    pub creator: String,
    pub action_id: String,
    pub action_type: String,
    pub metadata: String,
}

impl MsgFinalizeAction {
    pub fn new(
        creator: impl Into<String>,
        action_id: impl Into<String>,
        action_type: impl Into<String>,
        metadata: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            action_id: action_id.into(),
            action_type: action_type.into(),
            metadata: metadata.into(),
        }
    }

    pub fn supernode(&self) -> ActionResult<Address> {
        parse_address("creator", &self.creator)
    }

    pub fn action_type(&self) -> ActionResult<ActionType> {
        parse_action_type(&self.action_type)
    }

    pub fn validate_basic(&self) -> ActionResult<()> {
        self.supernode()?;
        if self.action_id.is_empty() {
            return Err(ActionError::InvalidId("action ID cannot be empty".into()));
        }
        self.action_type()?;
        require_metadata(&self.metadata)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgFinalizeActionResponse {}

/// Creator sign-off on a completed action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgApproveAction {
    pub creator: String,
    pub action_id: String,
}

impl MsgApproveAction {
    pub fn new(creator: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            action_id: action_id.into(),
        }
    }

    pub fn creator(&self) -> ActionResult<Address> {
        parse_address("creator", &self.creator)
    }

    pub fn validate_basic(&self) -> ActionResult<()> {
        self.creator()?;
        if self.action_id.is_empty() {
            return Err(ActionError::InvalidId("action ID cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgApproveActionResponse {
    pub action_id: String,
    pub status: String,
}

/// Governance replacement of the module params.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub params: Params,
}

impl MsgUpdateParams {
    pub fn new(authority: impl Into<String>, params: Params) -> Self {
        Self {
            authority: authority.into(),
            params,
        }
    }

    pub fn authority(&self) -> ActionResult<Address> {
        parse_address("authority", &self.authority)
    }

    pub fn validate_basic(&self) -> ActionResult<()> {
        self.authority()?;
        self.params.validate()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParamsResponse {}
