//! Test harness for the action keeper.
//!
//! [`TestChain`] wires a keeper to the in-memory adapters with a funded
//! creator and a ranked set of supernodes, and builds well-formed metadata
//! for both action types.
//!
//! ```rust,ignore
//! use ac_02_action_lifecycle::test_utils::TestChain;
//!
//! let mut chain = TestChain::new(3)?;
//! let json = chain.cascade_request_json();
//! let action_id = chain.request(ActionType::Cascade, &json, 10_000)?;
//! ```

use std::sync::Arc;

use ac_01_id_audit::create_ids;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use shared_crypto::AccountKeyPair;
use shared_types::{Address, BlockContext, Coin};

use crate::adapters::{
    InMemoryAccounts, InMemoryAuditLog, InMemoryBank, InMemoryKVStore, RecordingEventSink,
    StaticSupernodes,
};
use crate::domain::config::{KeeperConfig, MODULE_NAME};
use crate::domain::entities::{Action, ActionState, ActionType};
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::params::Params;
use crate::handlers::MsgKind;
use crate::msg_server::MsgServer;
use crate::msgs::{MsgFinalizeAction, MsgFinalizeActionResponse, MsgRequestAction};
use crate::ports::inbound::ActionMsgApi;
use crate::ports::outbound::{SupernodeInfo, SupernodeState};
use crate::service::{ActionKeeper, KeeperPorts};
use crate::store;

pub const DENOM: &str = "ulume";
/// Creator's starting balance.
pub const CREATOR_FUNDS: u128 = 1_000_000;
pub const GENESIS_TIME: i64 = 1_700_000_000;
pub const CASCADE_IC: u64 = 7;
pub const SENSE_IC: u64 = 20;

pub fn address(value: &str) -> ActionResult<Address> {
    Address::parse(value).map_err(|e| ActionError::InvalidAddress(e.to_string()))
}

pub fn ulume(amount: u128) -> Coin {
    Coin {
        denom: DENOM.to_string(),
        amount,
    }
}

/// An account with a signing key registered in the account keeper.
pub struct TestAccount {
    pub address: Address,
    pub keypair: AccountKeyPair,
}

impl TestAccount {
    /// `base64(signature)` over `data`.
    pub fn sign_b64(&self, data: &str) -> String {
        BASE64.encode(self.keypair.sign(data.as_bytes()))
    }
}

pub struct TestSupernode {
    pub account: TestAccount,
    pub validator_address: String,
}

pub struct TestChain {
    pub keeper: ActionKeeper<InMemoryKVStore>,
    pub bank: Arc<InMemoryBank>,
    pub accounts: Arc<InMemoryAccounts>,
    pub supernodes: Arc<StaticSupernodes>,
    pub audit: Arc<InMemoryAuditLog>,
    pub events: Arc<RecordingEventSink>,
    pub creator: TestAccount,
    pub nodes: Vec<TestSupernode>,
    pub authority: Address,
    pub module_account: Address,
    pub block: BlockContext,
}

impl TestChain {
    /// A chain with default params and `node_count` active supernodes,
    /// ranked in creation order.
    pub fn new(node_count: usize) -> ActionResult<Self> {
        Self::with_params(node_count, Params::default())
    }

    pub fn with_params(node_count: usize, params: Params) -> ActionResult<Self> {
        let authority = address("lumera1gov0000")?;
        let module_account = address("lumera1actionmodule")?;

        let bank = Arc::new(InMemoryBank::new().with_module(MODULE_NAME, module_account.clone()));
        let accounts = Arc::new(InMemoryAccounts::new());
        let supernodes = Arc::new(StaticSupernodes::new());
        let audit = Arc::new(InMemoryAuditLog::new());
        let events = Arc::new(RecordingEventSink::new());

        let creator = TestAccount {
            address: address("lumera1creator0001")?,
            keypair: AccountKeyPair::generate_ed25519(),
        };
        accounts.insert(creator.address.clone(), Some(creator.keypair.public_key()));
        bank.fund(&creator.address, &ulume(CREATOR_FUNDS));

        let mut nodes = Vec::with_capacity(node_count);
        for i in 1..=node_count {
            let account = TestAccount {
                address: address(&format!("lumera1sn{i:04}"))?,
                keypair: AccountKeyPair::generate_secp256k1(),
            };
            let validator_address = format!("lumeravaloper{i:04}");
            accounts.insert(account.address.clone(), Some(account.keypair.public_key()));
            supernodes.add(SupernodeInfo {
                validator_address: validator_address.clone(),
                supernode_account: account.address.clone(),
                state: SupernodeState::Active,
                registered_height: 1,
            });
            nodes.push(TestSupernode {
                account,
                validator_address,
            });
        }

        let ports = KeeperPorts {
            bank: bank.clone(),
            distribution: bank.clone(),
            accounts: accounts.clone(),
            supernodes: supernodes.clone(),
            staking: supernodes.clone(),
            audit: Some(audit.clone()),
            events: events.clone(),
        };
        let mut keeper = ActionKeeper::new(
            InMemoryKVStore::new(),
            KeeperConfig::new(authority.clone(), module_account.clone()),
            ports,
        )?;
        keeper.set_params(&params)?;

        Ok(Self {
            keeper,
            bank,
            accounts,
            supernodes,
            audit,
            events,
            creator,
            nodes,
            authority,
            module_account,
            block: BlockContext::new(1, GENESIS_TIME),
        })
    }

    pub fn msg_server(&mut self) -> MsgServer<'_, InMemoryKVStore> {
        MsgServer::new(&mut self.keeper)
    }

    pub fn params(&self) -> ActionResult<Params> {
        self.keeper.get_params()
    }

    /// Move to the next block, `seconds` later.
    pub fn advance(&mut self, seconds: i64) {
        self.block = self.block.advance(seconds);
    }

    pub fn balance(&self, account: &Address) -> u128 {
        self.bank.balance(account, DENOM)
    }

    pub fn escrow(&self) -> u128 {
        self.bank.balance(&self.module_account, DENOM)
    }

    pub fn action(&self, action_id: &str) -> ActionResult<Action> {
        store::require_action(self.keeper.store(), action_id)
    }

    pub fn node_address(&self, index: usize) -> &Address {
        &self.nodes[index].account.address
    }

    /// Cascade registration metadata signed by the creator.
    pub fn cascade_request_json(&self) -> String {
        let data = BASE64.encode(b"cascade-rq-ids-layout");
        let signatures = format!("{data}.{}", self.creator.sign_b64(&data));
        serde_json::json!({
            "data_hash": "cascade-data-hash",
            "file_name": "archive.tar",
            "rq_ids_ic": CASCADE_IC,
            "signatures": signatures,
        })
        .to_string()
    }

    /// Cascade finalization metadata with the honest symbol ids for
    /// `action_id`.
    pub fn cascade_finalize_json(&self, action_id: &str) -> ActionResult<String> {
        let meta = self.action(action_id)?.decode_metadata()?.into_cascade()?;
        let ids = create_ids(&meta.signatures, meta.rq_ids_ic, meta.rq_ids_max)
            .map_err(|e| ActionError::InvalidId(e.to_string()))?;
        Ok(serde_json::json!({
            "rq_ids_ids": ids,
            "rq_ids_oti": [1, 2, 3],
        })
        .to_string())
    }

    pub fn sense_request_json(&self, collection_id: &str) -> String {
        serde_json::json!({
            "data_hash": "sense-data-hash",
            "dd_and_fingerprints_ic": SENSE_IC,
            "collection_id": collection_id,
            "group_id": "group-1",
        })
        .to_string()
    }

    /// `data.sig1.sig2.sig3` over `payload`, signed by the nodes at
    /// `signers`.
    pub fn sense_signatures(&self, signers: [usize; 3], payload: &[u8]) -> String {
        let data = BASE64.encode(payload);
        let sigs: Vec<String> = signers
            .iter()
            .map(|&i| self.nodes[i].account.sign_b64(&data))
            .collect();
        format!("{data}.{}", sigs.join("."))
    }

    /// Sense finalization metadata whose ids derive from `signatures`.
    pub fn sense_finalize_json(&self, signatures: &str) -> ActionResult<String> {
        let max = self.params()?.max_dd_and_fingerprints;
        let ids = create_ids(signatures, SENSE_IC, max)
            .map_err(|e| ActionError::InvalidId(e.to_string()))?;
        Ok(serde_json::json!({
            "dd_and_fingerprints_ids": ids,
            "signatures": signatures,
        })
        .to_string())
    }

    /// An unregistered action from the creator with valid metadata, for
    /// calling the keeper directly.
    pub fn action_template(&self, action_type: ActionType) -> ActionResult<Action> {
        let params = self.params()?;
        let json = match action_type {
            ActionType::Sense => self.sense_request_json("collection-1"),
            _ => self.cascade_request_json(),
        };
        let metadata = self
            .keeper
            .registry()
            .get(action_type)?
            .process(&json, MsgKind::RequestAction, Some(&params))?;
        Ok(Action {
            action_id: String::new(),
            creator: self.creator.address.clone(),
            action_type,
            metadata,
            price: params.base_action_fee.clone(),
            expiration_time: self.block.time_unix + params.expiration_duration.as_secs() as i64,
            state: ActionState::Pending,
            block_height: self.block.height,
            super_nodes: Vec::new(),
        })
    }

    /// Submit `MsgRequestAction` from the creator with the default
    /// expiration.
    pub fn request(&mut self, action_type: ActionType, metadata: &str, price: u128) -> ActionResult<String> {
        self.request_expiring(action_type, metadata, price, "")
    }

    /// Submit `MsgRequestAction` with an explicit `expiration_time` field.
    pub fn request_expiring(
        &mut self,
        action_type: ActionType,
        metadata: &str,
        price: u128,
        expiration_time: &str,
    ) -> ActionResult<String> {
        let msg = MsgRequestAction::new(
            self.creator.address.as_str(),
            action_type.as_str(),
            metadata,
            ulume(price).to_string(),
            expiration_time,
        );
        let block = self.block;
        Ok(self.msg_server().request_action(block, msg)?.action_id)
    }

    /// Submit `MsgFinalizeAction` from the node at `node`.
    pub fn finalize(
        &mut self,
        node: usize,
        action_id: &str,
        action_type: ActionType,
        metadata: &str,
    ) -> ActionResult<MsgFinalizeActionResponse> {
        let msg = MsgFinalizeAction::new(
            self.node_address(node).as_str(),
            action_id,
            action_type.as_str(),
            metadata,
        );
        let block = self.block;
        self.msg_server().finalize_action(block, msg)
    }
}
