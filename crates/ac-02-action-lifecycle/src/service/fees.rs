use action_telemetry::log_action_event;
use shared_types::Address;
use tracing::{error, warn};

use super::ActionKeeper;
use crate::domain::entities::Action;
use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::fees::{plan_distribution, FeeDistribution};
use crate::domain::params::Params;
use crate::metrics;
use crate::ports::outbound::KeyValueStore;

impl<S: KeyValueStore> ActionKeeper<S> {
    /// Plan the payout for a Done action. Fails if the escrow cannot cover
    /// the price.
    pub(crate) fn plan_fees(&self, params: &Params, action: &Action) -> ActionResult<FeeDistribution> {
        let escrow = self
            .ports
            .bank
            .get_balance(&self.config.module_account, &action.price.denom);
        if escrow < action.price.amount {
            return Err(ActionError::InsufficientFunds(format!(
                "module escrow holds {escrow}{}, action {} needs {}",
                action.price.denom, action.action_id, action.price
            )));
        }

        Ok(plan_distribution(
            action.price.amount,
            action.rewarded_supernodes(&self.config.bad_marker),
            params.foundation_share()?,
        ))
    }

    /// Execute a plan. Individual transfer failures are logged and skipped.
    pub(crate) fn pay_out(&self, action: &Action, plan: FeeDistribution) {
        let mut paid = 0u128;

        if plan.community_pool > 0 {
            let coin = action.price.with_amount(plan.community_pool);
            match self
                .ports
                .distribution
                .fund_community_pool(&coin, &self.config.module_account)
            {
                Ok(()) => paid += plan.community_pool,
                Err(e) => error!(action_id = %action.action_id, amount = %coin, "Failed to fund community pool: {e}"),
            }
        }

        if plan.per_supernode > 0 {
            let coin = action.price.with_amount(plan.per_supernode);
            for payee in &plan.payees {
                let recipient = match Address::parse(payee) {
                    Ok(address) => address,
                    Err(e) => {
                        warn!(action_id = %action.action_id, payee = %payee, "Skipping unparsable payee: {e}");
                        continue;
                    }
                };
                match self.ports.bank.send_coins_from_module_to_account(
                    &self.config.module_name,
                    &recipient,
                    &coin,
                ) {
                    Ok(()) => paid += plan.per_supernode,
                    Err(e) => error!(
                        action_id = %action.action_id,
                        supernode = %recipient,
                        amount = %coin,
                        "Failed to pay supernode fee: {e}"
                    ),
                }
            }
        }

        log_action_event!(
            info,
            "Fees distributed",
            action.action_id,
            paid = %paid,
            payees = plan.payees.len(),
            per_supernode = %plan.per_supernode,
            community_pool = %plan.community_pool,
            remainder = %plan.remainder
        );
        metrics::record_fees_distributed(paid);
    }
}
