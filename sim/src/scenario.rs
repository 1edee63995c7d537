//! The scripted two-domain scenario.

use crate::config::SimConfig;
use anyhow::Context;
use rebase_bridge::{BridgeAdapter, CrossDomainMessage, PoolPolicy, RemoteDomain};
use rebase_ledger::{AccrualLedger, LedgerEvent, Vault};
use rebase_nullables::{NullClock, NullLedgerStore, NullTransport};
use rebase_types::{AccountId, Amount, Clock, DomainId, TokenId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const HOME: DomainId = DomainId::new(1);
const AWAY: DomainId = DomainId::new(2);

/// What the run observed. Amounts and rates are decimal strings so JSON
/// consumers do not lose precision on 128-bit values.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub bridged_amount: String,
    pub rate_payload_hex: String,
    pub early_holder_home_rate: String,
    pub early_holder_away_rate: String,
    pub early_holder_away_balance: String,
    pub late_holder_rate: String,
    pub late_holder_home_balance: String,
    pub home_base_rate: String,
    pub away_base_rate: String,
    pub home_total_principal: String,
    pub away_total_principal: String,
    pub home_events: u64,
    pub snapshot_accounts: usize,
    pub finished_at_secs: u64,
}

struct Domain {
    ledger: AccrualLedger,
    vault: Vault,
    adapter: BridgeAdapter,
}

fn setup(local: DomainId, remote: DomainId, base_rate: u128) -> anyhow::Result<Domain> {
    let owner = AccountId::new(format!("owner-{}", local.selector()));
    let pool = AccountId::new(format!("pool-{}", local.selector()));
    let vault = Vault::new(AccountId::new(format!("vault-{}", local.selector())));

    let mut ledger = AccrualLedger::new(owner.clone(), base_rate);
    ledger.grant_mint_and_burn(&owner, &pool)?;
    ledger.grant_mint_and_burn(&owner, vault.account())?;

    let policy = PoolPolicy::new().with_remote(
        remote,
        RemoteDomain {
            token: TokenId::new(format!("rbt-{}", remote.selector())),
            adapter: AccountId::new(format!("pool-{}", remote.selector())),
        },
    );
    let adapter = BridgeAdapter::new(
        local,
        pool,
        TokenId::new(format!("rbt-{}", local.selector())),
        policy,
    );
    Ok(Domain {
        ledger,
        vault,
        adapter,
    })
}

/// Run the scenario:
/// 1. an early holder deposits on the home domain at the starting base rate;
/// 2. the home owner cuts the base rate and a late holder deposits;
/// 3. the early holder bridges to the away domain, whose base rate is lower;
/// 4. both balances accrue, and the report shows each holder kept their rate.
pub fn run(config: &SimConfig) -> anyhow::Result<Report> {
    config.validate()?;
    let clock = NullClock::new(0);
    let transport = NullTransport::<CrossDomainMessage>::new();
    let mut home = setup(HOME, AWAY, config.home_base_rate as u128)?;
    let mut away = setup(AWAY, HOME, config.away_base_rate as u128)?;

    let home_events = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&home_events);
    home.ledger.subscribe(Box::new(move |event: &LedgerEvent| {
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(?event, "home ledger event");
    }));

    let early = AccountId::new("early");
    let late = AccountId::new("late");
    let home_owner = home.ledger.authority().owner().clone();

    home.vault
        .deposit(&mut home.ledger, &early, config.early_deposit as u128, clock.now())
        .context("early deposit")?;

    clock.set(config.rate_cut_at_secs);
    home.ledger
        .set_base_rate(&home_owner, config.home_rate_after_cut as u128, clock.now())
        .context("rate cut")?;
    if config.late_deposit > 0 {
        home.vault
            .deposit(&mut home.ledger, &late, config.late_deposit as u128, clock.now())
            .context("late deposit")?;
    }

    clock.set(config.bridge_at_secs);
    let amount = if config.bridge_percent >= 100 {
        Amount::All
    } else {
        let balance = home.ledger.accrued_balance_checked(&early, clock.now())?;
        Amount::Exact(balance * config.bridge_percent as u128 / 100)
    };
    let message = home
        .adapter
        .send(&mut home.ledger, &early, &early, AWAY, amount, clock.now())
        .context("bridge send")?;
    let rate_payload_hex = hex::encode(&message.payload);
    transport.send(message);

    clock.advance(config.transit_secs);
    let delivered = transport
        .deliver_next()
        .context("transport lost the message")?;
    let result = away
        .adapter
        .receive(&mut away.ledger, &delivered, clock.now())
        .context("bridge receive")?;

    clock.advance(config.accrue_secs);
    let now = clock.now();

    let store = NullLedgerStore::new();
    home.ledger.save_to_store(&store)?;
    let restored = AccrualLedger::load_from_store(&store)?;
    anyhow::ensure!(
        restored.total_principal() == home.ledger.total_principal(),
        "snapshot does not match live home ledger"
    );

    let report = Report {
        bridged_amount: result.destination_amount.to_string(),
        rate_payload_hex,
        early_holder_home_rate: home.ledger.personal_rate_of(&early).to_string(),
        early_holder_away_rate: away.ledger.personal_rate_of(&early).to_string(),
        early_holder_away_balance: away.ledger.accrued_balance_checked(&early, now)?.to_string(),
        late_holder_rate: home.ledger.personal_rate_of(&late).to_string(),
        late_holder_home_balance: home.ledger.accrued_balance_checked(&late, now)?.to_string(),
        home_base_rate: home.ledger.current_base_rate().to_string(),
        away_base_rate: away.ledger.current_base_rate().to_string(),
        home_total_principal: home.ledger.total_principal().to_string(),
        away_total_principal: away.ledger.total_principal().to_string(),
        home_events: home_events.load(Ordering::Relaxed),
        snapshot_accounts: store.account_count(),
        finished_at_secs: now.as_secs(),
    };
    tracing::info!(
        bridged = %report.bridged_amount,
        away_balance = %report.early_holder_away_balance,
        "scenario finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_preserves_rates_across_domains() {
        let report = run(&SimConfig::default()).unwrap();
        assert_eq!(report.bridged_amount, "100018");
        assert_eq!(report.early_holder_away_rate, "50000000000");
        assert_eq!(report.early_holder_home_rate, "50000000000");
        assert_eq!(report.away_base_rate, "40000000000");
        assert_eq!(report.early_holder_away_balance, "100450");
        assert_eq!(report.late_holder_rate, "30000000000");
        assert_eq!(report.late_holder_home_balance, "50134");
        assert_eq!(report.home_total_principal, "50000");
        assert_eq!(report.finished_at_secs, 90_400);
        assert_eq!(
            report.rate_payload_hex,
            "0000000000000000000000000000000000000000000000000000000ba43b7400"
        );
    }

    #[test]
    fn partial_bridge_leaves_remainder_at_home() {
        let config = SimConfig {
            bridge_percent: 50,
            ..SimConfig::default()
        };
        let report = run(&config).unwrap();
        assert_eq!(report.bridged_amount, "50009");
        assert_eq!(report.home_total_principal, (50_000u128 + 50_009).to_string());
    }

    #[test]
    fn invalid_schedule_fails_before_running() {
        let config = SimConfig {
            rate_cut_at_secs: 10_000,
            ..SimConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
