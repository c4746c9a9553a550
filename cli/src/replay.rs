//! Drive a [`LifecycleEngine`] through a scenario against the nullable
//! collaborators and collect what happened.

use crate::scenario::{Scenario, Step};
use bucket_engine::{LifecycleEngine, StakingConfig, StakingError, StakingEvent};
use bucket_nullables::NullEnvironment;
use bucket_store::Bucket;
use bucket_types::{Address, Amount, BlockHeight, BucketState, DelegateId, Duration, ErrorKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Result of one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: &'static str,
    pub height: BlockHeight,
    pub ok: bool,
    /// Id, payout or type index returned by the call, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BucketView {
    #[serde(flatten)]
    pub bucket: Bucket,
    pub state: BucketState,
    pub holder: Option<Address>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeView {
    pub index: usize,
    pub amount: Amount,
    pub duration: Duration,
    pub active: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DelegateVotes {
    pub locked: Vec<u64>,
    pub unlocked: Vec<u64>,
}

/// Step counts for one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub steps: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Failed steps whose error came from a collaborator (payout, storage)
    /// rather than from the engine's own rules.
    pub collaborator_failures: u64,
}

impl ReplayStats {
    fn record(&mut self, outcome: &StepOutcome) {
        self.steps += 1;
        if outcome.ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            if outcome.error_kind == Some(ErrorKind::Collaborator.as_str()) {
                self.collaborator_failures += 1;
            }
        }
    }
}

/// Final state after a replay.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub height: BlockHeight,
    pub outcomes: Vec<StepOutcome>,
    pub buckets: Vec<BucketView>,
    pub bucket_types: Vec<TypeView>,
    /// Keyed by every delegate the scenario mentioned.
    pub votes: BTreeMap<String, DelegateVotes>,
    pub penalty_rate: u8,
    pub accumulated_fee: Amount,
    pub events: Vec<StakingEvent>,
    pub stats: ReplayStats,
}

/// Holds the engine and its nullables for the duration of a replay.
pub struct Replayer {
    engine: LifecycleEngine,
    env: NullEnvironment,
    admin: Address,
    delegates: BTreeSet<DelegateId>,
    stats: ReplayStats,
    outcomes: Vec<StepOutcome>,
}

impl Replayer {
    pub fn new(config: StakingConfig, admin: Address) -> Result<Self, StakingError> {
        let env = NullEnvironment::new(admin.clone());
        let engine = LifecycleEngine::new(config, env.collaborators())?;
        Ok(Self {
            engine,
            env,
            admin,
            delegates: BTreeSet::new(),
            stats: ReplayStats::default(),
            outcomes: Vec::new(),
        })
    }

    pub fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    /// Apply every step in order. A failing step is recorded and skipped.
    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.apply(step);
        }
    }

    /// Apply one step and record its outcome.
    pub fn apply(&mut self, step: &Step) -> &StepOutcome {
        let index = self.outcomes.len();
        let height = self.engine.now();
        let outcome = match self.dispatch(step) {
            Ok(value) => {
                debug!(index, op = step.op(), "step applied");
                StepOutcome {
                    index,
                    op: step.op(),
                    height,
                    ok: true,
                    value,
                    error_kind: None,
                    error: None,
                }
            }
            Err(e) => {
                warn!(index, op = step.op(), kind = e.kind().as_str(), "step failed: {e}");
                StepOutcome {
                    index,
                    op: step.op(),
                    height,
                    ok: false,
                    value: None,
                    error_kind: Some(e.kind().as_str()),
                    error: Some(e.to_string()),
                }
            }
        };
        self.stats.record(&outcome);
        self.outcomes.push(outcome);
        &self.outcomes[index]
    }

    fn dispatch(&mut self, step: &Step) -> Result<Option<String>, StakingError> {
        let engine = &mut self.engine;
        match step {
            Step::AddType { amount, duration } => engine
                .add_bucket_type(&self.admin, *amount, *duration)
                .map(|i| Some(i.to_string())),
            Step::ActivateType { amount, duration } => engine
                .activate_bucket_type(&self.admin, *amount, *duration)
                .map(|i| Some(i.to_string())),
            Step::DeactivateType { amount, duration } => engine
                .deactivate_bucket_type(&self.admin, *amount, *duration)
                .map(|i| Some(i.to_string())),
            Step::Stake {
                caller,
                amount,
                duration,
                delegate,
                paid,
            } => {
                self.delegates.insert(*delegate);
                engine
                    .stake(caller, *amount, *duration, *delegate, paid.unwrap_or(*amount))
                    .map(|id| Some(id.to_string()))
            }
            Step::Lock {
                caller,
                id,
                duration,
            } => engine.lock(caller, *id, *duration).map(|_| None),
            Step::Unlock { caller, id } => engine.unlock(caller, *id).map(|_| None),
            Step::Unstake { caller, id } => engine.unstake(caller, *id).map(|_| None),
            Step::Withdraw {
                caller,
                id,
                recipient,
            } => engine
                .withdraw(caller, *id, recipient.as_ref().unwrap_or(caller))
                .map(|paid| Some(paid.to_string())),
            Step::EmergencyWithdraw {
                caller,
                id,
                recipient,
            } => engine
                .emergency_withdraw(caller, *id, recipient.as_ref().unwrap_or(caller))
                .map(|paid| Some(paid.to_string())),
            Step::Expand {
                caller,
                id,
                amount,
                duration,
                paid,
            } => engine
                .expand(caller, *id, *amount, *duration, *paid)
                .map(|_| None),
            Step::ChangeDelegate {
                caller,
                id,
                delegate,
            } => {
                self.delegates.insert(*delegate);
                engine.change_delegate(caller, *id, *delegate).map(|_| None)
            }
            Step::Merge {
                caller,
                ids,
                duration,
                paid,
            } => engine
                .merge(caller, ids, *duration, *paid)
                .map(|survivor| Some(survivor.to_string())),
            Step::Transfer { caller, id, to } => engine.transfer(caller, *id, to).map(|_| None),
            Step::Advance { blocks } => {
                self.env.clock.advance(*blocks);
                Ok(Some(engine.now().to_string()))
            }
            Step::SetPenaltyRate { rate } => {
                engine.set_penalty_rate(&self.admin, *rate).map(|_| None)
            }
        }
    }

    /// Snapshot the engine and everything recorded so far.
    pub fn report(&self) -> Report {
        let engine = &self.engine;
        let buckets = engine
            .buckets()
            .map(|b| BucketView {
                bucket: b.clone(),
                state: b.state(),
                holder: engine.holder_of(b.id),
            })
            .collect();
        let bucket_types = engine
            .registry()
            .types()
            .iter()
            .enumerate()
            .map(|(index, t)| TypeView {
                index,
                amount: t.amount,
                duration: t.duration,
                active: t.is_active(),
            })
            .collect();
        let delegates: Vec<DelegateId> = self.delegates.iter().copied().collect();
        let votes = delegates
            .iter()
            .zip(engine.votes_to(&delegates))
            .map(|(d, row)| {
                (
                    d.to_string(),
                    DelegateVotes {
                        locked: row.locked,
                        unlocked: row.unlocked,
                    },
                )
            })
            .collect();

        Report {
            height: engine.now(),
            outcomes: self.outcomes.clone(),
            buckets,
            bucket_types,
            votes,
            penalty_rate: engine.penalty_rate(),
            accumulated_fee: engine.accumulated_fee(),
            events: self.env.events.events(),
            stats: self.stats,
        }
    }
}

/// Replay a whole scenario on a fresh engine.
pub fn replay(config: StakingConfig, scenario: &Scenario) -> Result<Report, StakingError> {
    let mut replayer = Replayer::new(config, scenario.admin.clone())?;
    replayer.run(&scenario.steps);
    let report = replayer.report();
    info!(
        steps = report.stats.steps,
        failed = report.stats.failed,
        buckets = report.buckets.len(),
        "replay finished"
    );
    Ok(report)
}
