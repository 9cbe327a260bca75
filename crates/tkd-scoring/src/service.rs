//! Match Service - the sequencer
//!
//! One async mutex guards the whole session. Every inbound signal runs
//! validate → admit → apply → check → broadcast inside it, so two signals for
//! the same match never interleave and every broadcast carries a
//! post-mutation snapshot.
//!
//! Debounce timers are tokio tasks keyed by team. A timer sleeps for the
//! consensus window, takes the same mutex and expires its ticket. Arming a
//! timer aborts the previous one for that team; a timer that still wins the
//! race finds its ticket superseded and does nothing.

use crate::domain::{
    DebounceTicket, EpochMillis, JudgeId, ManualAdjustment, MatchRules, ScoringAction, TeamId,
    TeamMap,
};
use crate::events::{MatchEvent, MatchSnapshot};
use crate::ports::{Broadcaster, MatchApi, SignalOutcome, SystemTimeSource, TimeSource};
use crate::session::{MatchSession, TimerDirective, Transition};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct SessionState {
    session: MatchSession,
    timers: TeamMap<Option<JoinHandle<()>>>,
}

impl SessionState {
    fn cancel_timer(&mut self, team: TeamId) {
        if let Some(handle) = self.timers[team].take() {
            handle.abort();
        }
    }
}

struct Shared<B> {
    state: Mutex<SessionState>,
    broadcaster: Arc<B>,
    time_source: Box<dyn TimeSource>,
}

/// Handle to one match. Cheap to clone; all clones share the session.
pub struct MatchService<B>
where
    B: Broadcaster + 'static,
{
    shared: Arc<Shared<B>>,
}

impl<B> Clone for MatchService<B>
where
    B: Broadcaster + 'static,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B> MatchService<B>
where
    B: Broadcaster + 'static,
{
    pub fn new(rules: MatchRules, broadcaster: Arc<B>) -> Self {
        Self::with_time_source(rules, broadcaster, Box::new(SystemTimeSource))
    }

    /// Create with custom time source (for testing)
    pub fn with_time_source(
        rules: MatchRules,
        broadcaster: Arc<B>,
        time_source: Box<dyn TimeSource>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState {
                    session: MatchSession::new(rules),
                    timers: TeamMap::default(),
                }),
                broadcaster,
                time_source,
            }),
        }
    }

    pub fn broadcaster(&self) -> &Arc<B> {
        &self.shared.broadcaster
    }

    pub async fn rules(&self) -> MatchRules {
        *self.shared.state.lock().await.session.rules()
    }

    pub async fn is_timer_armed(&self, team: TeamId) -> bool {
        self.shared.state.lock().await.session.is_timer_armed(team)
    }

    fn now(&self) -> EpochMillis {
        self.shared.time_source.now_millis()
    }

    /// Apply timer side effects, then broadcast in order.
    ///
    /// A failed victory notice reopens the match so play can continue.
    async fn commit(&self, state: &mut SessionState, transition: Transition) -> SignalOutcome {
        self.apply_timer(state, transition.timer);

        for event in transition.events {
            let topic = event.topic();
            let victory = event.is_victory();
            if let MatchEvent::MatchWon(result) = &event {
                info!(
                    winner = %result.winner,
                    blue_score = result.blue_score,
                    red_score = result.red_score,
                    difference = result.difference,
                    "Match won by gap"
                );
            }

            if let Err(e) = self.shared.broadcaster.broadcast(event).await {
                if victory {
                    warn!(error = %e, "Victory notice undeliverable, reopening match");
                    state.session.retract_victory();
                } else {
                    warn!(topic = ?topic, error = %e, "Broadcast failed");
                }
            }
        }

        transition.outcome
    }

    fn apply_timer(&self, state: &mut SessionState, directive: TimerDirective) {
        match directive {
            TimerDirective::Keep => {}
            TimerDirective::Cancel(team) => state.cancel_timer(team),
            TimerDirective::CancelAll => {
                for team in TeamId::ALL {
                    state.cancel_timer(team);
                }
            }
            TimerDirective::Arm(ticket) => {
                state.cancel_timer(ticket.team);
                let delay = state.session.rules().debounce();
                state.timers[ticket.team] = Some(self.spawn_debounce(ticket, delay));
            }
        }
    }

    fn spawn_debounce(&self, ticket: DebounceTicket, delay: Duration) -> JoinHandle<()> {
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = shared.upgrade() else {
                return;
            };
            let mut state = shared.state.lock().await;
            if state.session.expire(ticket) {
                state.timers[ticket.team] = None;
                debug!(team = %ticket.team, "Pending signal expired without consensus");
            }
        })
    }
}

#[async_trait]
impl<B> MatchApi for MatchService<B>
where
    B: Broadcaster + 'static,
{
    async fn submit_strike(
        &self,
        judge: JudgeId,
        team: TeamId,
        action: ScoringAction,
        timestamp: EpochMillis,
    ) -> SignalOutcome {
        let now = self.now();
        let mut state = self.shared.state.lock().await;
        let transition =
            state
                .session
                .submit_strike(judge.clone(), team, action, timestamp, now);
        let outcome = self.commit(&mut state, transition).await;

        match outcome {
            SignalOutcome::Rejected(reason) => {
                debug!(%judge, %team, ?action, %reason, "Signal dropped");
            }
            SignalOutcome::Pending => {
                debug!(%judge, %team, ?action, "Signal pending consensus");
            }
            SignalOutcome::Discarded => {
                debug!(%judge, %team, ?action, "Oldest pending signal discarded");
            }
            SignalOutcome::Confirmed { points, score, .. } => {
                info!(%judge, %team, ?action, points, score, "Points confirmed");
            }
            SignalOutcome::Applied => {}
        }
        outcome
    }

    async fn adjust_score(&self, team: TeamId, adjustment: ManualAdjustment) -> SignalOutcome {
        let now = self.now();
        let mut state = self.shared.state.lock().await;
        let transition = state.session.adjust_score(team, adjustment, now);
        let outcome = self.commit(&mut state, transition).await;

        if let SignalOutcome::Rejected(reason) = outcome {
            debug!(%team, ?adjustment, %reason, "Manual adjustment dropped");
        } else {
            info!(%team, ?adjustment, "Manual adjustment applied");
        }
        outcome
    }

    async fn record_penalty(&self, team: TeamId) -> SignalOutcome {
        let mut state = self.shared.state.lock().await;
        let transition = state.session.record_penalty(team);
        let outcome = self.commit(&mut state, transition).await;

        if let SignalOutcome::Rejected(reason) = outcome {
            debug!(%team, %reason, "Penalty dropped");
        } else {
            info!(%team, "Kamgeon recorded");
        }
        outcome
    }

    async fn reset(&self) -> MatchSnapshot {
        let mut state = self.shared.state.lock().await;
        let transition = state.session.reset();
        self.commit(&mut state, transition).await;

        info!(resets = state.session.resets(), "Match reset");
        state.session.snapshot()
    }

    async fn snapshot(&self) -> MatchSnapshot {
        self.shared.state.lock().await.session.snapshot()
    }

    async fn pending_len(&self, team: TeamId) -> usize {
        self.shared.state.lock().await.session.pending_len(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RecordingBroadcaster;
    use crate::domain::ScoreSnapshot;
    use crate::events::EventTopic;
    use std::sync::atomic::{AtomicI64, Ordering};

    const NOW: EpochMillis = 1_700_000_000_000;

    struct ManualClock(Arc<AtomicI64>);

    impl TimeSource for ManualClock {
        fn now_millis(&self) -> EpochMillis {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn create_test_service() -> (MatchService<RecordingBroadcaster>, Arc<RecordingBroadcaster>) {
        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let clock = Box::new(ManualClock(Arc::new(AtomicI64::new(NOW))));
        let service =
            MatchService::with_time_source(MatchRules::default(), broadcaster.clone(), clock);
        (service, broadcaster)
    }

    async fn confirm(service: &MatchService<RecordingBroadcaster>, team: TeamId, action: ScoringAction) {
        service.submit_strike("a".into(), team, action, NOW).await;
        service.submit_strike("b".into(), team, action, NOW + 10).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_broadcasts_once() {
        let (service, broadcaster) = create_test_service();

        let first = service
            .submit_strike("a".into(), TeamId::Blue, ScoringAction::HeadStrike, NOW)
            .await;
        assert_eq!(first, SignalOutcome::Pending);
        assert!(service.is_timer_armed(TeamId::Blue).await);
        assert_eq!(broadcaster.event_count(), 0);

        let second = service
            .submit_strike("b".into(), TeamId::Blue, ScoringAction::HeadStrike, NOW + 1_000)
            .await;
        assert!(matches!(second, SignalOutcome::Confirmed { score: 3, .. }));
        assert!(!service.is_timer_armed(TeamId::Blue).await);
        assert_eq!(
            broadcaster.events(),
            vec![MatchEvent::ScoreUpdated(ScoreSnapshot {
                blue_score: 3,
                red_score: 0
            })]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_lone_signal_expires() {
        let (service, broadcaster) = create_test_service();

        service
            .submit_strike("a".into(), TeamId::Blue, ScoringAction::HeadStrike, NOW)
            .await;
        assert_eq!(service.pending_len(TeamId::Blue).await, 1);

        tokio::time::sleep(Duration::from_millis(5_001)).await;

        assert_eq!(service.pending_len(TeamId::Blue).await, 0);
        assert!(!service.is_timer_armed(TeamId::Blue).await);
        assert_eq!(service.snapshot().await.blue_score, 0);
        assert_eq!(broadcaster.event_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_signal_cancels_previous_timer() {
        let (service, _) = create_test_service();

        service
            .submit_strike("a".into(), TeamId::Red, ScoringAction::Punch, NOW)
            .await;
        tokio::time::sleep(Duration::from_millis(3_000)).await;

        // Same judge: the oldest is discarded and no new timer is armed.
        let outcome = service
            .submit_strike("a".into(), TeamId::Red, ScoringAction::Punch, NOW + 3_000)
            .await;
        assert_eq!(outcome, SignalOutcome::Discarded);
        assert!(!service.is_timer_armed(TeamId::Red).await);

        // Past the first timer's deadline the survivor is still pending.
        tokio::time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(service.pending_len(TeamId::Red).await, 1);

        let outcome = service
            .submit_strike("b".into(), TeamId::Red, ScoringAction::Punch, NOW + 6_000)
            .await;
        assert!(matches!(outcome, SignalOutcome::Confirmed { points: 1, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_keeps_only_latest_timer() {
        let (service, _) = create_test_service();

        service
            .submit_strike("a".into(), TeamId::Blue, ScoringAction::TorsoStrike, NOW)
            .await;
        tokio::time::sleep(Duration::from_millis(4_000)).await;
        service.reset().await;
        service
            .submit_strike("b".into(), TeamId::Blue, ScoringAction::TorsoStrike, NOW)
            .await;

        // The first timer's deadline passes; the re-armed one has not.
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(service.pending_len(TeamId::Blue).await, 1);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(service.pending_len(TeamId::Blue).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_victory_fail_open() {
        let (service, broadcaster) = create_test_service();
        broadcaster.fail_on(EventTopic::Lifecycle);

        for _ in 0..12 {
            service.adjust_score(TeamId::Blue, ManualAdjustment::Increment).await;
        }
        assert!(service.snapshot().await.active);
        assert!(broadcaster.events().iter().all(|e| !e.is_victory()));

        broadcaster.heal();
        service.adjust_score(TeamId::Blue, ManualAdjustment::Increment).await;

        let snapshot = service.snapshot().await;
        assert!(!snapshot.active);
        assert_eq!(snapshot.blue_score, 13);
        let victories: Vec<_> = broadcaster
            .events()
            .into_iter()
            .filter(MatchEvent::is_victory)
            .collect();
        assert_eq!(victories.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_score_broadcast_failure_is_absorbed() {
        let (service, broadcaster) = create_test_service();
        broadcaster.fail_on(EventTopic::Score);

        confirm(&service, TeamId::Red, ScoringAction::SpinningTorsoStrike).await;

        assert_eq!(service.snapshot().await.red_score, 4);
        assert_eq!(broadcaster.event_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_timers_and_zeroes() {
        let (service, broadcaster) = create_test_service();

        confirm(&service, TeamId::Blue, ScoringAction::SpinningHeadStrike).await;
        service.record_penalty(TeamId::Red).await;
        service
            .submit_strike("c".into(), TeamId::Red, ScoringAction::Punch, NOW)
            .await;
        broadcaster.clear();

        let snapshot = service.reset().await;
        assert_eq!(
            snapshot,
            MatchSnapshot {
                active: true,
                ..MatchSnapshot::default()
            }
        );
        assert!(!service.is_timer_armed(TeamId::Red).await);
        assert_eq!(service.pending_len(TeamId::Red).await, 0);
        assert!(matches!(broadcaster.events()[0], MatchEvent::MatchReset(_)));

        tokio::time::sleep(Duration::from_millis(6_000)).await;
        assert_eq!(service.snapshot().await, snapshot);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signals_are_sequenced() {
        let (service, broadcaster) = create_test_service();

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .submit_strike(
                            JudgeId::new(format!("judge-{i}")),
                            TeamId::Blue,
                            ScoringAction::HeadStrike,
                            NOW,
                        )
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Every pair confirms 3 points until the gap of 12 ends the match.
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.blue_score, 12);
        assert!(!snapshot.active);
        let victories = broadcaster
            .events()
            .iter()
            .filter(|e| e.is_victory())
            .count();
        assert_eq!(victories, 1);
    }
}
