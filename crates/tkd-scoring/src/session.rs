//! Match session
//!
//! Owns every piece of mutable match state: the two consensus windows, the
//! ledger and the lifecycle. Each operation is a pure transition that
//! returns the events to broadcast and what to do with the team's debounce
//! timer. Broadcasting and timer scheduling belong to the service.

use crate::domain::{
    Admission, ConsensusWindow, DebounceTicket, EpochMillis, JudgeId, LifecycleEvent,
    ManualAdjustment, MatchLifecycle, MatchPhase, MatchRules, ScoreLedger, ScoringAction,
    SignalValidator, TeamId, TeamMap, VictoryEvaluator,
};
use crate::error::RejectReason;
use crate::events::{MatchEvent, MatchSnapshot};
use crate::ports::SignalOutcome;

/// What the owner of the timers must do after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerDirective {
    /// Leave timers untouched.
    Keep,
    /// Cancel the team's timer and arm a new one with this ticket.
    Arm(DebounceTicket),
    /// Cancel the team's timer.
    Cancel(TeamId),
    /// Cancel both timers.
    CancelAll,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub outcome: SignalOutcome,
    pub events: Vec<MatchEvent>,
    pub timer: TimerDirective,
}

impl Transition {
    fn rejected(reason: RejectReason) -> Self {
        Self {
            outcome: SignalOutcome::Rejected(reason),
            events: Vec::new(),
            timer: TimerDirective::Keep,
        }
    }
}

#[derive(Debug)]
pub struct MatchSession {
    rules: MatchRules,
    validator: SignalValidator,
    victory: VictoryEvaluator,
    windows: TeamMap<ConsensusWindow>,
    ledger: ScoreLedger,
    lifecycle: MatchLifecycle,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new(MatchRules::default())
    }
}

impl MatchSession {
    pub fn new(rules: MatchRules) -> Self {
        Self {
            rules,
            validator: SignalValidator::new(rules.signal_freshness_ms),
            victory: VictoryEvaluator::new(rules.victory_gap),
            windows: TeamMap::from_fn(|team| ConsensusWindow::new(team, rules.consensus_window_ms)),
            ledger: ScoreLedger::new(),
            lifecycle: MatchLifecycle::new(),
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn submit_strike(
        &mut self,
        judge: JudgeId,
        team: TeamId,
        action: ScoringAction,
        timestamp: EpochMillis,
        now: EpochMillis,
    ) -> Transition {
        if let Err(reason) = self
            .validator
            .validate(self.lifecycle.is_active(), timestamp, now)
        {
            return Transition::rejected(reason);
        }

        match self.windows[team].admit(judge, timestamp) {
            Admission::Waiting { ticket } => Transition {
                outcome: SignalOutcome::Pending,
                events: Vec::new(),
                timer: TimerDirective::Arm(ticket),
            },
            Admission::Discarded { .. } => Transition {
                outcome: SignalOutcome::Discarded,
                events: Vec::new(),
                timer: TimerDirective::Cancel(team),
            },
            Admission::Confirmed => {
                let points = action.points();
                let score = self.ledger.apply_confirmed_points(team, points);
                Transition {
                    outcome: SignalOutcome::Confirmed {
                        team,
                        points,
                        score,
                    },
                    events: self.score_changed(now),
                    timer: TimerDirective::Cancel(team),
                }
            }
        }
    }

    pub fn adjust_score(
        &mut self,
        team: TeamId,
        adjustment: ManualAdjustment,
        now: EpochMillis,
    ) -> Transition {
        if let Err(reason) = SignalValidator::require_active(self.lifecycle.is_active()) {
            return Transition::rejected(reason);
        }

        self.ledger.adjust_manual(team, adjustment);
        Transition {
            outcome: SignalOutcome::Applied,
            events: self.score_changed(now),
            timer: TimerDirective::Keep,
        }
    }

    pub fn record_penalty(&mut self, team: TeamId) -> Transition {
        if let Err(reason) = SignalValidator::require_active(self.lifecycle.is_active()) {
            return Transition::rejected(reason);
        }

        self.ledger.apply_penalty(team);
        Transition {
            outcome: SignalOutcome::Applied,
            events: vec![MatchEvent::PenaltyUpdated(self.ledger.penalty_snapshot())],
            timer: TimerDirective::Keep,
        }
    }

    /// Re-initialise everything. Accepted from any phase.
    pub fn reset(&mut self) -> Transition {
        for team in TeamId::ALL {
            self.windows[team].clear();
        }
        self.ledger.clear();
        self.lifecycle.process_event(LifecycleEvent::Reset);

        let snapshot = self.snapshot();
        Transition {
            outcome: SignalOutcome::Applied,
            events: vec![
                MatchEvent::MatchReset(snapshot),
                MatchEvent::ScoreUpdated(snapshot.scores()),
            ],
            timer: TimerDirective::CancelAll,
        }
    }

    /// Debounce expiry for a team's lone pending signal.
    pub fn expire(&mut self, ticket: DebounceTicket) -> bool {
        self.windows[ticket.team].expire(ticket)
    }

    /// Fail-open after an undeliverable victory notice.
    pub fn retract_victory(&mut self) {
        if self.lifecycle.phase() == MatchPhase::Ended {
            self.lifecycle.process_event(LifecycleEvent::VictoryRetracted);
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::new(
            self.ledger.score_snapshot(),
            self.ledger.penalty_snapshot(),
            self.lifecycle.is_active(),
        )
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn pending_len(&self, team: TeamId) -> usize {
        self.windows[team].len()
    }

    pub fn is_timer_armed(&self, team: TeamId) -> bool {
        self.windows[team].is_armed()
    }

    pub fn resets(&self) -> u64 {
        self.lifecycle.resets()
    }

    fn score_changed(&mut self, now: EpochMillis) -> Vec<MatchEvent> {
        let scores = self.ledger.score_snapshot();
        let mut events = vec![MatchEvent::ScoreUpdated(scores)];
        if let Some(result) = self.victory.check(&mut self.lifecycle, scores, now) {
            events.push(MatchEvent::MatchWon(result));
        }
        events
    }
}
