//! Session controller.
//!
//! Owns one project tree for the lifetime of a session together with the
//! selection cursor, the XP/streak tracker, the progress store and the
//! completion policy. Every mutation of the tree goes through here and on
//! to the state machine.
//!
//! Completion attempts are two-phase: [`SessionController::begin_completion`]
//! hands out a ticket and marks the session busy, and
//! [`SessionController::finish_completion`] applies the outcome once the
//! simulated grading delay has elapsed. [`SessionController::attempt_completion`]
//! runs both with the delay in between.

use crate::{
    CompletionOutcome, CompletionPolicy, Project, ProgressStore, QuestConfig, Step, Task,
    XpStreakTracker,
};
use derive_getters::Getters;
use skillpilot_core::{
    Achievement, FailureReason, SessionEvent, SessionPointer, StepState, StepStatus,
};
use skillpilot_error::{
    IllegalTransitionError, IllegalTransitionKind, NotFoundError, NotFoundKind, SessionError,
    SessionErrorKind, SkillPilotError, SkillPilotResult,
};
use tracing::{debug, info, instrument, warn};

/// Transcript shown by a run preview when the step defines no expected output.
pub const DEFAULT_RUN_OUTPUT: &str =
    "Code executed successfully!\n> Hello, world!\n> Program completed with exit code 0";

/// Result of a selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The cursor moved
    Selected {
        /// Selected task id
        task_id: String,
        /// Selected step id, when the task has an unlocked step
        step_id: Option<String>,
    },
    /// The item is locked; the cursor did not move
    Blocked {
        /// Human-readable block reason
        reason: String,
    },
}

impl Selection {
    /// Returns true when the cursor moved.
    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected { .. })
    }
}

/// An in-flight completion attempt.
///
/// Snapshots the step it targets, so later selection changes do not
/// redirect the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct CompletionTicket {
    /// Ticket number, unique within the session
    id: u64,
    /// Targeted task
    task_id: String,
    /// Targeted step
    step_id: String,
    /// Whether the learner changed their working content
    has_unsaved_edits: bool,
}

/// Outcome of a finished completion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReport {
    /// The attempt passed and the step is completed
    Passed {
        /// State machine snapshot
        outcome: Box<CompletionOutcome>,
        /// Streak milestone reached, if any
        achievement: Option<Achievement>,
    },
    /// The attempt failed; progression is unchanged
    Failed {
        /// Why it failed
        reason: FailureReason,
    },
}

impl CompletionReport {
    /// Returns true when the attempt passed.
    pub fn passed(&self) -> bool {
        matches!(self, CompletionReport::Passed { .. })
    }
}

/// Result of a simulated run of the learner's work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPreview {
    /// Nothing changed, so nothing was run
    Refused {
        /// Message for the learner
        message: String,
    },
    /// Simulated program output
    Output(String),
}

/// Mediates every request against one live project tree.
pub struct SessionController {
    project: Project,
    selected_task: Option<String>,
    selected_step: Option<String>,
    tracker: XpStreakTracker,
    store: Box<dyn ProgressStore + Send>,
    policy: Box<dyn CompletionPolicy + Send>,
    config: QuestConfig,
    pending: Option<CompletionTicket>,
    next_ticket: u64,
    status: StepStatus,
    hint_level: u8,
    events: Vec<SessionEvent>,
    degraded: bool,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("project", self.project.id())
            .field("selected_task", &self.selected_task)
            .field("selected_step", &self.selected_step)
            .field("tracker", &self.tracker)
            .field("pending", &self.pending)
            .field("status", &self.status)
            .field("hint_level", &self.hint_level)
            .field("degraded", &self.degraded)
            .finish()
    }
}

impl SessionController {
    /// Starts a session over `project`.
    ///
    /// Restores the streak and the saved cursor from `store`. A saved
    /// pointer is only trusted if its task and step are still unlocked in
    /// the live tree; otherwise the first unlocked task and step are
    /// selected. Store failures are logged and the session continues with
    /// an in-memory cursor.
    #[instrument(skip_all, fields(project = %project.id()))]
    pub fn start(
        project: Project,
        store: Box<dyn ProgressStore + Send>,
        policy: Box<dyn CompletionPolicy + Send>,
        config: QuestConfig,
    ) -> Self {
        let mut session = Self {
            project,
            selected_task: None,
            selected_step: None,
            tracker: XpStreakTracker::default(),
            store,
            policy,
            config,
            pending: None,
            next_ticket: 1,
            status: StepStatus::Idle,
            hint_level: 0,
            events: Vec::new(),
            degraded: false,
        };

        match session.store.load_streak() {
            Ok(streak) => session.tracker = XpStreakTracker::new(streak),
            Err(e) => session.degrade("load streak", &e),
        }

        if !session.restore_cursor() {
            session.select_first_unlocked();
        }
        session
    }

    fn restore_cursor(&mut self) -> bool {
        let pointer = match self.store.load_pointer(self.project.id()) {
            Ok(Some(pointer)) => pointer,
            Ok(None) => return false,
            Err(e) => {
                self.degrade("load session pointer", &e);
                return false;
            }
        };

        let still_unlocked = pointer.project_id() == self.project.id()
            && self
                .project
                .task(pointer.task_id())
                .filter(|task| task.is_unlocked())
                .and_then(|task| task.step(pointer.step_id()))
                .is_some_and(Step::is_unlocked);

        if !still_unlocked {
            warn!(
                task = %pointer.task_id(),
                step = %pointer.step_id(),
                "Saved session pointer is stale, falling back to first unlocked step"
            );
            return false;
        }

        info!(task = %pointer.task_id(), step = %pointer.step_id(), "Resumed from saved session");
        self.selected_task = Some(pointer.task_id().clone());
        self.selected_step = Some(pointer.step_id().clone());
        self.events.push(SessionEvent::Resumed {
            task_id: pointer.task_id().clone(),
            step_id: pointer.step_id().clone(),
        });
        true
    }

    fn select_first_unlocked(&mut self) {
        let Some(task) = self.project.first_unlocked_task() else {
            warn!("Project has no unlocked task");
            return;
        };
        self.selected_task = Some(task.id().clone());
        self.selected_step = task.first_unlocked_step().map(|s| s.id().clone());
        debug!(task = ?self.selected_task, step = ?self.selected_step, "Selected first unlocked step");
        self.persist_cursor();
    }

    /// Selects a task.
    ///
    /// A locked task leaves the cursor alone and returns the block reason,
    /// also emitted as `task-locked`. An unlocked task becomes current with
    /// its first unlocked step.
    ///
    /// # Errors
    ///
    /// `NotFoundError` for an unknown task id.
    #[instrument(skip(self))]
    pub fn select_task(&mut self, task_id: &str) -> SkillPilotResult<Selection> {
        let task = self.project.task(task_id).ok_or_else(|| {
            NotFoundError::new(NotFoundKind::Task {
                project: self.project.id().clone(),
                task: task_id.to_string(),
            })
        })?;

        if !task.is_unlocked() {
            let verdict = self.project.task_unlockability(task_id)?;
            let reason = verdict
                .reason()
                .unwrap_or_else(|| "This task is currently locked".to_string());
            debug!(%reason, "Task selection blocked");
            if let Some(event) = SessionEvent::locked(&verdict) {
                self.events.push(event);
            }
            return Ok(Selection::Blocked { reason });
        }

        let step_id = task.first_unlocked_step().map(|s| s.id().clone());
        self.selected_task = Some(task_id.to_string());
        self.selected_step = step_id.clone();
        self.reset_step_view();
        self.persist_cursor();
        info!(step = ?step_id, "Task selected");
        Ok(Selection::Selected {
            task_id: task_id.to_string(),
            step_id,
        })
    }

    /// Selects a step of the currently selected task.
    ///
    /// # Errors
    ///
    /// `SessionError::NoActiveTask` when no task is selected and
    /// `NotFoundError` when the step is not part of it.
    #[instrument(skip(self))]
    pub fn select_step(&mut self, step_id: &str) -> SkillPilotResult<Selection> {
        let task = self.current_task()?;
        let step = task.step(step_id).ok_or_else(|| {
            NotFoundError::new(NotFoundKind::Step {
                task: task.id().clone(),
                step: step_id.to_string(),
            })
        })?;

        if !step.is_unlocked() {
            let verdict = task.step_unlockability(step_id)?;
            let reason = verdict
                .reason()
                .unwrap_or_else(|| "This step is currently locked".to_string());
            debug!(%reason, "Step selection blocked");
            if let Some(event) = SessionEvent::locked(&verdict) {
                self.events.push(event);
            }
            return Ok(Selection::Blocked { reason });
        }

        let task_id = task.id().clone();
        self.selected_step = Some(step_id.to_string());
        self.reset_step_view();
        self.persist_cursor();
        info!("Step selected");
        Ok(Selection::Selected {
            task_id,
            step_id: Some(step_id.to_string()),
        })
    }

    /// Opens a completion attempt for the selected step.
    ///
    /// # Errors
    ///
    /// `SessionError::Busy` while another attempt is in flight,
    /// `SessionError::NoActiveStep` without a selected step, and
    /// `IllegalTransitionError` when the step is not currently unlocked.
    #[instrument(skip(self))]
    pub fn begin_completion(&mut self, has_unsaved_edits: bool) -> SkillPilotResult<CompletionTicket> {
        if self.pending.is_some() {
            warn!("Completion attempt rejected, another attempt is in flight");
            return Err(SessionError::new(SessionErrorKind::Busy).into());
        }

        let task = self.current_task()?;
        let step = self.current_step()?;
        match step.state() {
            StepState::Unlocked => {}
            StepState::Locked => {
                return Err(IllegalTransitionError::new(IllegalTransitionKind::StepLocked(
                    step.id().clone(),
                ))
                .into());
            }
            StepState::Completed => {
                return Err(IllegalTransitionError::new(
                    IllegalTransitionKind::StepAlreadyCompleted(step.id().clone()),
                )
                .into());
            }
        }

        let ticket = CompletionTicket {
            id: self.next_ticket,
            task_id: task.id().clone(),
            step_id: step.id().clone(),
            has_unsaved_edits,
        };
        self.next_ticket += 1;
        self.pending = Some(ticket.clone());
        self.status = StepStatus::Processing;
        debug!(ticket = ticket.id, "Completion attempt started");
        Ok(ticket)
    }

    /// Applies a completion attempt.
    ///
    /// Effects are applied unconditionally once called. Use
    /// [`SessionController::abandon_completion`] to withdraw an attempt
    /// instead.
    ///
    /// # Errors
    ///
    /// `SessionError::UnknownTicket` when `ticket` is not the pending attempt.
    #[instrument(skip(self, ticket), fields(ticket = ticket.id))]
    pub fn finish_completion(&mut self, ticket: CompletionTicket) -> SkillPilotResult<CompletionReport> {
        match &self.pending {
            Some(pending) if pending.id == ticket.id => {}
            _ => return Err(SessionError::new(SessionErrorKind::UnknownTicket(ticket.id)).into()),
        }
        self.pending = None;

        if !self.policy.evaluate(ticket.has_unsaved_edits) {
            return Ok(self.apply_failure(&ticket));
        }

        let outcome = match self.project.complete_step(&ticket.task_id, &ticket.step_id) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.status = StepStatus::Idle;
                return Err(e);
            }
        };

        let achievement = self.tracker.record_success();
        self.tracker.award_xp(i64::from(*outcome.xp_awarded()))?;
        self.persist_streak();

        self.status = StepStatus::Completed;
        self.events.push(SessionEvent::StepCompleted {
            step_id: ticket.step_id.clone(),
            xp_awarded: *outcome.xp_awarded(),
        });
        if *outcome.task_completed() {
            self.events.push(SessionEvent::TaskCompleted {
                task_id: ticket.task_id.clone(),
            });
        }
        if let Some(kind) = achievement {
            self.events.push(SessionEvent::Achievement(kind));
        }

        info!(
            step = %ticket.step_id,
            xp = outcome.xp_awarded(),
            percentage = outcome.percentage(),
            "Completion attempt passed"
        );
        Ok(CompletionReport::Passed {
            outcome: Box::new(outcome),
            achievement,
        })
    }

    fn apply_failure(&mut self, ticket: &CompletionTicket) -> CompletionReport {
        let reason = if ticket.has_unsaved_edits {
            FailureReason::Rejected
        } else {
            FailureReason::Unchanged
        };
        self.tracker.record_failure();
        self.persist_streak();
        self.hint_level = self
            .hint_level
            .saturating_add(1)
            .min(*self.config.max_hints_level());
        self.status = StepStatus::Failed;
        self.events.push(SessionEvent::CompletionFailed { reason });
        info!(step = %ticket.step_id, %reason, hint_level = self.hint_level, "Completion attempt failed");
        CompletionReport::Failed { reason }
    }

    /// Withdraws a pending completion attempt without applying it.
    ///
    /// Progression state, XP and streak are untouched and the session can
    /// start a new attempt straight away.
    ///
    /// # Errors
    ///
    /// `SessionError::UnknownTicket` when `ticket` is not the pending attempt.
    #[instrument(skip(self, ticket), fields(ticket = ticket.id))]
    pub fn abandon_completion(&mut self, ticket: &CompletionTicket) -> SkillPilotResult<()> {
        if !self.release_pending(ticket.id) {
            return Err(SessionError::new(SessionErrorKind::UnknownTicket(ticket.id)).into());
        }
        info!(step = %ticket.step_id, "Completion attempt abandoned");
        Ok(())
    }

    /// Runs a completion attempt end to end, waiting out the configured
    /// grading delay between opening and applying it.
    ///
    /// Dropping the future before the delay elapses abandons the attempt.
    pub async fn attempt_completion(
        &mut self,
        has_unsaved_edits: bool,
    ) -> SkillPilotResult<CompletionReport> {
        let delay = self.config.completion_delay();
        let ticket = self.begin_completion(has_unsaved_edits)?;
        let mut guard = PendingGuard {
            session: self,
            ticket_id: ticket.id,
            armed: true,
        };
        tokio::time::sleep(delay).await;
        guard.armed = false;
        guard.session.finish_completion(ticket)
    }

    fn release_pending(&mut self, ticket_id: u64) -> bool {
        if !self.pending.as_ref().is_some_and(|p| p.id == ticket_id) {
            return false;
        }
        self.pending = None;
        self.status = StepStatus::Idle;
        true
    }

    /// Simulates running the learner's work on the selected step.
    ///
    /// Never changes progression state.
    pub fn preview_run(&self, has_unsaved_edits: bool) -> SkillPilotResult<RunPreview> {
        let step = self.current_step()?;
        if !has_unsaved_edits {
            return Ok(RunPreview::Refused {
                message: "Make changes to the code before running".to_string(),
            });
        }
        Ok(RunPreview::Output(
            step.expected_output()
                .clone()
                .unwrap_or_else(|| DEFAULT_RUN_OUTPUT.to_string()),
        ))
    }

    /// Hints of the selected step revealed so far.
    pub fn visible_hints(&self) -> &[String] {
        match self.current_step() {
            Ok(step) => {
                let shown = usize::from(self.hint_level).min(step.hints().len());
                &step.hints()[..shown]
            }
            Err(_) => &[],
        }
    }

    /// Takes every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// The live project tree.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Currently selected task, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task
            .as_deref()
            .and_then(|id| self.project.task(id))
    }

    /// Currently selected step, if any.
    pub fn selected_step(&self) -> Option<&Step> {
        let step_id = self.selected_step.as_deref()?;
        self.selected_task()?.step(step_id)
    }

    /// XP and streak tracker.
    pub fn tracker(&self) -> &XpStreakTracker {
        &self.tracker
    }

    /// Status of the selected step.
    pub fn status(&self) -> StepStatus {
        self.status
    }

    /// Number of hints currently revealed.
    pub fn hint_level(&self) -> u8 {
        self.hint_level
    }

    /// Whether a completion attempt is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a progress store failure pushed the session to in-memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Ends the session, handing back the project tree.
    pub fn into_project(self) -> Project {
        self.project
    }

    fn current_task(&self) -> SkillPilotResult<&Task> {
        self.selected_task()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveTask).into())
    }

    fn current_step(&self) -> SkillPilotResult<&Step> {
        self.selected_step()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoActiveStep).into())
    }

    fn reset_step_view(&mut self) {
        if self.pending.is_none() {
            self.status = StepStatus::Idle;
        }
        self.hint_level = 0;
    }

    fn persist_cursor(&mut self) {
        let (Some(task_id), Some(step_id)) = (&self.selected_task, &self.selected_step) else {
            return;
        };
        let pointer = SessionPointer::new(self.project.id().clone(), task_id.clone(), step_id.clone());
        if let Err(e) = self.store.save_pointer(&pointer) {
            self.degrade("save session pointer", &e);
        }
    }

    fn persist_streak(&mut self) {
        if let Err(e) = self.store.save_streak(*self.tracker.streak()) {
            self.degrade("save streak", &e);
        }
    }

    fn degrade(&mut self, operation: &str, error: &SkillPilotError) {
        warn!(operation, %error, "Progress store unavailable, continuing in memory");
        self.degraded = true;
    }
}

/// Clears the pending attempt of an `attempt_completion` future dropped
/// during the grading delay.
struct PendingGuard<'a> {
    session: &'a mut SessionController,
    ticket_id: u64,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.session.release_pending(self.ticket_id) {
            debug!(ticket = self.ticket_id, "Completion attempt dropped before grading");
        }
    }
}
