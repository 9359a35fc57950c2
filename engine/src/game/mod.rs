//! Game state and scoring reducer
//!
//! A single `GameState` value is mutated by `Action`s, one at a time. The
//! reducer owns all sorting rules: a task can be dropped once, drops are
//! scored against the task's correct bucket, and the results screen is
//! reached when every task is sorted.

use focus_sdk::{Bucket, Task};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::store::{SoundSettings, SCORE_HISTORY_LIMIT};

pub mod messages;

/// Screens of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Start,
    Sort,
    Results,
    Settings,
}

/// Reducer actions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetGoal(String),
    /// Replace the active task list and reset counters
    SetTasks(Vec<Task>),
    GenerationStarted,
    GenerationFailed(String),
    /// Navigate, remembering the current screen
    GoToScreen(Screen),
    /// Return to the previously visited screen
    Back,
    DropTask {
        id: String,
        bucket: Bucket,
    },
    ClearMessage,
    ToggleSound,
    SetShowOnboarding(bool),
    UpdateSettings(SoundSettings),
    RecordScore(u8),
    Reset,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub screen: Screen,
    pub goal: String,
    pub tasks: Vec<Task>,
    pub sorted_count: usize,
    pub correct_count: usize,
    /// Previously visited screens, most recent last
    pub history: Vec<Screen>,
    /// Transient flavor message or notice
    pub last_message: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub sound_enabled: bool,
    pub show_onboarding: bool,
    pub settings: SoundSettings,
    /// Most recent first, at most five entries
    pub score_history: Vec<u8>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(SoundSettings::default(), Vec::new())
    }
}

impl GameState {
    /// Fresh state with persisted settings and score history.
    pub fn new(settings: SoundSettings, mut score_history: Vec<u8>) -> Self {
        score_history.truncate(SCORE_HISTORY_LIMIT);
        Self {
            screen: Screen::Start,
            goal: String::new(),
            tasks: Vec::new(),
            sorted_count: 0,
            correct_count: 0,
            history: Vec::new(),
            last_message: None,
            loading: false,
            error: None,
            sound_enabled: true,
            show_onboarding: true,
            settings,
            score_history,
        }
    }

    /// Apply an action using the thread-local RNG for flavor messages.
    pub fn reduce(&mut self, action: Action) {
        self.reduce_with_rng(action, &mut rand::thread_rng());
    }

    /// Apply an action.
    pub fn reduce_with_rng<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) {
        match action {
            Action::SetGoal(goal) => self.goal = goal,
            Action::SetTasks(tasks) => {
                self.tasks = tasks;
                self.sorted_count = 0;
                self.correct_count = 0;
                self.loading = false;
            }
            Action::GenerationStarted => {
                self.loading = true;
                self.error = None;
            }
            Action::GenerationFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Action::GoToScreen(screen) => self.navigate(screen),
            Action::Back => {
                if let Some(previous) = self.history.pop() {
                    self.screen = previous;
                }
            }
            Action::DropTask { id, bucket } => self.drop_task(&id, bucket, rng),
            Action::ClearMessage => self.last_message = None,
            Action::ToggleSound => self.sound_enabled = !self.sound_enabled,
            Action::SetShowOnboarding(show) => self.show_onboarding = show,
            Action::UpdateSettings(settings) => self.settings = settings.normalized(),
            Action::RecordScore(score) => {
                self.score_history.insert(0, score.min(100));
                self.score_history.truncate(SCORE_HISTORY_LIMIT);
            }
            Action::Reset => {
                self.screen = Screen::Start;
                self.goal.clear();
                self.tasks.clear();
                self.sorted_count = 0;
                self.correct_count = 0;
                self.history.clear();
                self.last_message = None;
                self.loading = false;
                self.error = None;
                self.show_onboarding = true;
            }
        }
    }

    fn navigate(&mut self, screen: Screen) {
        if self.screen != screen {
            self.history.push(self.screen);
            self.screen = screen;
        }
    }

    fn drop_task<R: Rng + ?Sized>(&mut self, id: &str, bucket: Bucket, rng: &mut R) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(id, "Drop for unknown task ignored");
            return;
        };
        if task.is_sorted() {
            return;
        }

        let correct = task.correct_bucket == bucket;
        task.sorted_bucket = Some(bucket);
        self.sorted_count += 1;
        if correct {
            self.correct_count += 1;
        }
        self.last_message = Some(messages::pick(correct, rng).to_string());

        if self.sorted_count >= self.tasks.len() {
            self.navigate(Screen::Results);
        }
    }

    /// Whether every task has been sorted.
    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.sorted_count >= self.tasks.len()
    }

    /// Percentage of correct drops over all tasks, rounded.
    pub fn score(&self) -> u8 {
        score(self.correct_count, self.tasks.len())
    }

    /// Tasks not yet sorted, in list order.
    pub fn remaining(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.is_sorted())
    }
}

/// `round(correct / total * 100)`, 0 for an empty list.
pub fn score(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (correct.min(total) as f64 / total as f64 * 100.0).round();
    percent as u8
}
