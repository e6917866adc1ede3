//! Mock platform service for testing
//!
//! These are test utilities - not all may be used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use quorum_merge::error::{Error, Result};
use quorum_merge::platform::PlatformService;
use quorum_merge::types::{LabelSpec, MergeRequest, MergeResult, PlatformConfig, PrState};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Responses handed out in order; the last one repeats forever
#[derive(Debug)]
struct Script<T: Clone> {
    steps: VecDeque<T>,
}

impl<T: Clone> Script<T> {
    fn new(steps: Vec<T>) -> Self {
        assert!(!steps.is_empty(), "script needs at least one step");
        Self {
            steps: steps.into(),
        }
    }

    fn advance(&mut self) -> T {
        if self.steps.len() > 1 {
            self.steps.pop_front().unwrap()
        } else {
            self.steps.front().cloned().unwrap()
        }
    }
}

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub request: MergeRequest,
}

/// Call record for `add_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelCall {
    pub pr_number: u64,
    pub name: String,
}

/// Scripted mock platform service
///
/// Features:
/// - Scripted PR states, reviewer lists and per-reviewer decisions
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    login: String,
    // Scripted responses
    states: Mutex<Script<PrState>>,
    reviewers: Mutex<Script<Vec<String>>>,
    approvals: Mutex<HashMap<String, Script<bool>>>,
    merge_response: Mutex<MergeResult>,
    // Call tracking
    state_calls: Mutex<usize>,
    reviewer_calls: Mutex<usize>,
    approval_calls: Mutex<Vec<String>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    ensure_label_calls: Mutex<Vec<LabelSpec>>,
    add_label_calls: Mutex<Vec<AddLabelCall>>,
    // Error injection
    error_on_state: Mutex<Option<String>>,
    error_on_auth: Mutex<Option<String>>,
    error_on_merge_pr: Mutex<Option<String>>,
    error_on_ensure_label: Mutex<Option<String>>,
    error_on_add_label: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config: PR open, no reviewers
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            login: "github-actions[bot]".to_string(),
            states: Mutex::new(Script::new(vec![PrState::Open])),
            reviewers: Mutex::new(Script::new(vec![Vec::new()])),
            approvals: Mutex::new(HashMap::new()),
            merge_response: Mutex::new(MergeResult {
                merged: true,
                sha: Some("merged_sha".to_string()),
                message: None,
            }),
            state_calls: Mutex::new(0),
            reviewer_calls: Mutex::new(0),
            approval_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            ensure_label_calls: Mutex::new(Vec::new()),
            add_label_calls: Mutex::new(Vec::new()),
            error_on_state: Mutex::new(None),
            error_on_auth: Mutex::new(None),
            error_on_merge_pr: Mutex::new(None),
            error_on_ensure_label: Mutex::new(None),
            error_on_add_label: Mutex::new(None),
        }
    }

    // === Scripting methods ===

    /// PR states returned by successive `get_pr_state` calls
    pub fn script_states(&self, states: Vec<PrState>) {
        *self.states.lock().unwrap() = Script::new(states);
    }

    /// Reviewer lists returned by successive `get_requested_reviewers` calls
    pub fn script_reviewers(&self, reviewers: Vec<Vec<&str>>) {
        let steps = reviewers
            .into_iter()
            .map(|list| list.into_iter().map(String::from).collect())
            .collect();
        *self.reviewers.lock().unwrap() = Script::new(steps);
    }

    /// Decisions returned by successive `is_reviewer_approved` calls for `login`
    pub fn script_approvals(&self, login: &str, approvals: Vec<bool>) {
        self.approvals
            .lock()
            .unwrap()
            .insert(login.to_string(), Script::new(approvals));
    }

    /// Set the response for `merge_pr`
    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = result;
    }

    // === Error injection methods ===

    /// Make `get_pr_state` return an error
    pub fn fail_state(&self, msg: &str) {
        *self.error_on_state.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `authenticated_user` return an error
    pub fn fail_auth(&self, msg: &str) {
        *self.error_on_auth.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error
    pub fn fail_merge_pr(&self, msg: &str) {
        *self.error_on_merge_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `ensure_label` return an error
    pub fn fail_ensure_label(&self, msg: &str) {
        *self.error_on_ensure_label.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_label` return an error
    pub fn fail_add_label(&self, msg: &str) {
        *self.error_on_add_label.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Number of `get_pr_state` calls
    pub fn state_call_count(&self) -> usize {
        *self.state_calls.lock().unwrap()
    }

    /// Number of `get_requested_reviewers` calls
    pub fn reviewer_call_count(&self) -> usize {
        *self.reviewer_calls.lock().unwrap()
    }

    /// Logins passed to `is_reviewer_approved`, in call order
    pub fn get_approval_calls(&self) -> Vec<String> {
        self.approval_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr_comment` calls
    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Get all `ensure_label` calls
    pub fn get_ensure_label_calls(&self) -> Vec<LabelSpec> {
        self.ensure_label_calls.lock().unwrap().clone()
    }

    /// Get all `add_label` calls
    pub fn get_add_label_calls(&self) -> Vec<AddLabelCall> {
        self.add_label_calls.lock().unwrap().clone()
    }

    /// Get count of `merge_pr` calls
    pub fn merge_call_count(&self) -> usize {
        self.merge_pr_calls.lock().unwrap().len()
    }

    /// Comments containing `needle`
    pub fn comments_containing(&self, needle: &str) -> Vec<CreateCommentCall> {
        self.get_create_comment_calls()
            .into_iter()
            .filter(|c| c.body.contains(needle))
            .collect()
    }

    /// Assert that `merge_pr` was NOT called
    pub fn assert_merge_not_called(&self) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.is_empty(),
            "Expected merge_pr NOT to be called but it was: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was called exactly once for a specific PR
    pub fn assert_merged_once(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert_eq!(calls.len(), 1, "Expected exactly one merge_pr call: {calls:?}");
        assert_eq!(calls[0].pr_number, pr_number);
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn authenticated_user(&self) -> Result<String> {
        if let Some(msg) = self.error_on_auth.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.login.clone())
    }

    async fn get_pr_state(&self, _pr_number: u64) -> Result<PrState> {
        *self.state_calls.lock().unwrap() += 1;

        if let Some(msg) = self.error_on_state.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self.states.lock().unwrap().advance())
    }

    async fn get_requested_reviewers(&self, _pr_number: u64) -> Result<Vec<String>> {
        *self.reviewer_calls.lock().unwrap() += 1;
        Ok(self.reviewers.lock().unwrap().advance())
    }

    async fn is_reviewer_approved(&self, _pr_number: u64, login: &str) -> Result<bool> {
        self.approval_calls.lock().unwrap().push(login.to_string());
        let mut approvals = self.approvals.lock().unwrap();
        Ok(approvals.get_mut(login).is_some_and(Script::advance))
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, request: &MergeRequest) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr_number,
            request: request.clone(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self.merge_response.lock().unwrap().clone())
    }

    async fn ensure_label(&self, label: &LabelSpec) -> Result<()> {
        self.ensure_label_calls.lock().unwrap().push(label.clone());
        if let Some(msg) = self.error_on_ensure_label.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(())
    }

    async fn add_label(&self, pr_number: u64, name: &str) -> Result<()> {
        self.add_label_calls.lock().unwrap().push(AddLabelCall {
            pr_number,
            name: name.to_string(),
        });
        if let Some(msg) = self.error_on_add_label.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
