//! Startup hooks run once when the client shell starts.
//!
//! Each hook is an independent async task. The [`Bootstrapper`] drives all
//! registered hooks concurrently and collects their outcomes; no hook reads
//! or writes state owned by another, so their interleaving does not matter.

pub mod auth;
pub mod config;

use futures::future::{BoxFuture, join_all};

use crate::config::ExecutionContext;

pub use auth::{AuthRestoreBootstrap, AuthSession};
pub use config::{ConfigBootstrap, ConfigStore};

/// Result of running one startup hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook did nothing because it is not running in the client.
    Skipped,
    /// The hook ran to completion, optionally with a short detail.
    Completed { detail: Option<String> },
    /// The hook failed and swallowed the error.
    Degraded { reason: String },
}

impl HookOutcome {
    /// Completed without detail.
    #[must_use]
    pub const fn completed() -> Self {
        Self::Completed { detail: None }
    }

    /// Whether the hook failed.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// A one-shot initialization routine run at client startup.
pub trait StartupHook: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Run the hook. Never fails; failures are reported as
    /// [`HookOutcome::Degraded`].
    fn run(&self, context: ExecutionContext) -> BoxFuture<'_, HookOutcome>;
}

/// Outcomes of a bootstrap run, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub outcomes: Vec<(&'static str, HookOutcome)>,
}

impl BootstrapReport {
    /// Outcome for the hook called `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&HookOutcome> {
        self.outcomes
            .iter()
            .find(|(hook, _)| *hook == name)
            .map(|(_, outcome)| outcome)
    }

    /// Whether any hook degraded.
    #[must_use]
    pub fn has_degraded(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.is_degraded())
    }
}

/// Runs every registered [`StartupHook`] for one execution context.
pub struct Bootstrapper {
    context: ExecutionContext,
    hooks: Vec<Box<dyn StartupHook>>,
}

impl Bootstrapper {
    #[must_use]
    pub const fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            hooks: Vec::new(),
        }
    }

    /// Register a hook.
    #[must_use]
    pub fn with_hook(mut self, hook: impl StartupHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Execution context hooks will be run in.
    #[must_use]
    pub const fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Run all hooks concurrently and wait for every one to finish.
    pub async fn run(&self) -> BootstrapReport {
        tracing::debug!(
            context = %self.context,
            hooks = self.hooks.len(),
            "Running startup hooks"
        );

        let outcomes = join_all(self.hooks.iter().map(|hook| async move {
            let outcome = hook.run(self.context).await;
            tracing::debug!(hook = hook.name(), ?outcome, "Startup hook finished");
            (hook.name(), outcome)
        }))
        .await;

        BootstrapReport { outcomes }
    }
}
