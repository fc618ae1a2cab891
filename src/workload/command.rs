//! # Command Selector
//!
//! Entrypoint and arguments for each task the operator runs.

use tracing::debug;

use crate::constants::{
    DEBUG_SLEEP_COMMAND, INIT_ENTRYPOINT, INIT_SCRIPT, KEYSTONE_MANAGE, TASK_ENTRYPOINT,
};

/// Task run by a generated container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// `keystone-manage bootstrap`
    Bootstrap,
    /// `keystone-manage db_sync` (schema migration)
    DbSync,
    /// `keystone-manage trust_flush`
    TrustFlush,
    /// Configuration merge run as init container before every task
    ConfigInit,
}

impl TaskKind {
    /// Whether a debug flag may replace this task's command
    #[must_use]
    pub fn supports_debug(&self) -> bool {
        matches!(self, TaskKind::DbSync)
    }

    fn manage_subcommand(&self) -> Option<&'static str> {
        match self {
            TaskKind::Bootstrap => Some("bootstrap"),
            TaskKind::DbSync => Some("db_sync"),
            TaskKind::TrustFlush => Some("trust_flush"),
            TaskKind::ConfigInit => None,
        }
    }
}

/// Container `command` and `args`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCommand {
    pub entrypoint: Vec<String>,
    pub args: Vec<String>,
}

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

/// Select the command for `task`
///
/// When `debug` is set and the task supports it, the arguments become an
/// indefinite sleep so an operator can exec into the pod.
pub fn select_command(task: TaskKind, debug: bool) -> TaskCommand {
    let Some(subcommand) = task.manage_subcommand() else {
        return TaskCommand {
            entrypoint: strings(&INIT_ENTRYPOINT),
            args: strings(&[INIT_SCRIPT]),
        };
    };

    let args = if debug && task.supports_debug() {
        debug!(?task, "debug enabled, replacing command with sleep");
        strings(&DEBUG_SLEEP_COMMAND)
    } else {
        strings(&[KEYSTONE_MANAGE, subcommand])
    };

    TaskCommand {
        entrypoint: strings(&TASK_ENTRYPOINT),
        args,
    }
}
