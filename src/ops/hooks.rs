//! Lifecycle hook execution.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Configuration, HookAction};
use crate::util::process::{shell_command, ProcessBuilder};
use crate::util::{Shell, Status};

/// Run every action registered under `name`, in declaration order, from the
/// project root. The first failing action aborts the rest.
pub fn run_hooks(config: &Configuration, name: &str, root: &Path, shell: &Shell) -> Result<()> {
    let actions = config.hook(name);
    for action in actions {
        let builder = match action {
            HookAction::Command { command } | HookAction::Line(command) => shell_command(command),
            HookAction::Script { script } => ProcessBuilder::new(root.join(script)),
        };
        let builder = builder.cwd(root);
        shell.status(Status::Running, format!("{name} hook: {}", builder.display_command()));
        builder
            .exec_and_check()
            .with_context(|| format!("{name} hook failed"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compose;
    use tempfile::TempDir;

    fn config_with_hooks(root: &Path, yaml: &str) -> Configuration {
        crate::config::save_profile_document(root, "common", &serde_yaml::from_str(yaml).unwrap())
            .unwrap();
        compose(&[], root, &Shell::silent()).unwrap()
    }

    #[test]
    #[cfg(unix)]
    fn test_hooks_run_in_order_from_project_root() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_hooks(
            tmp.path(),
            "hooks:\n  pre-build:\n    - 'echo one >> order.txt'\n    - 'echo two >> order.txt'\n",
        );

        run_hooks(&config, "pre-build", tmp.path(), &Shell::silent()).unwrap();
        let order = std::fs::read_to_string(tmp.path().join("order.txt")).unwrap();
        assert_eq!(order, "one\ntwo\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_failing_hook_aborts() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_hooks(
            tmp.path(),
            "hooks:\n  pre-build:\n    - 'false'\n    - 'echo reached >> order.txt'\n",
        );

        assert!(run_hooks(&config, "pre-build", tmp.path(), &Shell::silent()).is_err());
        assert!(!tmp.path().join("order.txt").exists());
    }

    #[test]
    fn test_unregistered_hook_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_hooks(tmp.path(), "{}");
        run_hooks(&config, "post-clean", tmp.path(), &Shell::silent()).unwrap();
    }
}
