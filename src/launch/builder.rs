//! Deterministic construction of the runtime argument vector.
//!
//! Argument order is part of the contract: tests assert on it, and the
//! entrypoint inside the image relies on the marker environment variables
//! being present regardless of which options are enabled. Everything here
//! works from the [`Host`] snapshot and the resolved runtime capabilities —
//! the builder itself never inspects process-global state.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::Config;
use crate::error::Result;
use crate::launch::host::Host;
use crate::launch::path::{PathResolver, lexical_clean};
use crate::launch::runtime::RuntimeCapabilities;

/// Credential and API-key variables forwarded verbatim when set on the
/// host. Emission follows this order, not environment iteration order.
pub const FORWARDED_ENV_VARS: [&str; 7] = [
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "COPILOT_GITHUB_TOKEN",
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "OPENROUTER_API_KEY",
    "GEMINI_API_KEY",
];

/// Named volumes that persist between runs (skipped under `--scratch`).
pub const PERSISTENT_VOLUMES: [(&str, &str); 2] =
    [("cordon-home", "/home/agent"), ("cordon-cache", "/var/cache")];

/// Named volume backing /output when the project is mounted read-only.
pub const OUTPUT_VOLUME: &str = "cordon-output";

/// A complete runtime argument vector (everything after the runtime
/// binary). Immutable once built; the builder holds no state across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation(Vec<String>);

impl Invocation {
    pub fn args(&self) -> &[String] {
        &self.0
    }

    pub fn into_args(self) -> Vec<String> {
        self.0
    }
}

/// Builds the `run` invocation for a merged [`Config`].
pub struct InvocationBuilder<'a> {
    config: &'a Config,
    host: &'a Host,
    capabilities: RuntimeCapabilities,
    forward_env: Vec<String>,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(config: &'a Config, host: &'a Host, capabilities: RuntimeCapabilities) -> Self {
        Self {
            config,
            host,
            capabilities,
            forward_env: FORWARDED_ENV_VARS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the env forwarding allow-list (for testing alternate policies).
    pub fn forward_env(mut self, list: Vec<String>) -> Self {
        self.forward_env = list;
        self
    }

    /// Build the argument vector for running `command` in the sandbox.
    ///
    /// The container is interactive when explicitly requested *or* when
    /// both standard streams are terminals, so the same path serves shell
    /// entry and piped tool invocations.
    pub fn build(
        &self,
        project_dir: &Path,
        command: &[String],
        interactive: bool,
    ) -> Result<Invocation> {
        let cfg = self.config;
        let project = absolutize(project_dir)?;
        let project_str = project.to_string_lossy().into_owned();
        let resolver = PathResolver::with_home(self.host.home.clone());

        let mut args: Vec<String> = vec!["run".into(), "--rm".into()];

        if interactive || self.host.stdio_tty {
            args.push("-it".into());
        }

        args.push("-w".into());
        args.push(project_str.clone());
        push_env(&mut args, "CORDON=1");
        push_env(&mut args, &format!("CORDON_PROJECT_PATH={project_str}"));
        if cfg.no_yolo {
            push_env(&mut args, "NO_YOLO=1");
        }
        for key in ["TERM", "LANG"] {
            if let Some(value) = self.host.env(key) {
                push_env(&mut args, &format!("{key}={value}"));
            }
        }

        for key in &self.forward_env {
            if let Some(value) = self.host.env(key) {
                push_env(&mut args, &format!("{key}={value}"));
            }
        }

        if cfg.gh_token
            && let Some(token) = &self.host.gh_token
        {
            push_env(&mut args, &format!("GH_TOKEN={token}"));
        }

        for env in &cfg.env {
            push_env(&mut args, env);
        }

        // Project mount at its real host path, so in-container paths match
        // host paths for session and tooling continuity.
        let mut project_mount = format!("{project_str}:{project_str}");
        if cfg.readonly_project {
            project_mount.push_str(":ro");
            if cfg.scratch {
                // Anonymous volume, removed with the container.
                push_volume(&mut args, "/output");
            } else {
                push_volume(&mut args, &format!("{OUTPUT_VOLUME}:/output"));
            }
        }
        push_volume(&mut args, &project_mount);

        if !cfg.scratch {
            for (volume, target) in PERSISTENT_VOLUMES {
                push_volume(&mut args, &format!("{volume}:{target}"));
            }
        }

        // Host files staged for the entrypoint. Runtimes without file-mount
        // support get copies in a fresh temp directory mounted once at the
        // end instead of one mount per file.
        let mut staged: Vec<(PathBuf, &'static str)> = Vec::new();

        if cfg.claude_config {
            let config_dir = self.host.home.join(".claude");
            if stat(&config_dir)?.is_some() {
                push_volume(
                    &mut args,
                    &format!("{}:/host-claude/.claude:ro", config_dir.display()),
                );
            }
            let config_file = self.host.home.join(".claude.json");
            if stat(&config_file)?.is_some() {
                self.mount_file(
                    &mut args,
                    &mut staged,
                    config_file,
                    "/host-claude/.claude.json",
                    "claude/.claude.json",
                );
            }
            if let Some(credentials) = &self.host.keychain_credentials
                && let Some(path) = self.write_credentials_file(credentials)
            {
                self.mount_file(
                    &mut args,
                    &mut staged,
                    path,
                    "/host-claude/.credentials.json",
                    "claude/.credentials.json",
                );
            }
        }

        if cfg.git_config {
            let git_config = self.host.home.join(".gitconfig");
            if stat(&git_config)?.is_some() {
                self.mount_file(
                    &mut args,
                    &mut staged,
                    git_config,
                    "/host-git/.gitconfig",
                    "git/.gitconfig",
                );
            }
        }

        if cfg.copy_agent_instructions {
            let files: [(PathBuf, &str, &str); 3] = [
                (
                    self.host.home.join(".claude/CLAUDE.md"),
                    "/host-agent-instructions/claude/CLAUDE.md",
                    "agent-instructions/claude/CLAUDE.md",
                ),
                (
                    self.host.home.join(".gemini/GEMINI.md"),
                    "/host-agent-instructions/gemini/GEMINI.md",
                    "agent-instructions/gemini/GEMINI.md",
                ),
                (
                    self.host.home.join(".codex/AGENTS.md"),
                    "/host-agent-instructions/codex/AGENTS.md",
                    "agent-instructions/codex/AGENTS.md",
                ),
            ];
            for (path, target, staging) in files {
                if stat(&path)?.is_some() {
                    self.mount_file(&mut args, &mut staged, path, target, staging);
                }
            }
            // Already a directory, so it mounts the same way everywhere.
            let copilot_agents = self.host.home.join(".copilot/agents");
            if stat(&copilot_agents)?.is_some_and(|m| m.is_dir()) {
                push_volume(
                    &mut args,
                    &format!(
                        "{}:/host-agent-instructions/copilot/agents:ro",
                        copilot_agents.display()
                    ),
                );
            }
        }

        if !staged.is_empty() {
            let staging_dir = stage_files(&staged)?;
            push_volume(&mut args, &format!("{}:/host-files:ro", staging_dir.display()));
            push_env(&mut args, "CORDON_HOST_FILES=/host-files");
        }

        for mount in &cfg.mounts {
            let resolved = resolver.resolve_mount(mount, &project)?;
            push_volume(&mut args, &resolved);
        }

        if cfg.ssh_agent {
            if self.capabilities.supports_native_ssh_forward {
                args.push("--ssh".into());
            } else {
                match self.host.env("SSH_AUTH_SOCK") {
                    Some(sock) => {
                        push_volume(&mut args, &format!("{sock}:/ssh-agent"));
                        push_env(&mut args, "SSH_AUTH_SOCK=/ssh-agent");
                    }
                    None => warn!("SSH_AUTH_SOCK not set; skipping ssh-agent forwarding"),
                }
            }
        }

        if cfg.no_network {
            args.push("--network".into());
            args.push("none".into());
        } else if !cfg.network.is_empty() {
            args.push("--network".into());
            args.push(cfg.network.clone());
        }

        args.push(cfg.image.clone());
        args.extend(command.iter().cloned());
        Ok(Invocation(args))
    }

    /// Emit a single-file mount, or record it for the staging directory
    /// when the runtime cannot mount files.
    fn mount_file(
        &self,
        args: &mut Vec<String>,
        staged: &mut Vec<(PathBuf, &'static str)>,
        source: PathBuf,
        target: &str,
        staging_name: &'static str,
    ) {
        if self.capabilities.supports_file_mounts {
            push_volume(args, &format!("{}:{target}:ro", source.display()));
        } else {
            staged.push((source, staging_name));
        }
    }

    /// Persist keychain credentials where the runtime can mount them.
    fn write_credentials_file(&self, credentials: &str) -> Option<PathBuf> {
        let dir = self.host.home.join(".cordon/tmp");
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("cannot create {}: {e}; skipping credential forwarding", dir.display());
            return None;
        }
        let path = dir.join("claude-credentials.json");
        if let Err(e) = fs::write(&path, credentials) {
            warn!("cannot write {}: {e}; skipping credential forwarding", path.display());
            return None;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&path, fs::Permissions::from_mode(0o600));
        }
        Some(path)
    }
}

/// Copy staged files into a fresh, uniquely named temp directory.
///
/// The directory is intentionally kept: the runtime mounts it after this
/// process has handed off the invocation. Files that cannot be read are
/// skipped, matching the degrade-to-omit rule for credential forwarding.
fn stage_files(staged: &[(PathBuf, &'static str)]) -> Result<PathBuf> {
    let dir = tempfile::Builder::new()
        .prefix("cordon-host-files-")
        .tempdir()?
        .keep();

    for (source, name) in staged {
        let target = dir.join(name);
        if let Some(parent) = target.parent()
            && fs::create_dir_all(parent).is_err()
        {
            continue;
        }
        if let Err(e) = fs::copy(source, &target) {
            warn!("cannot stage {}: {e}; skipping", source.display());
        }
    }

    Ok(dir)
}

fn push_env(args: &mut Vec<String>, entry: &str) {
    args.push("-e".into());
    args.push(entry.into());
}

fn push_volume(args: &mut Vec<String>, spec: &str) {
    args.push("-v".into());
    args.push(spec.into());
}

/// Absolute, lexically normalized form of the project directory.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(lexical_clean(path))
    } else {
        Ok(lexical_clean(&std::env::current_dir()?.join(path)))
    }
}

/// `stat` that distinguishes "absent" from real errors: absence skips the
/// mount, anything else aborts the build.
fn stat(path: &Path) -> Result<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn host() -> Host {
        Host::with_env("/home/tester", HashMap::new(), false)
    }

    fn build(cfg: &Config, host: &Host, command: &[&str], interactive: bool) -> Vec<String> {
        let command: Vec<String> = command.iter().map(|s| s.to_string()).collect();
        InvocationBuilder::new(cfg, host, RuntimeCapabilities::default())
            .build(Path::new("/test/project"), &command, interactive)
            .unwrap()
            .into_args()
    }

    fn joined(args: &[String]) -> String {
        args.join(" ")
    }

    #[test]
    fn default_run_has_both_volumes_and_no_network_flag() {
        let cfg = Config {
            image: "test-image".into(),
            env: vec!["FOO=bar".into()],
            ..Config::default()
        };
        let host = host();
        let args = build(&cfg, &host, &["bash"], true);
        let s = joined(&args);

        assert!(s.contains("-it"));
        assert!(s.contains("-w /test/project"));
        assert!(s.contains("CORDON=1"));
        assert!(s.contains("CORDON_PROJECT_PATH=/test/project"));
        assert!(s.contains("FOO=bar"));
        assert!(s.contains("cordon-home:/home/agent"));
        assert!(s.contains("cordon-cache:/var/cache"));
        assert!(!s.contains("--network"));

        // Image immediately before the command tokens.
        let image_pos = args.iter().position(|a| a == "test-image").unwrap();
        assert_eq!(args[image_pos + 1], "bash");
        assert_eq!(image_pos + 2, args.len());
    }

    #[test]
    fn non_interactive_run_omits_it() {
        let cfg = Config {
            image: "test-image".into(),
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["echo", "hello"], false);
        assert!(!args.contains(&"-it".to_string()));
    }

    #[test]
    fn tty_stdio_makes_the_run_interactive() {
        let cfg = Config {
            image: "test-image".into(),
            ..Config::default()
        };
        let host = Host::with_env("/home/tester", HashMap::new(), true);
        let args = build(&cfg, &host, &["cat"], false);
        assert!(args.contains(&"-it".to_string()));
    }

    #[test]
    fn no_network_emits_network_none() {
        let cfg = Config {
            image: "test-image".into(),
            no_network: true,
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["bash"], false);
        assert!(joined(&args).contains("--network none"));
    }

    #[test]
    fn named_network_is_joined() {
        let cfg = Config {
            image: "test-image".into(),
            network: "dev_network".into(),
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["echo"], false);
        assert!(joined(&args).contains("--network dev_network"));
    }

    #[test]
    fn scratch_drops_persistent_volumes_but_keeps_the_project_mount() {
        let cfg = Config {
            image: "test-image".into(),
            scratch: true,
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["bash"], false);
        let s = joined(&args);

        assert!(!s.contains("cordon-home:/home/agent"));
        assert!(!s.contains("cordon-cache:/var/cache"));
        assert!(s.contains("/test/project:/test/project"));
        assert!(!s.contains("/output"));
    }

    #[test]
    fn readonly_project_mounts_ro_and_adds_output_volume() {
        let cfg = Config {
            image: "test-image".into(),
            readonly_project: true,
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["bash"], false);
        let s = joined(&args);

        assert!(s.contains("/test/project:/test/project:ro"));
        assert!(s.contains("cordon-output:/output"));
    }

    #[test]
    fn readonly_scratch_uses_an_anonymous_output_volume() {
        let cfg = Config {
            image: "test-image".into(),
            readonly_project: true,
            scratch: true,
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["bash"], false);
        let s = joined(&args);

        assert!(!s.contains("cordon-output:/output"));
        assert!(s.contains("-v /output"));
    }

    #[test]
    fn no_yolo_sets_the_marker_env() {
        let cfg = Config {
            image: "test-image".into(),
            no_yolo: true,
            ..Config::default()
        };
        let args = build(&cfg, &host(), &["bash"], false);
        assert!(joined(&args).contains("NO_YOLO=1"));
    }

    #[test]
    fn allow_listed_env_vars_forward_in_list_order() {
        let mut env = HashMap::new();
        env.insert("OPENAI_API_KEY".to_string(), "sk-2".to_string());
        env.insert("ANTHROPIC_API_KEY".to_string(), "sk-1".to_string());
        env.insert("HOME".to_string(), "/home/tester".to_string());
        env.insert("GEMINI_API_KEY".to_string(), String::new());
        let host = Host::with_env("/home/tester", env, false);

        let cfg = Config {
            image: "test-image".into(),
            ..Config::default()
        };
        let args = build(&cfg, &host, &["bash"], false);
        let s = joined(&args);

        assert!(s.contains("ANTHROPIC_API_KEY=sk-1"));
        assert!(s.contains("OPENAI_API_KEY=sk-2"));
        // Fixed order, not map iteration order.
        let a = s.find("ANTHROPIC_API_KEY=sk-1").unwrap();
        let o = s.find("OPENAI_API_KEY=sk-2").unwrap();
        assert!(a < o);
        // Unset and empty vars are not forwarded; HOME is not on the list.
        assert!(!s.contains("GEMINI_API_KEY"));
        assert!(!s.contains("HOME=/home/tester"));
    }

    #[test]
    fn term_and_lang_are_forwarded_when_set() {
        let mut env = HashMap::new();
        env.insert("TERM".to_string(), "xterm-256color".to_string());
        env.insert("LANG".to_string(), "en_US.UTF-8".to_string());
        let host = Host::with_env("/home/tester", env, false);

        let cfg = Config {
            image: "test-image".into(),
            ..Config::default()
        };
        let s = joined(&build(&cfg, &host, &["bash"], false));
        assert!(s.contains("TERM=xterm-256color"));
        assert!(s.contains("LANG=en_US.UTF-8"));
    }

    #[test]
    fn gh_token_is_forwarded_only_when_present() {
        let cfg = Config {
            image: "test-image".into(),
            gh_token: true,
            ..Config::default()
        };

        // Helper unavailable: silently omitted.
        let s = joined(&build(&cfg, &host(), &["bash"], false));
        assert!(!s.contains("GH_TOKEN="));

        let mut host = host();
        host.gh_token = Some("gho_abc".into());
        let s = joined(&build(&cfg, &host, &["bash"], false));
        assert!(s.contains("GH_TOKEN=gho_abc"));
    }

    #[test]
    fn extra_mounts_are_resolved_against_the_project() {
        let cfg = Config {
            image: "test-image".into(),
            mounts: vec!["./src:/app/src".into(), "my-volume:/data".into()],
            ..Config::default()
        };
        let s = joined(&build(&cfg, &host(), &["bash"], false));
        assert!(s.contains("-v /test/project/src:/app/src"));
        assert!(s.contains("-v my-volume:/data"));
    }

    #[test]
    fn invalid_extra_mount_aborts_the_build() {
        let cfg = Config {
            image: "test-image".into(),
            mounts: vec!["no-colon".into()],
            ..Config::default()
        };
        let host = host();
        let result = InvocationBuilder::new(&cfg, &host, RuntimeCapabilities::default()).build(
            Path::new("/test/project"),
            &["bash".to_string()],
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn ssh_agent_socket_is_mounted_when_available() {
        let mut env = HashMap::new();
        env.insert("SSH_AUTH_SOCK".to_string(), "/run/agent.sock".to_string());
        let host = Host::with_env("/home/tester", env, false);

        let cfg = Config {
            image: "test-image".into(),
            ssh_agent: true,
            ..Config::default()
        };
        let s = joined(&build(&cfg, &host, &["bash"], false));
        assert!(s.contains("-v /run/agent.sock:/ssh-agent"));
        assert!(s.contains("SSH_AUTH_SOCK=/ssh-agent"));
    }

    #[test]
    fn ssh_agent_without_a_socket_is_skipped() {
        let cfg = Config {
            image: "test-image".into(),
            ssh_agent: true,
            ..Config::default()
        };
        let s = joined(&build(&cfg, &host(), &["bash"], false));
        assert!(!s.contains("/ssh-agent"));
    }

    #[test]
    fn native_ssh_forwarding_uses_the_runtime_flag() {
        let cfg = Config {
            image: "test-image".into(),
            ssh_agent: true,
            ..Config::default()
        };
        let host = host();
        let caps = RuntimeCapabilities {
            supports_file_mounts: false,
            supports_native_ssh_forward: true,
            fixed_memory_budget: false,
        };
        let args = InvocationBuilder::new(&cfg, &host, caps)
            .build(Path::new("/test/project"), &["bash".to_string()], false)
            .unwrap()
            .into_args();
        let s = joined(&args);
        assert!(s.contains("--ssh"));
        assert!(!s.contains("/ssh-agent"));
    }

    #[test]
    fn file_mounts_go_direct_when_the_runtime_supports_them() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".gitconfig"), "[user]\n\tname = t\n").unwrap();
        let host = Host::with_env(home.path(), HashMap::new(), false);

        let cfg = Config {
            image: "test-image".into(),
            git_config: true,
            ..Config::default()
        };
        let args = InvocationBuilder::new(&cfg, &host, RuntimeCapabilities::default())
            .build(Path::new("/test/project"), &["bash".to_string()], false)
            .unwrap()
            .into_args();
        let s = joined(&args);

        assert!(s.contains(&format!(
            "{}:/host-git/.gitconfig:ro",
            home.path().join(".gitconfig").display()
        )));
        assert!(!s.contains("CORDON_HOST_FILES"));
    }

    #[test]
    fn file_mounts_are_staged_when_the_runtime_cannot_mount_files() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".gitconfig"), "[user]\n\tname = t\n").unwrap();
        std::fs::write(home.path().join(".claude.json"), "{}").unwrap();
        let host = Host::with_env(home.path(), HashMap::new(), false);

        let cfg = Config {
            image: "test-image".into(),
            git_config: true,
            claude_config: true,
            ..Config::default()
        };
        let caps = RuntimeCapabilities {
            supports_file_mounts: false,
            supports_native_ssh_forward: true,
            fixed_memory_budget: false,
        };
        let args = InvocationBuilder::new(&cfg, &host, caps)
            .build(Path::new("/test/project"), &["bash".to_string()], false)
            .unwrap()
            .into_args();
        let s = joined(&args);

        assert!(s.contains("CORDON_HOST_FILES=/host-files"));
        assert!(!s.contains("/host-git/.gitconfig"));

        // The staging mount holds real copies of the collected files.
        let staging = args
            .iter()
            .find(|a| a.ends_with(":/host-files:ro"))
            .unwrap()
            .trim_end_matches(":/host-files:ro")
            .to_string();
        let staged_git = Path::new(&staging).join("git/.gitconfig");
        assert_eq!(
            std::fs::read_to_string(staged_git).unwrap(),
            "[user]\n\tname = t\n"
        );
        let staged_claude = Path::new(&staging).join("claude/.claude.json");
        assert_eq!(std::fs::read_to_string(staged_claude).unwrap(), "{}");

        std::fs::remove_dir_all(staging).unwrap();
    }

    #[test]
    fn claude_config_dir_mounts_directly_under_both_strategies() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join(".claude")).unwrap();
        let host = Host::with_env(home.path(), HashMap::new(), false);

        let cfg = Config {
            image: "test-image".into(),
            claude_config: true,
            ..Config::default()
        };
        for caps in [
            RuntimeCapabilities::default(),
            RuntimeCapabilities {
                supports_file_mounts: false,
                supports_native_ssh_forward: true,
                fixed_memory_budget: false,
            },
        ] {
            let args = InvocationBuilder::new(&cfg, &host, caps)
                .build(Path::new("/test/project"), &["bash".to_string()], false)
                .unwrap()
                .into_args();
            assert!(joined(&args).contains(&format!(
                "{}:/host-claude/.claude:ro",
                home.path().join(".claude").display()
            )));
        }
    }

    #[test]
    fn keychain_credentials_are_written_and_mounted() {
        let home = tempfile::tempdir().unwrap();
        let mut host = Host::with_env(home.path(), HashMap::new(), false);
        host.keychain_credentials = Some("{\"token\":\"x\"}".into());

        let cfg = Config {
            image: "test-image".into(),
            claude_config: true,
            ..Config::default()
        };
        let args = InvocationBuilder::new(&cfg, &host, RuntimeCapabilities::default())
            .build(Path::new("/test/project"), &["bash".to_string()], false)
            .unwrap()
            .into_args();
        let s = joined(&args);

        let creds = home.path().join(".cordon/tmp/claude-credentials.json");
        assert!(s.contains(&format!("{}:/host-claude/.credentials.json:ro", creds.display())));
        assert_eq!(std::fs::read_to_string(creds).unwrap(), "{\"token\":\"x\"}");
    }

    #[test]
    fn custom_forward_list_replaces_the_default() {
        let mut env = HashMap::new();
        env.insert("ANTHROPIC_API_KEY".to_string(), "sk-1".to_string());
        env.insert("MY_TOKEN".to_string(), "t".to_string());
        let host = Host::with_env("/home/tester", env, false);

        let cfg = Config {
            image: "test-image".into(),
            ..Config::default()
        };
        let args = InvocationBuilder::new(&cfg, &host, RuntimeCapabilities::default())
            .forward_env(vec!["MY_TOKEN".into()])
            .build(Path::new("/test/project"), &["bash".to_string()], false)
            .unwrap()
            .into_args();
        let s = joined(&args);
        assert!(s.contains("MY_TOKEN=t"));
        assert!(!s.contains("ANTHROPIC_API_KEY"));
    }
}
