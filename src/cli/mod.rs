//! Command-line surface.
//!
//! Launch flags are declared once in [`LaunchFlags`] and flattened both at
//! the top level (bare `cordon [flags]` starts a shell) and into `run`; the
//! same declaration drives [`split_tool_args`], so adding a flag is a single
//! edit. Tool shortcuts (`cordon claude --resume`) arrive as external
//! subcommands and are split into cordon flags and tool arguments before
//! parsing.

pub mod config;
pub mod reset;
pub mod run;
pub mod setup;

use std::collections::HashSet;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};

use crate::config::{Config, apply_overrides};

/// Tools that become direct subcommands (e.g. `cordon claude`).
pub const TOOL_SHORTCUTS: [&str; 5] = ["claude", "codex", "gemini", "opencode", "copilot"];

#[derive(Parser)]
#[command(name = "cordon")]
#[command(author, version, about = "Full-power AI agents, host-safe by default")]
#[command(after_help = concat!(
    "Running `cordon` with no subcommand starts an interactive shell in the sandbox.\n",
    "Tool shortcuts: claude, codex, gemini, opencode, copilot.",
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub flags: LaunchFlags,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command in the sandbox
    Run(RunArgs),

    /// Print the resolved configuration
    Config,

    /// Configure cordon interactively
    Setup,

    /// Remove the persistent named volumes (fresh start)
    Reset(reset::ResetArgs),

    /// Tool shortcut: run a known tool in the sandbox
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub flags: LaunchFlags,

    /// Command to run inside the sandbox
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Per-invocation overrides, mirroring the config file fields 1:1.
#[derive(Args, Debug, Default)]
pub struct LaunchFlags {
    /// Container runtime: docker, podman, or container
    #[arg(long, value_name = "NAME")]
    pub runtime: Option<String>,

    /// Base image to use
    #[arg(long, value_name = "IMAGE")]
    pub image: Option<String>,

    /// Shell for interactive sessions (bash, zsh, fish)
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<String>,

    /// Join a container network (e.g. a docker compose network)
    #[arg(long, value_name = "NAME")]
    pub network: Option<String>,

    /// Extra mount src:dst[:opts] (repeatable)
    #[arg(long = "mount", value_name = "SPEC")]
    pub mounts: Vec<String>,

    /// Set an environment variable (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Forward the SSH agent socket
    #[arg(long)]
    pub ssh_agent: bool,

    /// Mount the project directory read-only
    #[arg(long)]
    pub readonly_project: bool,

    /// Disable network access
    #[arg(long)]
    pub no_network: bool,

    /// Disable AI CLIs' auto-confirm mode
    #[arg(long)]
    pub no_yolo: bool,

    /// Fresh environment, no persistent volumes
    #[arg(long)]
    pub scratch: bool,

    /// Copy host Claude config to the container
    #[arg(long)]
    pub claude_config: bool,

    /// Copy host git config to the container
    #[arg(long)]
    pub git_config: bool,

    /// Forward the GitHub CLI token (from gh auth token)
    #[arg(long)]
    pub gh_token: bool,

    /// Copy global agent instruction files (CLAUDE.md, GEMINI.md, AGENTS.md)
    #[arg(long)]
    pub copy_agent_instructions: bool,

    /// Run interactive setup before starting
    #[arg(long)]
    pub setup: bool,
}

impl LaunchFlags {
    /// The CLI layer as a config overlay.
    pub fn into_overrides(self) -> Config {
        Config {
            runtime: self.runtime.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            shell: self.shell.unwrap_or_default(),
            network: self.network.unwrap_or_default(),
            mounts: self.mounts,
            env: self.env,
            ssh_agent: self.ssh_agent,
            readonly_project: self.readonly_project,
            no_network: self.no_network,
            no_yolo: self.no_yolo,
            scratch: self.scratch,
            claude_config: self.claude_config,
            git_config: self.git_config,
            gh_token: self.gh_token,
            copy_agent_instructions: self.copy_agent_instructions,
            setup: self.setup,
        }
    }
}

/// Dispatch a parsed command line; returns the exit code to report.
pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let overrides = cli.flags.into_overrides();

    match cli.command {
        None => run::launch(overrides, None, true),
        Some(Commands::Run(args)) => {
            let overrides = stack_overrides(overrides, args.flags.into_overrides());
            run::launch(overrides, Some(args.command), false)
        }
        Some(Commands::Config) => {
            config::show(overrides)?;
            Ok(0)
        }
        Some(Commands::Setup) => {
            setup::run()?;
            Ok(0)
        }
        Some(Commands::Reset(args)) => {
            reset::run(args, overrides)?;
            Ok(0)
        }
        Some(Commands::External(raw)) => launch_tool(overrides, raw),
    }
}

/// Handle a tool shortcut: `cordon claude --no-network --resume abc` runs
/// claude with `--resume abc`, keeping `--no-network` for ourselves.
fn launch_tool(top: Config, raw: Vec<String>) -> anyhow::Result<i32> {
    let Some((name, rest)) = raw.split_first() else {
        bail!("missing command");
    };
    if !TOOL_SHORTCUTS.contains(&name.as_str()) {
        bail!(
            "unknown command: {name} (try 'cordon help')\n  \
             Hint: flags go after the subcommand: cordon run --flag cmd"
        );
    }

    let (ours, tool_args) = split_tool_args(rest);
    let parsed = FlagsOnly::try_parse_from(std::iter::once("cordon".to_string()).chain(ours))?;
    let overrides = stack_overrides(top, parsed.flags.into_overrides());

    let mut command = vec![name.clone()];
    command.extend(tool_args);
    run::launch(overrides, Some(command), false)
}

/// Hidden parser for re-parsing the cordon half of a tool shortcut line.
#[derive(Parser)]
struct FlagsOnly {
    #[command(flatten)]
    flags: LaunchFlags,
}

/// Combine two CLI override layers (top-level flags, then subcommand flags).
fn stack_overrides(mut base: Config, extra: Config) -> Config {
    apply_overrides(&mut base, extra);
    base
}

/// Separate cordon flags from tool flags for shortcuts, so that
/// `cordon claude --resume` passes `--resume` through instead of failing on
/// an unknown cordon flag. Flag names and arities come from [`LaunchFlags`]
/// itself.
pub fn split_tool_args(args: &[String]) -> (Vec<String>, Vec<String>) {
    let (known, with_values) = known_flags();

    let mut ours = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if arg == "--" {
            // Everything after -- goes to the tool.
            return (ours, args[i + 1..].to_vec());
        }
        if !arg.starts_with('-') {
            // Non-flag argument: this and the rest go to the tool.
            return (ours, args[i..].to_vec());
        }

        let name = arg.trim_start_matches('-');
        let (name, has_value) = match name.split_once('=') {
            Some((name, _)) => (name, true),
            None => (name, false),
        };

        if !known.contains(name) {
            return (ours, args[i..].to_vec());
        }

        ours.push(arg.clone());
        i += 1;

        if with_values.contains(name) && !has_value && i < args.len() && !args[i].starts_with('-')
        {
            ours.push(args[i].clone());
            i += 1;
        }
    }

    (ours, Vec::new())
}

/// Flag names (and which of them take values) derived from the clap
/// declaration, so this never drifts from the real flag set.
fn known_flags() -> (HashSet<String>, HashSet<String>) {
    let cmd = LaunchFlags::augment_args(clap::Command::new("cordon"));

    let mut known = HashSet::new();
    let mut with_values = HashSet::new();
    for arg in cmd.get_arguments() {
        if let Some(long) = arg.get_long() {
            known.insert(long.to_string());
            if arg.get_action().takes_values() {
                with_values.insert(long.to_string());
            }
        }
    }
    known.insert("help".to_string());
    known.insert("h".to_string());
    (known, with_values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn run_parses_flags_then_command() {
        let cli = Cli::try_parse_from(["cordon", "run", "--scratch", "echo", "hello"]).unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.flags.scratch);
                assert_eq!(args.command, strings(&["echo", "hello"]));
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn run_requires_a_command() {
        assert!(Cli::try_parse_from(["cordon", "run", "--scratch"]).is_err());
    }

    #[test]
    fn bare_invocation_takes_top_level_flags() {
        let cli = Cli::try_parse_from(["cordon", "--no-network"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.flags.no_network);
    }

    #[test]
    fn repeatable_flags_accumulate() {
        let cli = Cli::try_parse_from([
            "cordon", "run", "--env", "A=1", "--env", "B=2", "--mount", "./x:/x", "true",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.flags.env, strings(&["A=1", "B=2"]));
                assert_eq!(args.flags.mounts, strings(&["./x:/x"]));
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn tool_shortcuts_arrive_as_external_subcommands() {
        let cli = Cli::try_parse_from(["cordon", "claude", "--resume"]).unwrap();
        match cli.command {
            Some(Commands::External(raw)) => {
                assert_eq!(raw, strings(&["claude", "--resume"]));
            }
            _ => panic!("expected external subcommand"),
        }
    }

    #[test]
    fn flags_map_onto_the_config_overlay() {
        let flags = LaunchFlags {
            image: Some("img".into()),
            no_network: true,
            env: strings(&["A=1"]),
            ..LaunchFlags::default()
        };
        let overlay = flags.into_overrides();
        assert_eq!(overlay.image, "img");
        assert!(overlay.no_network);
        assert_eq!(overlay.env, strings(&["A=1"]));
        assert_eq!(overlay.runtime, "");
    }

    #[test]
    fn split_tool_args_table() {
        struct Case {
            name: &'static str,
            args: &'static [&'static str],
            want_ours: &'static [&'static str],
            want_tool: &'static [&'static str],
        }
        let cases = [
            Case {
                name: "tool flag only",
                args: &["--resume"],
                want_ours: &[],
                want_tool: &["--resume"],
            },
            Case {
                name: "tool flag with value",
                args: &["--resume", "abc123"],
                want_ours: &[],
                want_tool: &["--resume", "abc123"],
            },
            Case {
                name: "cordon flag then tool flag",
                args: &["--no-network", "--resume"],
                want_ours: &["--no-network"],
                want_tool: &["--resume"],
            },
            Case {
                name: "cordon flag with value then tool flag",
                args: &["--env", "FOO=bar", "--resume"],
                want_ours: &["--env", "FOO=bar"],
                want_tool: &["--resume"],
            },
            Case {
                name: "cordon flag with equals then tool flag",
                args: &["--env=FOO=bar", "--resume"],
                want_ours: &["--env=FOO=bar"],
                want_tool: &["--resume"],
            },
            Case {
                name: "multiple cordon flags then tool args",
                args: &["--no-network", "--scratch", "--resume", "abc123"],
                want_ours: &["--no-network", "--scratch"],
                want_tool: &["--resume", "abc123"],
            },
            Case {
                name: "explicit separator",
                args: &["--no-network", "--", "--help"],
                want_ours: &["--no-network"],
                want_tool: &["--help"],
            },
            Case {
                name: "non-flag arg",
                args: &["somefile.txt"],
                want_ours: &[],
                want_tool: &["somefile.txt"],
            },
            Case {
                name: "cordon flag then non-flag arg",
                args: &["--scratch", "somefile.txt"],
                want_ours: &["--scratch"],
                want_tool: &["somefile.txt"],
            },
            Case {
                name: "no args",
                args: &[],
                want_ours: &[],
                want_tool: &[],
            },
            Case {
                name: "only cordon flags",
                args: &["--scratch", "--no-network"],
                want_ours: &["--scratch", "--no-network"],
                want_tool: &[],
            },
        ];

        for case in cases {
            let args = strings(case.args);
            let (ours, tool) = split_tool_args(&args);
            assert_eq!(ours, strings(case.want_ours), "{}: cordon args", case.name);
            assert_eq!(tool, strings(case.want_tool), "{}: tool args", case.name);
        }
    }

    #[test]
    fn tool_shortcuts_cover_the_known_tools() {
        for tool in ["claude", "codex", "gemini", "opencode", "copilot"] {
            assert!(TOOL_SHORTCUTS.contains(&tool));
        }
        for cmd in ["run", "help", "version", "setup", "foo"] {
            assert!(!TOOL_SHORTCUTS.contains(&cmd));
        }
    }

    #[test]
    fn known_flags_track_the_declaration() {
        let (known, with_values) = known_flags();
        assert!(known.contains("no-network"));
        assert!(known.contains("mount"));
        assert!(with_values.contains("mount"));
        assert!(with_values.contains("env"));
        assert!(!with_values.contains("no-network"));
    }
}
