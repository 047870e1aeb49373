//! Output management and formatting.
//!
//! [`OutputManager`] is the terminal side of the `ProgressReporter` port:
//! every [`ProgressEvent`] the core emits is turned into a few styled lines
//! on stdout. Logs go to stderr through `tracing`, never through here.

use std::io;

use console::Term;
use owo_colors::OwoColorize;
use tracing::debug;

use maker_core::application::{ProgressEvent, ProgressReporter};
use maker_core::domain::{CommandOutput, ProbeStrategyKind, RunWarning, ToolingReport};

use crate::cli::global::GlobalArgs;
use crate::config::AppConfig;

/// How a line is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Header,
    Success,
    Warning,
    Error,
    Info,
    /// Secondary detail, e.g. a command's own output.
    Dim,
}

/// Manages CLI output based on configuration.
#[derive(Clone)]
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    runtime: String,
    package_manager: String,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            runtime: config.toolchain.runtime.clone(),
            package_manager: config.toolchain.package_manager.clone(),
            term: Term::stdout(),
        }
    }

    // ── Writing ───────────────────────────────────────────────────────────

    /// Quiet mode hides everything except errors.
    pub fn is_visible(&self, tone: Tone) -> bool {
        !self.quiet || tone == Tone::Error
    }

    fn write(&self, tone: Tone, msg: &str) -> io::Result<()> {
        if !self.is_visible(tone) {
            return Ok(());
        }
        self.term.write_line(&self.style(tone, msg))
    }

    /// Apply the tone's icon and colour.
    pub fn style(&self, tone: Tone, msg: &str) -> String {
        let icon = match tone {
            Tone::Success => Some("\u{2713}"),
            Tone::Error => Some("\u{2717}"),
            Tone::Warning => Some("\u{26a0}"),
            Tone::Info => Some("\u{2139}"),
            Tone::Plain | Tone::Header | Tone::Dim => None,
        };

        if self.no_color {
            return match icon {
                Some(icon) => format!("{icon} {msg}"),
                None => msg.to_owned(),
            };
        }

        match tone {
            Tone::Plain => msg.to_owned(),
            Tone::Header => msg.cyan().bold().to_string(),
            Tone::Dim => msg.dimmed().to_string(),
            Tone::Success => format!("{} {}", "\u{2713}".green().bold(), msg.green()),
            Tone::Error => format!("{} {}", "\u{2717}".red().bold(), msg.red()),
            Tone::Warning => format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow()),
            Tone::Info => format!("{} {}", "\u{2139}".blue().bold(), msg.blue()),
        }
    }

    // ── Event rendering ───────────────────────────────────────────────────

    /// The lines printed for one progress event.
    pub fn lines(&self, event: &ProgressEvent) -> Vec<(Tone, String)> {
        let pm = &self.package_manager;
        match event {
            ProgressEvent::Creating { name, root } => vec![
                (Tone::Plain, String::new()),
                (
                    Tone::Header,
                    format!("Creating React Three Fiber 3D project: {name}"),
                ),
                (Tone::Plain, format!("Location: {}", root.display())),
                (Tone::Plain, String::new()),
            ],
            ProgressEvent::FileWritten { path } => {
                vec![(Tone::Success, format!("Created {}", path.display()))]
            }
            ProgressEvent::ProbeAttempt { strategy } => match strategy {
                ProbeStrategyKind::KnownLocations => vec![(
                    Tone::Info,
                    format!("Searching for {} in common locations...", self.runtime),
                )],
                ProbeStrategyKind::SecondaryShell => {
                    vec![(Tone::Info, "Trying the secondary shell...".to_owned())]
                }
                ProbeStrategyKind::Direct | ProbeStrategyKind::DependencyCache => Vec::new(),
            },
            ProgressEvent::LocationFound { path } => {
                vec![(Tone::Dim, format!("   Found: {}", path.display()))]
            }
            ProgressEvent::ToolingFound(report) => self.tooling_lines(report),
            ProgressEvent::CommandStarted { command } => {
                vec![(Tone::Dim, format!("$ {command}"))]
            }
            ProgressEvent::CommandFinished { command, output } => command_lines(command, output),
            ProgressEvent::InstallStarted => vec![
                (Tone::Plain, String::new()),
                (
                    Tone::Header,
                    format!("Installing {pm} packages (this may take a few minutes)..."),
                ),
                (Tone::Plain, String::new()),
            ],
            ProgressEvent::RetryingRelaxed { flag } => vec![(
                Tone::Error,
                format!("{pm} install failed. Trying with {flag}..."),
            )],
            ProgressEvent::InstallSkipped => vec![
                (Tone::Plain, String::new()),
                (Tone::Info, format!("Skipped {pm} install")),
            ],
            ProgressEvent::AuditStarted => vec![
                (Tone::Plain, String::new()),
                (Tone::Header, "Checking for vulnerabilities...".to_owned()),
            ],
            ProgressEvent::AuditClean => {
                vec![(Tone::Success, "No vulnerabilities found!".to_owned())]
            }
            ProgressEvent::AuditFixed => {
                vec![(Tone::Success, "Vulnerabilities fixed".to_owned())]
            }
            ProgressEvent::Warning(warning) => warning_lines(warning),
            ProgressEvent::ProjectReady {
                name,
                installed,
                manual_install,
                manual_dev_server,
                useful_commands,
            } => {
                let mut lines = vec![
                    (Tone::Plain, String::new()),
                    (
                        Tone::Success,
                        format!("Project '{name}' created successfully!"),
                    ),
                    (Tone::Plain, String::new()),
                    (Tone::Header, "Next steps:".to_owned()),
                    (Tone::Plain, format!("   cd {name}")),
                ];
                if !installed {
                    lines.push((Tone::Plain, format!("   {manual_install}")));
                }
                lines.push((Tone::Plain, format!("   {manual_dev_server}")));

                if !useful_commands.is_empty() {
                    lines.push((Tone::Plain, String::new()));
                    lines.push((Tone::Header, "Useful commands:".to_owned()));
                    lines.extend(
                        useful_commands
                            .iter()
                            .map(|command| (Tone::Plain, useful_command_line(command))),
                    );
                }
                lines
            }
            ProgressEvent::PreviewCountdown { delay } => vec![
                (Tone::Plain, String::new()),
                (
                    Tone::Info,
                    format!(
                        "Starting development server in {} seconds...",
                        delay.as_secs()
                    ),
                ),
            ],
            ProgressEvent::PreviewStopped { interrupted } => {
                let msg = if *interrupted {
                    "Development server stopped. Happy coding!"
                } else {
                    "Development server exited."
                };
                vec![(Tone::Plain, String::new()), (Tone::Success, msg.to_owned())]
            }
        }
    }

    fn tooling_lines(&self, report: &ToolingReport) -> Vec<(Tone, String)> {
        let (Some(runtime_version), Some(pm_version)) = (
            &report.runtime_version,
            &report.package_manager_version,
        ) else {
            // Assumed tooling; the warning event already said so.
            return Vec::new();
        };

        let runtime = match (&report.strategy, &report.location) {
            (ProbeStrategyKind::KnownLocations, Some(dir)) => format!(
                "Found {} {runtime_version} at {}",
                self.runtime,
                dir.display()
            ),
            (ProbeStrategyKind::SecondaryShell, _) => {
                format!("{} {runtime_version} (via secondary shell)", self.runtime)
            }
            _ => format!("{} {runtime_version}", self.runtime),
        };
        vec![
            (Tone::Success, runtime),
            (
                Tone::Success,
                format!("{} {pm_version}", self.package_manager),
            ),
        ]
    }
}

impl ProgressReporter for OutputManager {
    fn report(&self, event: &ProgressEvent) {
        for (tone, line) in self.lines(event) {
            if let Err(e) = self.write(tone, &line) {
                debug!(error = %e, "failed to write progress line");
                return;
            }
        }
    }
}

/// Captured output is always shown; failures add a status line and label
/// each stream.
fn command_lines(command: &str, output: &CommandOutput) -> Vec<(Tone, String)> {
    let stdout = output.stdout.trim_end();
    let stderr = output.stderr.trim_end();

    if output.success() {
        // npm prints deprecation and peer notices on stderr even on success.
        return [stdout, stderr]
            .into_iter()
            .filter(|stream| !stream.is_empty())
            .map(|stream| (Tone::Dim, stream.to_owned()))
            .collect();
    }

    let status = match output.code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_owned(),
    };
    let mut lines = vec![(Tone::Warning, format!("Command failed ({status}): {command}"))];
    if !stdout.is_empty() {
        lines.push((Tone::Dim, format!("STDOUT: {stdout}")));
    }
    if !stderr.is_empty() {
        lines.push((Tone::Dim, format!("STDERR: {stderr}")));
    }
    lines
}

fn warning_lines(warning: &RunWarning) -> Vec<(Tone, String)> {
    match warning {
        RunWarning::AutoFixFailed { manual_command } => vec![
            (
                Tone::Warning,
                "Some vulnerabilities couldn't be auto-fixed.".to_owned(),
            ),
            (
                Tone::Plain,
                "   This is normal for development dependencies.".to_owned(),
            ),
            (
                Tone::Plain,
                format!("   Run '{manual_command}' later to review if needed."),
            ),
        ],
        RunWarning::PreviewLaunchFailed {
            reason,
            manual_command,
        } => vec![
            (Tone::Plain, String::new()),
            (
                Tone::Warning,
                format!("Failed to start dev server ({reason}). You can start it manually:"),
            ),
            (Tone::Plain, format!("   {manual_command}")),
        ],
        other => vec![(Tone::Warning, other.to_string())],
    }
}

/// `   npm run dev      # Start development server`
fn useful_command_line(command: &str) -> String {
    let script = command.rsplit(' ').next().unwrap_or(command);
    match script_description(script) {
        Some(desc) => format!("   {command:<16} # {desc}"),
        None => format!("   {command}"),
    }
}

fn script_description(script: &str) -> Option<&'static str> {
    match script {
        "dev" => Some("Start development server"),
        "build" => Some("Build for production"),
        "preview" => Some("Preview production build"),
        "lint" => Some("Run linter"),
        "clean" => Some("Clean project"),
        _ => None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
