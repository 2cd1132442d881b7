use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, bail};
use tarpack::{ExtractOptions, PermissionStrategy};

#[derive(Clone, Debug, clap::Args)]
pub struct ExtractArg {
    pub archive: PathBuf,
    /// Directory to extract into, created if missing
    pub destination: PathBuf,
    /// Only extract this entry, or entries matching it with --regex
    pub name: Option<String>,
    #[arg(short, long, requires = "name")]
    pub regex: bool,
    /// Apply the archived mode bits to extracted files and directories
    #[arg(short, long)]
    pub preserve_permissions: bool,
    /// Drop this many leading path components from entry names
    #[arg(long, default_value_t = 0)]
    pub strip_components: usize,
    /// Run this command inside DESTINATION, then delete DESTINATION
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl ExtractArg {
    pub fn run(self) -> anyhow::Result<()> {
        let selector = super::selector(self.name.as_deref(), self.regex)?;
        let permissions = if self.preserve_permissions {
            PermissionStrategy::Preserve
        } else {
            PermissionStrategy::Ignore
        };
        let options = ExtractOptions::default()
            .permission_strategy(permissions)
            .strip_components(self.strip_components);

        let Some((program, args)) = self.command.split_first() else {
            let destination = tarpack::extract_from_archive_with_options(
                &self.archive,
                &self.destination,
                selector,
                &options,
            )
            .with_context(|| format!("cannot extract {}", self.archive.display()))?;
            println!("{}", destination.display());
            return Ok(());
        };

        let status = tarpack::extract_transient_with_options(
            &self.archive,
            &self.destination,
            selector,
            &options,
            || {
                Command::new(program)
                    .args(args)
                    .current_dir(&self.destination)
                    .status()
            },
        )
        .with_context(|| format!("cannot extract {}", self.archive.display()))?;

        match status {
            None => {
                tracing::warn!("nothing was extracted, {program} not run");
                Ok(())
            }
            Some(status) => {
                let status = status.with_context(|| format!("cannot run {program}"))?;
                if !status.success() {
                    bail!("{program} exited with {status}");
                }
                Ok(())
            }
        }
    }
}
