use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;

#[derive(Clone, Debug, clap::Args)]
pub struct ReadArg {
    pub archive: PathBuf,
    /// Entry name, or a regular expression with --regex
    pub name: String,
    /// Treat NAME as a regular expression and print every match in order
    #[arg(short, long)]
    pub regex: bool,
}

impl ReadArg {
    pub fn run(self) -> anyhow::Result<()> {
        let selector = super::selector(Some(&self.name), self.regex)?;
        let mut stdout = io::stdout().lock();

        tarpack::read_from_archive_with(&self.archive, selector, |entry| {
            io::copy(entry, &mut stdout)?;
            Ok(())
        })
        .with_context(|| format!("cannot read {}", self.archive.display()))?;

        stdout.flush()?;
        Ok(())
    }
}
