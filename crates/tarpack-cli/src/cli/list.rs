use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use tarpack::{EntryInfo, EntryKind};

#[derive(Clone, Debug, clap::Args)]
pub struct ListArg {
    pub archive: PathBuf,
    /// Show kind, mode and size alongside each name
    #[arg(short, long)]
    pub long: bool,
}

impl ListArg {
    pub fn run(self) -> anyhow::Result<()> {
        let entries = tarpack::list_archive(&self.archive)
            .with_context(|| format!("cannot list {}", self.archive.display()))?;

        for info in &entries {
            if self.long {
                println!("{}", LongEntry(info));
            } else {
                println!("{}", info.full_name);
            }
        }
        Ok(())
    }
}

struct LongEntry<'a>(&'a EntryInfo);

impl fmt::Display for LongEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.0;
        let kind = match info.kind {
            EntryKind::File => '-',
            EntryKind::Directory => 'd',
            EntryKind::Symlink { .. } => 'l',
            EntryKind::Other => '?',
        };

        write!(f, "{kind} {:04o} {:>10} {}", info.mode, info.size, info.full_name)?;
        if let Some(target) = info.symlink_target() {
            write!(f, " -> {}", target.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_format() {
        let file = EntryInfo {
            full_name: "bin/run".into(),
            kind: EntryKind::File,
            mode: 0o755,
            size: 42,
        };
        assert_eq!(LongEntry(&file).to_string(), "- 0755         42 bin/run");

        let link = EntryInfo {
            full_name: "latest".into(),
            kind: EntryKind::Symlink {
                target: "v1".into(),
            },
            mode: 0o777,
            size: 0,
        };
        assert_eq!(LongEntry(&link).to_string(), "l 0777          0 latest -> v1");
    }
}
