use std::path::PathBuf;

use anyhow::Context;
use tarpack::CreateOptions;
use tarpack::options::DEFAULT_COMPRESSION_LEVEL;

#[derive(Clone, Debug, clap::Args)]
pub struct CreateArg {
    /// Directory to pack
    pub source: PathBuf,
    /// Archive file to write, replaced if it exists
    pub archive: PathBuf,
    /// Gzip level, 0 (store) to 9 (best)
    #[arg(
        long,
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9)
    )]
    pub level: u32,
    /// Store symlinks as links instead of archiving what they point to
    #[arg(long)]
    pub no_follow_links: bool,
}

impl CreateArg {
    pub fn run(self) -> anyhow::Result<()> {
        let options = CreateOptions::default()
            .compression_level(self.level)
            .follow_links(!self.no_follow_links);

        let archive = tarpack::create_archive_with_options(&self.source, &self.archive, &options)
            .with_context(|| format!("cannot create {}", self.archive.display()))?;

        println!("{}", archive.display());
        Ok(())
    }
}
