//! Command-line argument parsing.

use clap::{Parser, Subcommand};

/// Browse the photo feed through the local image cache.
#[derive(Parser, Debug)]
#[command(name = "photofeed")]
#[command(about = "Paginated photo browsing with a local image cache")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Walk the feed page by page and load every photo's image
    Browse {
        /// Number of pages to walk
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Number of image slots loading concurrently
        #[arg(long, default_value_t = 6)]
        slots: usize,

        /// Edge length of the requested thumbnails, in pixels
        #[arg(long, default_value_t = 300)]
        thumb_size: u32,

        /// Keep the image cache in memory instead of the SQLite file
        #[arg(long)]
        ephemeral: bool,
    },

    /// Delete cached images older than the retention window
    Invalidate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_defaults() {
        let cli = Cli::try_parse_from(["photofeed", "browse"]).unwrap();
        assert_eq!(cli.command, Command::Browse { pages: 1, slots: 6, thumb_size: 300, ephemeral: false });
    }

    #[test]
    fn test_browse_flags() {
        let cli = Cli::try_parse_from([
            "photofeed",
            "browse",
            "--pages",
            "3",
            "--slots",
            "2",
            "--thumb-size",
            "64",
            "--ephemeral",
        ])
        .unwrap();
        assert_eq!(cli.command, Command::Browse { pages: 3, slots: 2, thumb_size: 64, ephemeral: true });
    }

    #[test]
    fn test_invalidate() {
        let cli = Cli::try_parse_from(["photofeed", "invalidate"]).unwrap();
        assert_eq!(cli.command, Command::Invalidate);
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["photofeed"]).is_err());
    }

    #[test]
    fn test_invalid_pages() {
        assert!(Cli::try_parse_from(["photofeed", "browse", "--pages", "many"]).is_err());
    }
}
