//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pixelscope")]
#[command(version, about = "Image viewer with a per-pixel value grid", long_about = None)]
pub struct Args {
    /// Image file, or a folder to browse
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Serve puffin profiling data on 127.0.0.1:8585
    #[arg(long)]
    pub profile: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_arguments() {
        let args = Args::try_parse_from(["pixelscope", "shots/", "--config", "s.json", "--profile"])
            .unwrap();
        assert_eq!(args.path, Some(PathBuf::from("shots/")));
        assert_eq!(args.config, Some(PathBuf::from("s.json")));
        assert!(args.profile);
    }

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["pixelscope"]).unwrap();
        assert_eq!(args.path, None);
        assert_eq!(args.config, None);
        assert!(!args.profile);
    }
}
