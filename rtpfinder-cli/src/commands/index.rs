//! The `index` command: summarize a game directory.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use rtpfinder::{fsops, DirectoryIndex, FileFinder, FinderConfig, RtpTable};

use crate::error::CliError;

/// Arguments of the `index` command.
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Game project directory
    pub game: PathBuf,

    /// Also list every indexed file
    #[arg(long)]
    pub list: bool,
}

pub fn run(args: IndexArgs) -> Result<(), CliError> {
    let finder = FileFinder::open(
        &args.game,
        FinderConfig::default(),
        Arc::new(RtpTable::empty()),
    )?;
    let project = finder.project();

    println!("root:        {}", project.root().display());
    println!("project:     {}", if FileFinder::is_project(project) { "yes" } else { "no" });
    println!("files:       {}", project.files().len());
    println!("directories: {}", project.directories().len());
    println!("total size:  {} bytes", total_size(project));

    if let Some(saves) = finder.create_save_index(&args.game) {
        println!("savegames:   {}", finder.count_savegames(&saves));
    }

    if args.list {
        let mut names: Vec<&str> = project.files().values().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            println!("{name}");
        }
        for dir in project.directories().keys() {
            let mut names: Vec<String> = project
                .files_in(dir)
                .map(|files| files.values().cloned().collect())
                .unwrap_or_default();
            names.sort_unstable();
            let actual = project.directory(dir).unwrap_or(dir.as_str());
            for name in names {
                println!("{actual}/{name}");
            }
        }
    }

    Ok(())
}

/// Sum the on-disk sizes of every indexed file.
fn total_size(project: &DirectoryIndex) -> u64 {
    let root_files = project
        .files()
        .values()
        .filter_map(|actual| fsops::file_size(&project.root().join(actual)));

    let nested_files = project.directories().iter().flat_map(|(normalized, actual)| {
        let dir = project.root().join(actual);
        project
            .files_in(normalized)
            .into_iter()
            .flat_map(|files| files.values())
            .filter_map(move |rel| fsops::file_size(&dir.join(rel)))
    });

    root_files.chain(nested_files).sum()
}
