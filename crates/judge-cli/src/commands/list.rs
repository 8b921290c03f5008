//! `list`: print the problems a run would touch

use colored::Colorize;

use crate::cli::SelectionArgs;
use crate::context::Workspace;
use crate::error::Result;

pub fn run_list(workspace: &Workspace, selection: &SelectionArgs) -> Result<()> {
    let paths = super::select_paths(workspace, selection)?;
    for path in &paths {
        println!("{path}");
    }
    eprintln!("{} {} problem(s) selected", "Total:".dimmed(), paths.len());
    Ok(())
}
