//! Command dispatch: wire CLI arguments to application operations.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use generational_arena::Index;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::Snapshot;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{Forest, TreeNode};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        Some(Commands::Tree { snapshot }) => _tree(snapshot, config),
        Some(Commands::Roots { snapshot }) => _roots(snapshot, config),
        Some(Commands::Stats { snapshot }) => _stats(snapshot, config),
        Some(Commands::Config { command }) => _config(command, config),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Load settings and snapshot, build the forest, resolve colors.
fn load_forest(snapshot_path: &Path, config: Option<&Path>) -> CliResult<Forest> {
    let settings = Settings::load(config)?;
    let snapshot = Snapshot::load(snapshot_path)?;
    let forest = snapshot.build_forest(&settings.palette())?;
    Ok(forest)
}

#[instrument]
fn _tree(snapshot_path: &Path, config: Option<&Path>) -> CliResult<()> {
    let forest = load_forest(snapshot_path, config)?;
    debug!("rendering {} trees", forest.roots().len());
    for &root in forest.roots() {
        output::info(&render_tree(&forest, root));
    }
    Ok(())
}

#[instrument]
fn _roots(snapshot_path: &Path, config: Option<&Path>) -> CliResult<()> {
    let forest = load_forest(snapshot_path, config)?;
    for id in forest.root_ids() {
        output::info(&id);
    }
    Ok(())
}

#[instrument]
fn _stats(snapshot_path: &Path, config: Option<&Path>) -> CliResult<()> {
    let forest = load_forest(snapshot_path, config)?;
    output::header("Forest");
    output::detail(&format!("trees:  {}", forest.roots().len()));
    output::detail(&format!("nodes:  {}", forest.node_count()));
    output::detail(&format!("depth:  {}", forest.depth()));
    output::detail(&format!("leaves: {}", forest.leaf_ids().len()));
    Ok(())
}

fn _config(command: &ConfigCommands, config: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}

/// Transform one arena tree into a termtree for display.
///
/// Recursion depth equals tree depth, which is bounded by the entity
/// count of the snapshot.
fn render_tree(forest: &Forest, idx: Index) -> Tree<String> {
    let Some(node) = forest.get_node(idx) else {
        return Tree::new(String::new());
    };
    let mut tree = Tree::new(node_label(node));
    for &child in &node.children {
        tree.push(render_tree(forest, child));
    }
    tree
}

fn node_label(node: &TreeNode) -> String {
    match &node.data.source {
        Some(source) => format!("{} [{}] {}", node.data.id, source, node.data.color),
        None => format!("{} {}", node.data.id, node.data.color),
    }
}
