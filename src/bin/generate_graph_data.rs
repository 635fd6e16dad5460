//! Generate the graph view's dataset from a title catalogue.
//!
//! Builds the concept tree for one title and writes it as the JSON document the
//! view loads at startup.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::fs::{self, File};
use std::path::PathBuf;

use clap::Parser;
use concept_graph::concept_tree::{ConceptTree, read_catalog};
use concept_graph::components::force_graph::config::DEFAULT_DATA_URL;

#[derive(Parser)]
#[command(name = "generate-graph-data")]
#[command(about = "Build a concept graph dataset from a title catalogue", long_about = None)]
struct Cli {
	/// Catalogue CSV with title, director, country and listed_in columns
	#[arg(short, long)]
	input: PathBuf,

	/// Title at the root of the concept tree
	#[arg(short, long)]
	title: String,

	/// Output JSON path
	#[arg(short, long, default_value = DEFAULT_DATA_URL)]
	output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();

	let file = File::open(&cli.input)
		.map_err(|e| format!("cannot open catalogue {}: {e}", cli.input.display()))?;
	let rows = read_catalog(file)?;
	println!("Read {} titles from {}", rows.len(), cli.input.display());

	let tree = ConceptTree::build(&rows, &cli.title);
	if !tree.found {
		println!("Warning: \"{}\" is not in the catalogue", cli.title);
	}
	for (category, titles) in &tree.branches {
		println!("  {}: {}", category.name(), titles.len());
	}

	let data = tree.to_graph_data();
	if let Some(parent) = cli.output.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(&cli.output, serde_json::to_string_pretty(&data)?)?;
	println!(
		"Wrote {} nodes, {} links to {}",
		data.nodes.len(),
		data.links.len(),
		cli.output.display()
	);

	Ok(())
}
