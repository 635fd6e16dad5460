//! Concept tree datasets built from a title catalogue.
//!
//! A concept tree hangs three category nodes (director, country, genre) off a
//! chosen title, and under each category up to [`MAX_RELATED`] other titles that
//! share the attribute. The result is written as the graph view's dataset.

use std::collections::HashSet;
use std::io::Read;

use csv::ReaderBuilder;
use thiserror::Error;

use crate::components::force_graph::{GraphData, GraphLink, GraphNode};

/// Related titles kept per category.
pub const MAX_RELATED: usize = 3;

/// Errors reading a catalogue.
#[derive(Debug, Error)]
pub enum ConceptTreeError {
	/// A required header is absent.
	#[error("catalogue is missing the `{0}` column")]
	MissingColumn(&'static str),
	/// Malformed CSV or an I/O failure.
	#[error("could not read catalogue: {0}")]
	Csv(#[from] csv::Error),
}

/// The catalogue fields a concept tree looks at.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogRow {
	pub title: String,
	pub director: String,
	pub country: String,
	/// Comma-separated genre list.
	pub genres: String,
}

/// Read catalogue rows from CSV with `title`, `director`, `country` and
/// `listed_in` columns. Other columns are ignored; short rows read as empty.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogRow>, ConceptTreeError> {
	let mut csv = ReaderBuilder::new().flexible(true).from_reader(reader);
	let headers = csv.headers()?.clone();
	let column = |name: &'static str| {
		headers
			.iter()
			.position(|h| h == name)
			.ok_or(ConceptTreeError::MissingColumn(name))
	};
	let (title, director, country, genres) = (
		column("title")?,
		column("director")?,
		column("country")?,
		column("listed_in")?,
	);

	let mut rows = Vec::new();
	for record in csv.records() {
		let record = record?;
		let field = |i: usize| record.get(i).unwrap_or_default().to_string();
		rows.push(CatalogRow {
			title: field(title),
			director: field(director),
			country: field(country),
			genres: field(genres),
		});
	}
	Ok(rows)
}

/// Branch of a concept tree.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
	Director,
	Country,
	Genre,
}

impl Category {
	pub const ALL: [Category; 3] = [Category::Director, Category::Country, Category::Genre];

	/// Node id of the category.
	pub fn name(self) -> &'static str {
		match self {
			Category::Director => "Director",
			Category::Country => "Country",
			Category::Genre => "Genre",
		}
	}
}

/// A title and the titles related to it, per category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptTree {
	/// The chosen title.
	pub root: String,
	/// Whether the root title was found in the catalogue.
	pub found: bool,
	/// Related titles per category, in [`Category::ALL`] order.
	pub branches: Vec<(Category, Vec<String>)>,
}

impl ConceptTree {
	/// Build the tree for `title`. The first row carrying the title supplies its attributes.
	pub fn build(rows: &[CatalogRow], title: &str) -> Self {
		let subject = rows.iter().find(|r| r.title == title);
		let related = |matches: &dyn Fn(&CatalogRow) -> bool| -> Vec<String> {
			rows.iter()
				.filter(|r| r.title != title && matches(r))
				.take(MAX_RELATED)
				.map(|r| r.title.clone())
				.collect()
		};

		let branches = Category::ALL
			.into_iter()
			.map(|category| {
				let titles = match (category, subject) {
					(_, None) => Vec::new(),
					(Category::Director, Some(s)) if !s.director.is_empty() => {
						related(&|r: &CatalogRow| r.director == s.director)
					}
					(Category::Country, Some(s)) if !s.country.is_empty() => {
						related(&|r: &CatalogRow| r.country == s.country)
					}
					(Category::Genre, Some(s)) if !s.genres.is_empty() => {
						let wanted: Vec<&str> = s
							.genres
							.split(',')
							.map(str::trim)
							.filter(|g| !g.is_empty())
							.collect();
						related(&|r: &CatalogRow| wanted.iter().any(|g| r.genres.contains(g)))
					}
					_ => Vec::new(),
				};
				(category, titles)
			})
			.collect();

		Self {
			root: title.to_string(),
			found: subject.is_some(),
			branches,
		}
	}

	/// Flatten into a dataset: root → category → related title.
	///
	/// Root → category links carry the category name as their label. Nodes and
	/// links are deduplicated, keeping first occurrence order.
	pub fn to_graph_data(&self) -> GraphData {
		let mut data = GraphData::default();
		let mut seen_nodes = HashSet::new();
		let mut seen_links = HashSet::new();

		let mut add_node = |data: &mut GraphData, id: &str| {
			if seen_nodes.insert(id.to_string()) {
				data.nodes.push(GraphNode::new(id));
			}
		};
		let mut add_link = |data: &mut GraphData, link: GraphLink| {
			if seen_links.insert((link.source.clone(), link.target.clone())) {
				data.links.push(link);
			}
		};

		add_node(&mut data, &self.root);
		for (category, titles) in &self.branches {
			add_node(&mut data, category.name());
			add_link(
				&mut data,
				GraphLink::new(&self.root, category.name()).with_label(category.name()),
			);
			for title in titles {
				add_node(&mut data, title);
				add_link(&mut data, GraphLink::new(category.name(), title));
			}
		}
		data
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CATALOG: &str = "\
show_id,title,director,country,listed_in
1,Alpha,Ann Lee,India,\"Dramas, International Movies\"
2,Beta,Ann Lee,India,Comedies
3,Gamma,Bo Chen,India,Dramas
4,Delta,Ann Lee,Japan,Documentaries
5,Epsilon,,India,International Movies
6,Zeta,Ann Lee,India,Dramas
7,Eta,Ann Lee,France,Horror
";

	fn rows() -> Vec<CatalogRow> {
		read_catalog(CATALOG.as_bytes()).unwrap()
	}

	fn branch<'a>(tree: &'a ConceptTree, category: Category) -> &'a [String] {
		&tree.branches.iter().find(|(c, _)| *c == category).unwrap().1
	}

	#[test]
	fn reads_named_columns() {
		let rows = rows();
		assert_eq!(rows.len(), 7);
		assert_eq!(rows[0].genres, "Dramas, International Movies");
		assert_eq!(rows[4].director, "");
	}

	#[test]
	fn missing_column_is_reported() {
		let err = read_catalog("title,director,country\nA,B,C\n".as_bytes()).unwrap_err();
		assert!(matches!(err, ConceptTreeError::MissingColumn("listed_in")));
	}

	#[test]
	fn related_titles_are_capped_and_exclude_root() {
		let tree = ConceptTree::build(&rows(), "Alpha");
		assert!(tree.found);
		assert_eq!(branch(&tree, Category::Director), ["Beta", "Delta", "Zeta"]);
		assert_eq!(branch(&tree, Category::Country), ["Beta", "Gamma", "Epsilon"]);
		assert_eq!(branch(&tree, Category::Genre), ["Gamma", "Epsilon", "Zeta"]);
	}

	#[test]
	fn empty_attribute_has_no_relatives() {
		let tree = ConceptTree::build(&rows(), "Epsilon");
		assert!(branch(&tree, Category::Director).is_empty());
		assert_eq!(branch(&tree, Category::Country), ["Alpha", "Beta", "Gamma"]);
	}

	#[test]
	fn unknown_title_yields_bare_categories() {
		let tree = ConceptTree::build(&rows(), "Omega");
		assert!(!tree.found);
		let data = tree.to_graph_data();
		let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["Omega", "Director", "Country", "Genre"]);
		assert_eq!(data.links.len(), 3);
		let labels: Vec<Option<&str>> = data.links.iter().map(|l| l.label.as_deref()).collect();
		assert_eq!(labels, [Some("Director"), Some("Country"), Some("Genre")]);
	}

	#[test]
	fn graph_data_deduplicates_shared_titles() {
		let data = ConceptTree::build(&rows(), "Alpha").to_graph_data();
		// Alpha, three categories, and Beta/Delta/Zeta/Gamma/Epsilon once each.
		assert_eq!(data.nodes.len(), 9);
		// Three category links plus nine category → title links.
		assert_eq!(data.links.len(), 12);
		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert!(data
			.links
			.iter()
			.all(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str())));
	}
}
