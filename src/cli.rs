//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for mediacat using the `clap` crate.
//! Values with their own syntax (source paths, sort keys, property kinds) are
//! taken as strings here and parsed by the commands, so every parse failure
//! surfaces as a `CatalogError`.
//!
//! # Commands
//!
//! - **view**: Show one page of a filtered, grouped and sorted view
//! - **import**: Load records from a JSON array
//! - **property**: Manage property definitions
//! - **tag**: Set property values on records
//! - **moves**: List or resolve moved files
//! - **column**: Print one field of every record in a view
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use mediacat::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["mediacat", "view", "--group-tag", "genre", "--sort", "-size"]);
//! assert!(matches!(cli.command, Commands::View(_)));
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mediacat")]
#[command(about = "A media catalog with layered views", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database name to use (overrides default)
    #[arg(long = "db", value_name = "NAME", global = true)]
    pub db: Option<String>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long = "json", global = true)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Layers of a view
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Source path such as `readable` or `readable-found` (repeatable)
    #[arg(short = 's', long = "source", value_name = "PATH")]
    pub sources: Vec<String>,

    /// Group by a record field
    #[arg(long = "group-by", value_name = "FIELD", conflicts_with = "group_tag")]
    pub group_by: Option<String>,

    /// Group by a property
    #[arg(long = "group-tag", value_name = "PROPERTY")]
    pub group_tag: Option<String>,

    /// Group order: value, count or length
    #[arg(long = "group-sort", value_name = "ORDER", default_value = "value")]
    pub group_sort: String,

    /// Reverse the group order
    #[arg(long = "reverse")]
    pub reverse: bool,

    /// Keep groups holding a single record
    #[arg(long = "singletons")]
    pub singletons: bool,

    /// Classifier path value (repeatable, multi-valued property groupings only)
    #[arg(short = 'c', long = "classifier", value_name = "VALUE")]
    pub classifier: Vec<String>,

    /// Index of the selected group
    #[arg(short = 'g', long = "group", value_name = "INDEX", default_value_t = 0)]
    pub group: usize,

    /// Search text
    #[arg(short = 'S', long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Search condition: and, or, exact or id
    #[arg(long = "search-mode", value_name = "MODE", default_value = "and")]
    pub search_mode: String,

    /// Sort key such as `-date` or `title` (repeatable)
    #[arg(long = "sort", value_name = "KEY", allow_hyphen_values = true)]
    pub sort: Vec<String>,

    /// Only these record ids
    #[arg(long = "include", value_name = "ID", conflicts_with = "exclude")]
    pub include: Vec<u64>,

    /// All records except these ids
    #[arg(long = "exclude", value_name = "ID")]
    pub exclude: Vec<u64>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show one page of a view
    #[command(visible_alias = "v")]
    View(ViewCommand),

    /// Import records from a JSON array
    Import {
        /// JSON file holding an array of records
        file: PathBuf,
    },

    /// Manage property definitions
    #[command(visible_alias = "prop")]
    Property {
        #[command(subcommand)]
        command: PropertyCommands,
    },

    /// Set the values of a property on records
    #[command(visible_alias = "t")]
    Tag {
        /// Property name
        property: String,

        /// New values; none clears the property
        values: Vec<String>,

        /// Records to update (repeatable)
        #[arg(short = 'i', long = "id", value_name = "ID", required = true)]
        ids: Vec<u64>,
    },

    /// List moved-file candidates, or resolve one move
    Moves {
        /// Missing record to resolve
        #[arg(long = "from", value_name = "ID", requires = "to")]
        from: Option<u64>,

        /// Found record it moved to
        #[arg(long = "to", value_name = "ID", requires = "from")]
        to: Option<u64>,
    },

    /// Print one field of every selected record of a view
    Column {
        /// Field name
        field: String,

        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ViewCommand {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Page number, starting at 0
    #[arg(short = 'p', long = "page", value_name = "N", default_value_t = 0)]
    pub page: usize,

    /// Records per page (overrides config)
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,
}

/// Property management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PropertyCommands {
    /// Define a new property
    Define {
        name: String,

        /// Value kind: bool, int, float or str
        #[arg(short = 'k', long = "kind", default_value = "str")]
        kind: String,

        /// Allow several values per record
        #[arg(short = 'm', long = "multiple")]
        multiple: bool,

        /// Allowed value (repeatable, at least two)
        #[arg(short = 'e', long = "enum", value_name = "VALUE")]
        enumeration: Vec<String>,

        /// Default value
        #[arg(short = 'd', long = "default", value_name = "VALUE")]
        default: Option<String>,
    },

    /// Rename a property on every record
    Rename { old: String, new: String },

    /// Remove a property and its values
    #[command(visible_alias = "rm")]
    Remove { name: String },

    /// Switch a property between single- and multi-valued
    Multiple {
        name: String,

        #[arg(action = ArgAction::Set)]
        multiple: bool,
    },

    /// List all properties
    #[command(visible_alias = "ls")]
    List,

    /// Show one property with its value counts
    Describe { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_layers() {
        let cli = Cli::parse_from([
            "mediacat", "view", "-s", "readable-found", "--group-tag", "genre", "--group-sort",
            "count", "--reverse", "-c", "drama", "--sort", "-date", "--sort", "title", "-p", "2",
        ]);
        let Commands::View(command) = cli.command else {
            panic!("Expected View command");
        };
        assert_eq!(command.view.sources, vec!["readable-found".to_string()]);
        assert_eq!(command.view.group_tag.as_deref(), Some("genre"));
        assert_eq!(command.view.group_sort, "count");
        assert!(command.view.reverse);
        assert_eq!(command.view.classifier, vec!["drama".to_string()]);
        assert_eq!(command.view.sort, vec!["-date".to_string(), "title".to_string()]);
        assert_eq!(command.page, 2);
        assert!(command.page_size.is_none());
    }

    #[test]
    fn test_group_by_conflicts_with_group_tag() {
        let result = Cli::try_parse_from(["mediacat", "view", "--group-by", "size", "--group-tag", "genre"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mediacat", "property", "list", "--db", "films", "--json", "-q"]);
        assert_eq!(cli.db.as_deref(), Some("films"));
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Property { command: PropertyCommands::List }));
    }

    #[test]
    fn test_parse_define() {
        let cli = Cli::parse_from([
            "mediacat", "property", "define", "quality", "-e", "sd", "-e", "hd", "-d", "hd",
        ]);
        let Commands::Property {
            command:
                PropertyCommands::Define {
                    name,
                    kind,
                    multiple,
                    enumeration,
                    default,
                },
        } = cli.command
        else {
            panic!("Expected Define command");
        };
        assert_eq!(name, "quality");
        assert_eq!(kind, "str");
        assert!(!multiple);
        assert_eq!(enumeration, vec!["sd".to_string(), "hd".to_string()]);
        assert_eq!(default.as_deref(), Some("hd"));
    }

    #[test]
    fn test_parse_multiple_flag_value() {
        let cli = Cli::parse_from(["mediacat", "property", "multiple", "genre", "false"]);
        assert!(matches!(
            cli.command,
            Commands::Property {
                command: PropertyCommands::Multiple { multiple: false, .. }
            }
        ));
    }

    #[test]
    fn test_tag_requires_ids() {
        assert!(Cli::try_parse_from(["mediacat", "tag", "genre", "drama"]).is_err());
        let cli = Cli::parse_from(["mediacat", "tag", "genre", "-i", "1", "-i", "2"]);
        let Commands::Tag { values, ids, .. } = cli.command else {
            panic!("Expected Tag command");
        };
        assert!(values.is_empty());
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_moves_from_requires_to() {
        assert!(Cli::try_parse_from(["mediacat", "moves", "--from", "2"]).is_err());
        let cli = Cli::parse_from(["mediacat", "moves", "--from", "2", "--to", "1"]);
        assert!(matches!(cli.command, Commands::Moves { from: Some(2), to: Some(1) }));
    }
}
