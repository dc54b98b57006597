//! TermMeta Admin - operator CLI for term metadata fields
//!
//! Acts as the host for every configured field: each command builds the
//! request the admin screen would see, fires the matching hook and prints
//! the resulting markup or value.

mod admin;

use admin::Admin;
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use termmeta_common::{Config, TaxonomyInfo, Term, TermId};
use termmeta_store::MetaStore;
use termmeta_ui::request::{EDIT_TAGS_SCREEN, INLINE_SAVE_TAX};
use termmeta_ui::{ColumnCell, ColumnSet, Hook, QuickEditBox, Request};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "termmeta-admin")]
#[command(about = "TermMeta term metadata admin CLI")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/termmeta/admin.toml")]
    config: String,

    /// redb database path
    #[arg(long, env = "TERMMETA_STORE")]
    store: Option<String>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Print JSON instead of text where supported
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Taxonomy registration
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyCommands,
    },
    /// List configured fields
    Fields,
    /// Print a term's value for a field
    Get {
        /// Meta key of the field
        field: String,
        term_id: u64,
    },
    /// Store a term's value for a field; an empty value clears it
    Set {
        /// Meta key of the field
        field: String,
        term_id: u64,
        taxonomy: String,
        value: String,
    },
    /// Submit the add or edit term form
    Save {
        term_id: u64,
        taxonomy: String,
        /// Posted form fields, e.g. term-rank=gold
        #[arg(long = "post", value_parser = parse_pair)]
        post: Vec<(String, String)>,
        /// Fire the create event instead of edit
        #[arg(long)]
        create: bool,
    },
    /// Bring every field's schema version up to date
    Upgrade,
    /// Print the list-table columns of a taxonomy
    Columns {
        taxonomy: String,
        /// Print the sortable columns instead
        #[arg(long)]
        sortable: bool,
    },
    /// Render one list-table cell
    Cell {
        taxonomy: String,
        column: String,
        term_id: u64,
    },
    /// Render term form fields
    Form {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Render the quick-edit box for a column
    QuickEdit {
        taxonomy: String,
        column: String,
        /// Admin screen the box is rendered on
        #[arg(long, default_value = EDIT_TAGS_SCREEN)]
        screen: String,
    },
    /// Print the assets and head markup of the term list screen
    Screen { taxonomy: String },
    /// Fire an AJAX action
    Ajax {
        action: String,
        /// Term being saved, for inline-save-tax
        #[arg(long)]
        term_id: Option<u64>,
        /// Taxonomy of the term
        #[arg(long)]
        taxonomy: Option<String>,
        #[arg(long = "post", value_parser = parse_pair)]
        post: Vec<(String, String)>,
    },
}

#[derive(Subcommand, Debug)]
enum TaxonomyCommands {
    /// Register or update a taxonomy
    Add {
        name: String,
        /// Hide the taxonomy from the admin UI
        #[arg(long)]
        hidden: bool,
        #[arg(long)]
        hierarchical: bool,
    },
    /// List registered taxonomies
    List,
    /// Remove a taxonomy registration
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
enum FormCommands {
    /// Fields of the "add new term" form
    Add { taxonomy: String },
    /// Fields of the "edit term" form
    Edit { taxonomy: String, term_id: u64 },
}

fn parse_pair(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))
}

fn with_posts(mut request: Request, post: Vec<(String, String)>) -> Request {
    for (name, value) in post {
        request = request.with_post(name, value);
    }
    request
}

/// Columns core renders for every taxonomy list table
fn core_columns() -> ColumnSet {
    [
        ("cb", "<input type=\"checkbox\" />"),
        ("name", "Name"),
        ("description", "Description"),
        ("slug", "Slug"),
        ("posts", "Count"),
    ]
    .into_iter()
    .collect()
}

fn core_sortable_columns() -> ColumnSet {
    [("name", "name"), ("description", "description"), ("slug", "slug"), ("posts", "count")]
        .into_iter()
        .collect()
}

fn print_markup(out: &str) {
    if !out.is_empty() {
        println!("{}", out.trim_end());
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load config file if it exists
    let config: Config = if std::path::Path::new(&args.config).exists() {
        let config_str = std::fs::read_to_string(&args.config)?;
        toml::from_str(&config_str).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse config file: {e}");
            Config::default()
        })
    } else {
        Config::default()
    };

    // Merge CLI args with config file (CLI takes precedence)
    let store_path = args
        .store
        .clone()
        .map_or_else(|| config.store.path.clone(), PathBuf::from);
    let log_level = args.log_level.clone().unwrap_or_else(|| config.logging.level.clone());

    // Initialize logging; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Config file: {}", args.config);
    info!("Store: {}", store_path.display());
    if config.fields.is_empty() {
        warn!("No fields configured in {}", args.config);
    }

    let store = Arc::new(MetaStore::open(&store_path)?);
    run(args.command, args.json, &config, store)
}

#[allow(clippy::too_many_lines)]
fn run(command: Commands, json: bool, config: &Config, store: Arc<MetaStore>) -> Result<()> {
    match command {
        Commands::Taxonomy { action } => match action {
            TaxonomyCommands::Add { name, hidden, hierarchical } => {
                let mut info = TaxonomyInfo::new(name, !hidden);
                info.hierarchical = hierarchical;
                store.put_taxonomy(&info)?;
                println!("Taxonomy '{}' registered", info.name);
            }
            TaxonomyCommands::List => {
                let taxonomies = store.load_taxonomies()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&taxonomies)?);
                } else if taxonomies.is_empty() {
                    println!("No taxonomies registered");
                } else {
                    println!("{:<30} {:<8} {:<12}", "NAME", "SHOW UI", "HIERARCHICAL");
                    println!("{}", "-".repeat(52));
                    for t in taxonomies {
                        println!("{:<30} {:<8} {:<12}", t.name, t.show_ui, t.hierarchical);
                    }
                }
            }
            TaxonomyCommands::Remove { name } => {
                store.delete_taxonomy(&name)?;
                println!("Taxonomy '{name}' removed");
            }
        },

        Commands::Fields => {
            let admin = Admin::new(config, store, &Request::admin())?;
            let fields: Vec<_> = admin
                .fields()
                .iter()
                .map(|ui| {
                    let spec = ui.spec();
                    json!({
                        "meta_key": ui.meta_key(),
                        "label": spec.labels.singular,
                        "version": spec.version,
                        "db_version": spec.db_version,
                        "db_version_key": spec.db_version_key,
                        "fancy": ui.is_fancy(),
                        "basename": ui.identity().basename,
                        "url": ui.identity().url,
                    })
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                println!("{:<20} {:<20} {:<10} {:<14}", "META KEY", "LABEL", "VERSION", "DB VERSION");
                println!("{}", "-".repeat(66));
                for ui in admin.fields() {
                    let spec = ui.spec();
                    println!(
                        "{:<20} {:<20} {:<10} {:<14}",
                        ui.meta_key(),
                        spec.labels.singular,
                        spec.version,
                        spec.db_version
                    );
                }
            }
        }

        Commands::Get { field, term_id } => {
            let admin = Admin::new(config, store, &Request::admin())?;
            let value = admin.field(&field)?.get_value(TermId::new(term_id))?;
            if json {
                println!("{}", json!({ "term_id": term_id, "meta_key": field, "value": value }));
            } else {
                println!("{value}");
            }
        }

        Commands::Set { field, term_id, taxonomy, value } => {
            let admin = Admin::new(config, store, &Request::admin())?;
            admin
                .field(&field)?
                .set_value(TermId::new(term_id), &taxonomy, &value, true)?;
            if value.is_empty() {
                println!("Cleared '{field}' on term {term_id}");
            } else {
                println!("Set '{field}' on term {term_id}");
            }
        }

        Commands::Save { term_id, taxonomy, post, create } => {
            let request = with_posts(Request::admin().with_taxonomy(&taxonomy), post);
            let admin = Admin::new(config, store, &request)?;
            let hook = if create { Hook::CreateTerm } else { Hook::EditTerm };
            admin
                .hooks()
                .do_term_action(&hook, TermId::new(term_id), &taxonomy, &request)?;
            println!("Fired {hook} for term {term_id}");
        }

        Commands::Upgrade => {
            let request = Request::admin();
            let admin = Admin::new(config, store, &request)?;
            let before: Vec<_> = admin
                .fields()
                .iter()
                .map(|ui| ui.schema_state())
                .collect::<termmeta_common::Result<_>>()?;
            admin.hooks().do_action(&Hook::AdminInit, &request)?;
            for (ui, state) in admin.fields().iter().zip(before) {
                if state.is_current() {
                    println!("{}: current", ui.meta_key());
                } else {
                    println!("{}: upgraded to {}", ui.meta_key(), ui.spec().db_version);
                }
            }
        }

        Commands::Columns { taxonomy, sortable } => {
            let request = Request::admin()
                .with_taxonomy(&taxonomy)
                .with_screen(EDIT_TAGS_SCREEN);
            let admin = Admin::new(config, store, &request)?;
            let columns = if sortable {
                admin
                    .hooks()
                    .apply_columns(&Hook::sortable_columns(&taxonomy), core_sortable_columns())
            } else {
                admin
                    .hooks()
                    .apply_columns(&Hook::manage_columns(&taxonomy), core_columns())
            };
            if json {
                let map: serde_json::Map<_, _> = columns
                    .iter()
                    .map(|(k, v)| (k.to_string(), json!(v)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for (key, header) in columns.iter() {
                    println!("{key:<20} {header}");
                }
            }
        }

        Commands::Cell { taxonomy, column, term_id } => {
            let request = Request::admin()
                .with_taxonomy(&taxonomy)
                .with_screen(EDIT_TAGS_SCREEN);
            let admin = Admin::new(config, store, &request)?;
            let cell = ColumnCell {
                column_name: &column,
                term_id: TermId::new(term_id),
                taxonomy: &taxonomy,
            };
            print_markup(&admin.hooks().render_column(&cell, &request)?);
        }

        Commands::Form { action } => {
            let (taxonomy, term) = match action {
                FormCommands::Add { taxonomy } => (taxonomy, None),
                FormCommands::Edit { taxonomy, term_id } => {
                    let term = Term::new(TermId::new(term_id), taxonomy.as_str());
                    (taxonomy, Some(term))
                }
            };
            let request = Request::admin().with_taxonomy(&taxonomy);
            let admin = Admin::new(config, store, &request)?;
            print_markup(&admin.hooks().render_form(&taxonomy, term.as_ref(), &request)?);
        }

        Commands::QuickEdit { taxonomy, column, screen } => {
            let request = Request::admin().with_taxonomy(&taxonomy).with_screen(&screen);
            let admin = Admin::new(config, store, &request)?;
            admin.hooks().do_action(&Hook::LoadEditTags, &request)?;
            let quick_edit = QuickEditBox {
                column_name: &column,
                screen: &screen,
                taxonomy: &taxonomy,
            };
            let (out, produced) = admin.hooks().render_quick_edit(&quick_edit, &request)?;
            if produced == 0 {
                bail!("No quick edit field for column '{column}' on {taxonomy}");
            }
            print_markup(&out);
        }

        Commands::Screen { taxonomy } => {
            let request = Request::admin()
                .with_taxonomy(&taxonomy)
                .with_screen(EDIT_TAGS_SCREEN);
            let admin = Admin::new(config, store, &request)?;
            admin.hooks().do_action(&Hook::LoadEditTags, &request)?;
            print_markup(&admin.hooks().do_action(&Hook::AdminEnqueueScripts, &request)?);
            print_markup(&admin.hooks().do_action(&Hook::AdminHead, &request)?);
        }

        Commands::Ajax { action, term_id, taxonomy, post } => {
            let mut request = with_posts(Request::ajax(&action), post);
            if let Some(taxonomy) = &taxonomy {
                request = request.with_taxonomy(taxonomy);
            }
            let admin = Admin::new(config, store, &request)?;

            if action == INLINE_SAVE_TAX {
                let (Some(term_id), Some(taxonomy)) = (term_id, taxonomy) else {
                    bail!("{INLINE_SAVE_TAX} needs --term-id and --taxonomy");
                };
                let term_id = TermId::new(term_id);
                admin.hooks().do_action(&Hook::AdminInit, &request)?;
                admin
                    .hooks()
                    .do_term_action(&Hook::EditTerm, term_id, &taxonomy, &request)?;

                // Refreshed row cells for every field column
                for ui in admin.fields() {
                    let cell = ColumnCell {
                        column_name: ui.meta_key(),
                        term_id,
                        taxonomy: &taxonomy,
                    };
                    let out = admin.hooks().render_column(&cell, &request)?;
                    println!("{}\t{}", ui.meta_key(), out);
                }
            } else {
                print_markup(&admin.hooks().do_action(&Hook::ajax(action), &request)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("term-rank=gold=1").unwrap(),
            ("term-rank".to_string(), "gold=1".to_string())
        );
        assert_eq!(parse_pair("term-rank=").unwrap().1, "");
        assert!(parse_pair("term-rank").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from([
            "termmeta-admin",
            "save",
            "42",
            "tag",
            "--post",
            "term-rank=gold",
            "--create",
        ])
        .unwrap();
        match args.command {
            Commands::Save { term_id, post, create, .. } => {
                assert_eq!(term_id, 42);
                assert!(create);
                assert_eq!(post, vec![("term-rank".to_string(), "gold".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_core_columns_order() {
        let keys: Vec<_> = core_columns().keys().map(str::to_string).collect();
        assert_eq!(keys, ["cb", "name", "description", "slug", "posts"]);
    }
}
