// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Developer commands for the Casebook workspace:
//!
//! - `cargo xtask ci` lints, builds, tests and verifies the migrations
//! - `cargo xtask lint` runs clippy with warnings denied and checks formatting
//! - `cargo xtask fmt` formats the workspace
//! - `cargo xtask test` runs every test target
//! - `cargo xtask verify-migrations` applies the `SQLite` migrations to an
//!   in-memory database, checks the resulting schema, then reverts and
//!   reapplies them to confirm the down migrations undo the up migrations

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing_log::AsTrace;

/// Tables the persistence layer expects after migrating.
const EXPECTED_TABLES: &[&str] = &[
    "audit_events",
    "case_activities",
    "case_attachments",
    "case_subjects",
    "case_updates",
    "cases",
    "organizations",
    "report_exports",
    "report_instances",
    "report_templates",
    "template_sections",
];

/// Triggers the persistence layer relies on for integrity rules.
const EXPECTED_TRIGGERS: &[&str] = &["report_instances_immutable"];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.log_level_filter().as_trace())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum Command {
    /// Lint, build, test and verify migrations
    Ci,

    /// Build every target
    #[command(visible_alias = "b")]
    Build,

    /// Run clippy and check formatting
    #[command(visible_alias = "l")]
    Lint,

    /// Format the workspace
    Fmt,

    /// Run every test target
    #[command(visible_alias = "t")]
    Test,

    /// Verify the `SQLite` migrations apply, revert and reapply cleanly
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::Ci => {
                Self::Lint.run()?;
                Self::Build.run()?;
                Self::Test.run()?;
                verify_migrations()
            }
            Self::Build => cargo(&["build", "--workspace", "--all-targets"]),
            Self::Lint => {
                cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
                cargo(&["fmt", "--all", "--check"])
            }
            Self::Fmt => cargo(&["fmt", "--all"]),
            Self::Test => cargo(&["test", "--workspace", "--all-targets"]),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Runs `cargo` with the given arguments, logging the invocation.
fn cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_logged()?;
    Ok(())
}

/// Verify the `SQLite` migrations.
///
/// ## What This Command Does
///
/// 1. Applies the embedded migrations to an in-memory `SQLite` database
///    with foreign keys enforced
/// 2. Introspects the resulting schema (tables, columns, keys, indexes)
/// 3. Checks that every expected table and trigger exists and that every
///    foreign key points at a known table
/// 4. Reverts all migrations and checks that nothing is left behind
/// 5. Reapplies the migrations and checks the schema is identical to step 2
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Starting migration verification");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply migrations: {}", e))?;
    tracing::info!("Migrations applied successfully");

    let schema = introspect_sqlite_schema(&mut conn)?;
    check_expected_schema(&schema)?;
    check_triggers(&mut conn)?;

    tracing::info!("Reverting all migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert migrations: {}", e))?;

    let reverted = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: tables left after revert: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("Reapplying migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to reapply migrations: {}", e))?;

    let reapplied = introspect_sqlite_schema(&mut conn)?;
    if reapplied != schema {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: schema differs after revert and reapply"
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // Origin 'u' covers UNIQUE column constraints (sqlite_autoindex_*)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// Check the migrated schema against the tables the application uses
fn check_expected_schema(schema: &Schema) -> Result<()> {
    let present: BTreeSet<&str> = schema.tables.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = EXPECTED_TABLES.iter().copied().collect();

    if present != expected {
        let mut errors = Vec::new();

        for table in expected.difference(&present) {
            errors.push(format!("  - Table '{table}' is missing"));
        }

        for table in present.difference(&expected) {
            errors.push(format!("  - Table '{table}' is not expected"));
        }

        return Err(color_eyre::eyre::eyre!(
            "❌ Migration verification FAILED: Table mismatch\n{}",
            errors.join("\n")
        ));
    }

    for (table_name, table) in &schema.tables {
        if table.primary_keys.is_empty() {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Table '{}' has no primary key",
                table_name
            ));
        }

        for fk in &table.foreign_keys {
            let Some(target) = schema.tables.get(&fk.to_table) else {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Migration verification FAILED: '{}.{}' references unknown table '{}'",
                    table_name,
                    fk.from_column,
                    fk.to_table
                ));
            };

            if !target.columns.contains_key(&fk.to_column) {
                return Err(color_eyre::eyre::eyre!(
                    "❌ Migration verification FAILED: '{}.{}' references unknown column '{}.{}'",
                    table_name,
                    fk.from_column,
                    fk.to_table,
                    fk.to_column
                ));
            }
        }
    }

    Ok(())
}

/// Check that the integrity triggers exist
fn check_triggers(conn: &mut SqliteConnection) -> Result<()> {
    #[derive(QueryableByName)]
    struct TriggerName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let triggers: Vec<TriggerName> =
        diesel::sql_query("SELECT name FROM sqlite_master WHERE type='trigger' ORDER BY name")
            .load(conn)
            .wrap_err("Failed to query SQLite triggers")?;
    let present: BTreeSet<String> = triggers.into_iter().map(|t| t.name).collect();

    for trigger in EXPECTED_TRIGGERS {
        if !present.contains(*trigger) {
            return Err(color_eyre::eyre::eyre!(
                "❌ Migration verification FAILED: Trigger '{}' is missing",
                trigger
            ));
        }
    }

    Ok(())
}

/// Logs a `duct` command before running it.
trait RunLogged {
    fn run_logged(&self) -> io::Result<Output>;
}

impl RunLogged for duct::Expression {
    fn run_logged(&self) -> io::Result<Output> {
        tracing::info!("running {:?}", self);
        self.run()
            .inspect_err(|err| tracing::error!("{:?} failed: {err}", self))
    }
}
