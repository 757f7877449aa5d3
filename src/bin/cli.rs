//! PocketDB - Interactive SQL shell

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use pocketdb::storage::Row;
use pocketdb::{Database, QueryResult};

const DEFAULT_DB_PATH: &str = "data/pocket.db";

/// Print welcome banner
fn print_banner(path: &str) {
    println!(
        r#"
PocketDB - Interactive SQL Shell
Database: {}
Type '.help' for help, '.quit' to exit
"#,
        path
    );
}

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .tables            List all tables
  .schema <table>    Show table schema
  .quit / .exit      Exit the shell

SQL Commands:
  CREATE TABLE ...   Create a new table
  INSERT INTO ...    Insert a row
  SELECT ...         Query data
  UPDATE ...         Update rows
  DELETE FROM ...    Delete rows

Examples:
  CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR);
  INSERT INTO users VALUES (1, 'Alice');
  SELECT * FROM users WHERE id = 1;
"#
    );
}

/// Format query result rows as a text table
fn format_rows(rows: &[Row]) -> String {
    if rows.is_empty() {
        return "(0 rows)\n".to_string();
    }

    let columns: Vec<&String> = rows[0].keys().collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            if let Some(value) = row.get(*column) {
                widths[i] = widths[i].max(value.to_string().len());
            }
        }
    }

    let mut output = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    let header = header.join(" | ");
    output.push_str(&header);
    output.push('\n');
    output.push_str(&"-".repeat(header.len()));
    output.push('\n');

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, w)| {
                let text = row.get(*column).map(|v| v.to_string()).unwrap_or_default();
                format!("{:<width$}", text, width = *w)
            })
            .collect();
        output.push_str(&cells.join(" | "));
        output.push('\n');
    }

    output.push_str(&format!("\n({} row(s))\n", rows.len()));
    output
}

/// Execute a SQL statement and print its result
fn execute_sql(db: &mut Database, sql: &str) {
    match db.execute(sql) {
        Ok(QueryResult::Rows(rows)) => print!("{}", format_rows(&rows)),
        Ok(QueryResult::Count(count)) => {
            let verb = if sql.trim_start().get(..6).map_or(false, |head| {
                head.eq_ignore_ascii_case("delete")
            }) {
                "deleted"
            } else {
                "updated"
            };
            println!("{} row(s) {}", count, verb);
        }
        Ok(QueryResult::None) => {
            if sql
                .trim_start()
                .get(..6)
                .map_or(false, |head| head.eq_ignore_ascii_case("create"))
            {
                println!("Table created successfully.");
            } else {
                println!("Row inserted successfully.");
            }
        }
        Err(e) => println!("ERROR: {}", e),
    }
}

/// Handle dot commands
fn handle_meta_command(db: &Database, command: &str) -> bool {
    let parts: Vec<&str> = command.split_whitespace().collect();

    match parts.first().map(|c| c.to_ascii_lowercase()).as_deref() {
        Some(".help") => print_help(),
        Some(".quit") | Some(".exit") => return false,
        Some(".tables") => {
            let tables = db.list_tables();
            if tables.is_empty() {
                println!("No tables found.");
            } else {
                println!("\nTables:");
                for table_name in tables {
                    let row_count = db.table(&table_name).map_or(0, |t| t.row_count());
                    println!("  - {} ({} rows)", table_name, row_count);
                }
                println!();
            }
        }
        Some(".schema") => match parts.get(1) {
            Some(table_name) => show_schema(db, table_name),
            None => println!("Usage: .schema <table_name>"),
        },
        Some(cmd) => {
            println!("Unknown command: {}", cmd);
            println!("Type .help for available commands");
        }
        None => {}
    }

    true
}

fn show_schema(db: &Database, table_name: &str) {
    let Some(table) = db.table(table_name) else {
        println!("Table '{}' does not exist.", table_name);
        return;
    };

    let schema = table.schema();
    println!("\nSchema for '{}':", table_name);
    for (column, ty) in &schema.columns {
        let mut constraints = Vec::new();
        if schema.is_primary_key(column) {
            constraints.push("PRIMARY KEY");
        }
        if schema.is_unique(column) {
            constraints.push("UNIQUE");
        }
        let suffix = if constraints.is_empty() {
            String::new()
        } else {
            format!(" {}", constraints.join(" "))
        };
        println!("  {}: {}{}", column, ty, suffix);
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    let mut db = Database::open(&db_path)
        .with_context(|| format!("failed to open database at '{}'", db_path))?;

    print_banner(&db_path);

    let mut rl = DefaultEditor::new().context("failed to initialize line editor")?;

    loop {
        let line = match rl.readline("pocket> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Exiting...");
                break;
            }
            Err(e) => return Err(e).context("error reading input"),
        };

        let mut sql = line.trim().to_string();
        if sql.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(&sql);

        if sql.starts_with('.') {
            if !handle_meta_command(&db, &sql) {
                break;
            }
            continue;
        }

        // Backslash at end of line continues the statement
        while sql.ends_with('\\') {
            sql.pop();
            sql.push(' ');
            match rl.readline("...> ") {
                Ok(next) => sql.push_str(next.trim()),
                Err(_) => break,
            }
        }

        execute_sql(&mut db, &sql);
    }

    Ok(())
}
