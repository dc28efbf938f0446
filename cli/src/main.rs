#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::{Context, ensure};
use clap::Parser;
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};
use oxowl2sql::{Ontology, SchemaCompiler, StatementSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

const ERROR_LOG_FILE: &str = "error.log";
const REQUIRED_PRIVILEGES: [&str; 3] = ["CREATE", "DROP", "INSERT"];
const DEFAULT_SERVER: &str = "localhost";
const DEFAULT_PORT: u16 = 3306;
const DEFAULT_DATABASE: &str = "owl2sql";

/// Compiles an OWL 2 ontology into a normalized MySQL database
#[derive(Parser)]
#[command(about, version)]
struct Args {
    /// Ontology file to compile. The RDF format is guessed from the file extension
    file: PathBuf,
    /// MySQL server host name
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,
    /// MySQL server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// MySQL user name
    #[arg(short, long, default_value = "")]
    username: String,
    /// MySQL password
    #[arg(short, long, default_value = "")]
    password: String,
    /// Name of the database to build. An existing database of the same name is dropped
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,
    /// Prompt for the connection parameters on the console instead of reading options
    #[arg(short = 'C', long)]
    console: bool,
    /// Write one line per skipped entity to error.log in the working directory
    #[arg(short = 'E', long)]
    log_errors: bool,
}

struct ConnectionParams {
    server: String,
    port: u16,
    username: String,
    password: String,
    database: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let ontology = Ontology::load(&args.file)
        .with_context(|| format!("failed to load the ontology from {}", args.file.display()))?;
    tracing::info!(
        classes = ontology.classes().count(),
        individuals = ontology.individuals().count(),
        "loaded the ontology"
    );

    let params = if args.console {
        prompt_connection_params()?
    } else {
        ConnectionParams {
            server: args.server,
            port: args.port,
            username: args.username,
            password: args.password,
            database: args.database,
        }
    };
    ensure!(
        is_valid_database_name(&params.database),
        "invalid database name {}: only letters, digits, '_' and '$' are allowed",
        params.database
    );

    let mut conn = Conn::new(
        OptsBuilder::new()
            .ip_or_hostname(Some(params.server.clone()))
            .tcp_port(params.port)
            .user(Some(params.username.clone()))
            .pass(Some(params.password.clone())),
    )
    .with_context(|| format!("failed to connect to mysql://{}:{}", params.server, params.port))?;

    ensure!(
        has_required_privileges(&mut conn, &params.database)?,
        "user '{}' needs the CREATE, DROP and INSERT privileges (or ALL PRIVILEGES) on {}",
        params.username,
        params.database
    );
    prepare_database(&mut conn, &params.database)?;

    let mut sink = MysqlSink { conn };
    let mut compiler = SchemaCompiler::new(&ontology, &mut sink);
    if args.log_errors {
        match File::create(ERROR_LOG_FILE) {
            Ok(file) => compiler = compiler.with_error_log(Box::new(BufWriter::new(file))),
            Err(e) => tracing::warn!(
                error = %e,
                "cannot create {ERROR_LOG_FILE}, continuing without error logging"
            ),
        }
    }
    let report = compiler
        .build()
        .context("failed to build the database")?;
    sink.commit().context("failed to commit the database")?;

    println!("{}", report.summary());
    println!(
        "Committed the database to mysql://{}:{}/{}",
        params.server, params.port, params.database
    );
    Ok(())
}

struct MysqlSink {
    conn: Conn,
}

impl StatementSink for MysqlSink {
    type Error = mysql::Error;

    fn execute(&mut self, statement: &str) -> Result<(), mysql::Error> {
        self.conn.query_drop(statement)
    }

    fn commit(&mut self) -> Result<(), mysql::Error> {
        self.conn.query_drop("COMMIT")
    }
}

/// Drops and recreates the target database, selects it and disables
/// autocommit so the build runs inside one transaction.
fn prepare_database(conn: &mut Conn, database: &str) -> anyhow::Result<()> {
    conn.query_drop(format!("DROP DATABASE IF EXISTS {database}"))
        .with_context(|| format!("failed to drop the existing database {database}"))?;
    conn.query_drop(format!("CREATE DATABASE {database}"))
        .with_context(|| format!("failed to create the database {database}"))?;
    conn.query_drop(format!("USE {database}"))
        .with_context(|| format!("failed to select the database {database}"))?;
    conn.query_drop("SET autocommit=0")
        .context("failed to disable autocommit")?;
    Ok(())
}

fn has_required_privileges(conn: &mut Conn, database: &str) -> anyhow::Result<bool> {
    let grants: Vec<String> = conn
        .query("SHOW GRANTS")
        .context("failed to list the user's grants")?;
    let mut privileges = Vec::new();
    for grant in &grants {
        privileges.extend(granted_privileges(grant, database));
    }
    Ok(privileges.iter().any(|privilege| privilege == "ALL PRIVILEGES")
        || REQUIRED_PRIVILEGES
            .iter()
            .all(|required| privileges.iter().any(|privilege| privilege == required)))
}

/// Parses one line of `SHOW GRANTS` output. Returns the listed privileges if
/// they apply globally or to the target database, and nothing otherwise.
fn granted_privileges(grant: &str, database: &str) -> Vec<String> {
    let Some(rest) = grant.strip_prefix("GRANT ") else {
        return Vec::new();
    };
    let Some((privileges, rest)) = rest.split_once(" ON ") else {
        return Vec::new();
    };
    let target = rest
        .split_once(" TO ")
        .map_or(rest, |(target, _)| target)
        .replace('`', "");
    if target != "*.*" && target != format!("{database}.*") {
        return Vec::new();
    }
    privileges
        .split(',')
        .map(|privilege| privilege.trim().to_owned())
        .collect()
}

fn is_valid_database_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn prompt_connection_params() -> anyhow::Result<ConnectionParams> {
    let server = loop {
        let input = prompt(&format!("Server name [{DEFAULT_SERVER}]: "))?;
        if input.is_empty() {
            break DEFAULT_SERVER.to_owned();
        }
        if input.contains([':', '/']) {
            println!("Server names must not contain ':' or '/'");
            continue;
        }
        break input;
    };
    let port = loop {
        let input = prompt(&format!("Port [{DEFAULT_PORT}]: "))?;
        if input.is_empty() {
            break DEFAULT_PORT;
        }
        match input.parse() {
            Ok(port) => break port,
            Err(_) => println!("Invalid port number"),
        }
    };
    let username = prompt("Username: ")?;
    let password = prompt("Password: ")?;
    let database = loop {
        let input = prompt(&format!("Database name [{DEFAULT_DATABASE}]: "))?;
        if input.is_empty() {
            break DEFAULT_DATABASE.to_owned();
        }
        if is_valid_database_name(&input) {
            break input;
        }
        println!("Database names may only contain letters, digits, '_' and '$'");
    };
    Ok(ConnectionParams {
        server,
        port,
        username,
        password,
        database,
    })
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}
