//! CLI tool to manage users for the token endpoint.
//!
//! Usage:
//!   cargo run --bin vms-manage-users -- create --username ops --password <pw>
//!   cargo run --bin vms-manage-users -- list
//!   cargo run --bin vms-manage-users -- set-password --username ops --password <pw>

use std::env;

use sea_orm_migration::MigratorTrait;

use vms_lib::config::Config;
use vms_lib::db::DbPool;
use vms_lib::migration::Migrator;
use vms_lib::services::auth;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    // Initialize database
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::connect(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(pool.connection(), None).await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    match command.as_str() {
        "create" => {
            let (username, password) = parse_credential_args(&args);
            create_user(&pool, &username, &password).await;
        }
        "list" | "ls" => list_users(&pool).await,
        "set-password" => {
            let (username, password) = parse_credential_args(&args);
            set_password(&pool, &username, &password).await;
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_credential_args(args: &[String]) -> (String, String) {
    let mut username: Option<String> = None;
    let mut password: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--username" | "-u" => {
                i += 1;
                if i < args.len() {
                    username = Some(args[i].clone());
                }
            }
            "--password" | "-p" => {
                i += 1;
                if i < args.len() {
                    password = Some(args[i].clone());
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    match (username, password) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            eprintln!("Error: --username and --password are required");
            std::process::exit(1);
        }
    }
}

async fn create_user(pool: &DbPool, username: &str, password: &str) {
    match auth::create_user(pool, username, password).await {
        Ok(user) => {
            println!("User '{}' created (id {}).", user.username, user.id);
            println!("Obtain a token with POST /api/token.");
        }
        Err(e) => {
            eprintln!("Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn list_users(pool: &DbPool) {
    let users = match pool.list_users().await {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Error listing users: {}", e);
            std::process::exit(1);
        }
    };

    if users.is_empty() {
        println!("No users found.");
        return;
    }

    println!();
    println!("{:<8} {:<32} {:<24}", "ID", "USERNAME", "CREATED");
    println!("{}", "-".repeat(64));

    for user in users {
        println!(
            "{:<8} {:<32} {:<24}",
            user.id,
            user.username,
            user.created_at.to_rfc3339()
        );
    }
    println!();
}

async fn set_password(pool: &DbPool, username: &str, password: &str) {
    match auth::set_user_password(pool, username, password).await {
        Ok(true) => {
            println!("Password updated for '{}'. Existing tokens stay valid.", username);
        }
        Ok(false) => {
            eprintln!("User '{}' not found.", username);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error updating password: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: vms-manage-users <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  create --username <u> --password <p>        Create a user");
    eprintln!("  list, ls                                    List all users");
    eprintln!("  set-password --username <u> --password <p>  Reset a password");
    eprintln!("  help                                        Show this help");
    eprintln!();
}
