use std::{
    error::Error,
    io::{self},
    path::Path,
    process::exit,
};

use bcrypt::DEFAULT_COST;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use notes_app::{
    Email, PasswordHash, ValidatedPassword, get_user_by_email, set_user_disabled, update_password,
};

/// A utility for managing registered users.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set a new password for a user.
    ResetPassword {
        /// The email the user signs in with.
        email: String,
    },
    /// Stop a user from signing in.
    Disable {
        /// The email the user signs in with.
        email: String,
    },
    /// Allow a disabled user to sign in again.
    Enable {
        /// The email the user signs in with.
        email: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let connection = Connection::open(db_path)?;

    match args.command {
        Command::ResetPassword { email } => {
            let user = get_user_by_email(&parse_email(&email), &connection)?;
            println!("Resetting password for {}", user.email);

            let Some(password_hash) = get_new_password_hash() else {
                return Ok(());
            };
            update_password(user.id, &password_hash, &connection)?;
            println!("Password updated successfully!");
        }
        Command::Disable { email } => {
            let user = get_user_by_email(&parse_email(&email), &connection)?;
            set_user_disabled(user.id, true, &connection)?;
            println!("Disabled {}", user.email);
        }
        Command::Enable { email } => {
            let user = get_user_by_email(&parse_email(&email), &connection)?;
            set_user_disabled(user.id, false, &connection)?;
            println!("Enabled {}", user.email);
        }
    }

    Ok(())
}

fn parse_email(raw_email: &str) -> Email {
    match Email::new(raw_email) {
        Ok(email) => email,
        Err(error) => {
            print_error(error.message());
            exit(1);
        }
    }
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        None => {
            print_error("Database path must include a file extension (e.g., 'notes.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            print_error("Database path must include a file extension (e.g., 'notes.db').");
            exit(1);
        }
        _ => {}
    }

    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }
}

fn get_new_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt_password("Enter a new password: ")?;

        if let Err(error) = ValidatedPassword::new(&first_password) {
            print_error(error);
            continue;
        }

        let second_password = prompt_password("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::from_raw_password(&first_password, DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => print_error(format!("Could not hash password: {error}. Try again.")),
        }
    }
}

/// `None` when stdin is closed or unreadable.
fn prompt_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
