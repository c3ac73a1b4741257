//! CLI module - Command-line interface for Foodgram
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

pub use commands::{cmd_create_user, cmd_import_ingredients, cmd_import_tags};

use clap::{Parser, Subcommand};

/// Foodgram - recipe sharing backend
#[derive(Parser)]
#[command(name = "foodgram")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "daemon")]
    Serve,

    /// Load ingredients from a `name,unit` CSV file
    ImportIngredients {
        /// Path to the CSV file
        #[arg(default_value = "data/ingredients.csv")]
        path: String,
    },

    /// Load tags from a JSON array of `{name, color, slug}` objects
    ImportTags {
        /// Path to the JSON file
        #[arg(default_value = "data/tags.json")]
        path: String,
    },

    /// Register an account without going through the API
    CreateUser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        password: String,
    },

    /// Write a default config.toml into the working directory
    Init,
}
