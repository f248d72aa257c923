//! Command-line runner for the standalone exercises.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use movie_theater::exercises::{
    basics, collections, control,
    discount::{calculate_discount, DISCOUNT_EXAMPLES},
    github::{GithubClient, DEFAULT_REPO_URL},
    word_count::count_words_in_file,
};

#[derive(Debug, Parser)]
#[command(name = "exercises", version, about = "Run the programming exercises")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Arithmetic, strings and booleans on fixed inputs.
    Basics,
    /// Print the first N primes.
    Primes {
        #[arg(long, default_value_t = 10)]
        count: i64,
    },
    /// Sum the integers 1..=N.
    Sum {
        #[arg(long, default_value_t = 100)]
        n: i64,
    },
    /// Apply a percentage discount; without arguments prints the example table.
    Discount {
        #[arg(long, requires = "discount")]
        price: Option<f64>,
        #[arg(long, requires = "price")]
        discount: Option<f64>,
    },
    /// List the first three favorite books.
    Books,
    /// Look up a student id by name.
    Student {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Count the words in a text file.
    Words {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Fetch repository metadata from the GitHub API.
    Repo {
        #[arg(value_name = "URL", default_value = DEFAULT_REPO_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Basics => {
            println!("add_integers(7, 5) = {}", basics::add_integers(7, 5));
            println!("divide_floats(7.0, 2.0) = {}", basics::divide_floats(7.0, 2.0)?);
            println!(
                "concat_strings(\"Hello, \", \"world\") = {}",
                basics::concat_strings("Hello, ", "world")
            );
            println!("toggle_boolean(true) = {}", basics::toggle_boolean(true));
            println!("{}", serde_json::to_string_pretty(&basics::sample_values())?);
        }
        Command::Primes { count } => {
            let primes = control::first_n_primes(count)?;
            println!("{primes:?}");
        }
        Command::Sum { n } => {
            println!("sum(1..={n}) = {}", control::sum_1_to_n(n)?);
        }
        Command::Discount { price, discount } => match (price, discount) {
            (Some(price), Some(discount)) => {
                println!("{:.2}", calculate_discount(price, discount)?);
            }
            _ => {
                for (price, discount) in DISCOUNT_EXAMPLES {
                    let total = calculate_discount(price, discount)?;
                    println!("price={price}, discount={discount}% -> {total:.2}");
                }
            }
        },
        Command::Books => {
            let books = collections::favorite_books();
            for book in collections::first_three_books(&books) {
                println!("{} by {}", book.title, book.author);
            }
        }
        Command::Student { name } => {
            let db = collections::student_db();
            let id = collections::get_student_id(&db, &name)
                .with_context(|| format!("no student named {name:?}"))?;
            println!("{name}: {id}");
        }
        Command::Words { path } => {
            let count = count_words_in_file(&path)?;
            println!("{}: {count} words", path.display());
        }
        Command::Repo { url } => {
            let info = GithubClient::new()?.fetch_repo_info(&url).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}
