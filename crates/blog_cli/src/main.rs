use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use blog::seed::seed;
use blog::{logging, slugify, AuthService, BlogConfig, PostService};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage blog posts and check admin login", long_about = None)]
struct Args {
    /// JSON-lines post file; posts stay in memory when omitted
    #[arg(long, global = true, env = "BLOG_DATA_PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace all posts with the sample set
    Seed,
    /// Print post summaries, newest first
    List,
    /// Print the slug a title normalizes to
    Slug { title: String },
    /// Check credentials against ADMIN_EMAIL / ADMIN_PASSWORD
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let mut config = BlogConfig::from_env().context("reading configuration")?;
    logging::init(config.log_filter.as_deref());
    if args.data.is_some() {
        config.data_path = args.data;
    }

    match args.command {
        Command::Seed => {
            let posts = PostService::new(config.open_store().context("opening post store")?);
            for post in seed(&posts)? {
                println!("- {} (slug: {})", post.title, post.slug);
            }
        }
        Command::List => {
            let posts = PostService::new(config.open_store().context("opening post store")?);
            for summary in posts.summaries()? {
                println!(
                    "{}  {} ({} min read)\n    {}",
                    summary.published_on, summary.title, summary.reading_time_minutes, summary.slug
                );
            }
        }
        Command::Slug { title } => {
            let slug = slugify(&title);
            if slug.is_empty() {
                eprintln!("title produces no usable slug");
                return Ok(ExitCode::FAILURE);
            }
            println!("{slug}");
        }
        Command::Login { email, password } => {
            let auth = AuthService::new(config.admin.clone(), Arc::new(config.session_store()))
                .with_secure_cookies(config.secure_cookies);
            match auth.login(&email, &password) {
                Ok(outcome) => {
                    println!("Set-Cookie: {}", outcome.set_cookie);
                }
                Err(error) => {
                    tracing::debug!(%error, "login check failed");
                    eprintln!("{error}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
