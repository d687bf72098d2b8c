//! Command-line client for the PromptDeck API.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use promptdeck_client::{HttpApi, PromptCache};
use promptdeck_core::models::{CreatePromptRequest, UpdatePromptRequest};
use promptdeck_core::view::{SortDirection, SortField};
use promptdeck_core::DEFAULT_SERVER_URL;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdeck", about = "PromptDeck CLI", version)]
struct Cli {
    /// Server URL (can also be set via PD_SERVER env var)
    #[arg(short, long, env = "PD_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Updated,
    Title,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List prompts, filtered and sorted like the app's sidebar
    List {
        /// Only favorites
        #[arg(long)]
        favorites: bool,
        /// Only prompts in this folder (by name)
        #[arg(long, conflicts_with_all = ["favorites", "tag"])]
        folder: Option<String>,
        /// Only prompts carrying this tag (by name)
        #[arg(long, conflicts_with = "favorites")]
        tag: Option<String>,
        /// Substring search over title, content, and tag names
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Sort key
        #[arg(long, value_enum, default_value = "updated")]
        sort: SortKey,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Print one prompt's content (or the full record with --json)
    Get { id: String },
    /// Create a prompt; content comes from --file or stdin
    New {
        title: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Folder to file it under (by name)
        #[arg(long)]
        folder: Option<String>,
        /// Tags to attach (by name, repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(long)]
        favorite: bool,
    },
    /// Update fields of an existing prompt
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Replace the content from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Move to this folder (by name); an empty value unfiles it
        #[arg(long)]
        folder: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Toggle a prompt's favorite flag
    Fav {
        id: String,
    },
    /// Manage folders
    Folders {
        #[command(subcommand)]
        command: CollectionCommand,
    },
    /// Manage tags
    Tags {
        #[command(subcommand)]
        command: CollectionCommand,
    },
    /// Write a backup document to a file (or stdout)
    Export {
        file: Option<PathBuf>,
    },
    /// Re-create records from a backup document
    Import {
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum CollectionCommand {
    Ls,
    Add { name: String },
    Rename { id: String, name: String },
    Rm { id: String },
}

fn exit_with_cache_error(action: &str, error: Option<&str>) -> ! {
    eprintln!(
        "{} failed: {}",
        action,
        error.unwrap_or("unknown error")
    );
    std::process::exit(1);
}

fn content_from(file: Option<PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn folder_id_by_name(cache: &PromptCache<HttpApi>, name: &str) -> Option<String> {
    cache
        .folders
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.id.clone())
}

fn tag_id_by_name(cache: &PromptCache<HttpApi>, name: &str) -> Option<String> {
    cache
        .tags
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.id.clone())
}

async fn loaded_cache(server: &str) -> PromptCache<HttpApi> {
    let mut cache = PromptCache::new(HttpApi::new(server));
    if !cache.fetch_data().await {
        exit_with_cache_error("Fetch", cache.error.as_deref());
    }
    cache
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before any request"),
        Commands::List {
            favorites,
            folder,
            tag,
            search,
            sort,
            asc,
            limit,
        } => {
            let mut cache = loaded_cache(&server).await;
            if favorites {
                cache.set_show_favorites(true);
            }
            if let Some(name) = folder {
                let Some(id) = folder_id_by_name(&cache, &name) else {
                    eprintln!("List failed: no folder named '{}'", name);
                    std::process::exit(1);
                };
                cache.select_folder(Some(id));
            }
            if let Some(name) = tag {
                let Some(id) = tag_id_by_name(&cache, &name) else {
                    eprintln!("List failed: no tag named '{}'", name);
                    std::process::exit(1);
                };
                cache.select_tag(Some(id));
            }
            if let Some(query) = search {
                cache.set_search_query(query);
            }
            cache.view.sort_field = match sort {
                SortKey::Updated => SortField::UpdatedAt,
                SortKey::Title => SortField::Title,
            };
            cache.view.sort_direction = if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            };

            let visible = cache.visible_prompts();
            let page = &visible[..visible.len().min(limit)];
            if json {
                println!("{}", serde_json::to_string_pretty(page)?);
            } else {
                for prompt in page {
                    let marker = if prompt.is_favorite { "*" } else { " " };
                    println!("{:<36} {} {:<30}", prompt.id, marker, prompt.title);
                }
            }
        }
        Commands::Get { id } => {
            let cache = loaded_cache(&server).await;
            let Some(prompt) = cache.prompt(&id) else {
                eprintln!("Get failed: no prompt with id '{}'", id);
                std::process::exit(1);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(prompt)?);
            } else {
                println!("{}", prompt.content);
            }
        }
        Commands::New {
            title,
            file,
            folder,
            tag,
            favorite,
        } => {
            let content = content_from(file)?;
            let mut cache = loaded_cache(&server).await;

            let folder_id = match folder {
                Some(name) => match folder_id_by_name(&cache, &name) {
                    Some(id) => Some(id),
                    None => {
                        eprintln!("New failed: no folder named '{}'", name);
                        std::process::exit(1);
                    }
                },
                None => None,
            };
            let mut tag_ids = Vec::with_capacity(tag.len());
            for name in &tag {
                let Some(id) = tag_id_by_name(&cache, name) else {
                    eprintln!("New failed: no tag named '{}'", name);
                    std::process::exit(1);
                };
                tag_ids.push(id);
            }

            let created = cache
                .add_prompt(CreatePromptRequest {
                    title,
                    content,
                    folder_id,
                    tags: tag_ids,
                    is_favorite: favorite,
                    ..CreatePromptRequest::default()
                })
                .await;
            let Some(prompt) = created else {
                exit_with_cache_error("New", cache.error.as_deref());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&prompt)?);
            } else {
                println!("Created: {} ({})", prompt.title, prompt.id);
            }
        }
        Commands::Edit {
            id,
            title,
            file,
            folder,
        } => {
            let mut cache = loaded_cache(&server).await;
            let content = match file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => None,
            };
            let folder_id = match folder {
                Some(name) if name.is_empty() => Some(String::new()),
                Some(name) => match folder_id_by_name(&cache, &name) {
                    Some(id) => Some(id),
                    None => {
                        eprintln!("Edit failed: no folder named '{}'", name);
                        std::process::exit(1);
                    }
                },
                None => None,
            };
            let updates = UpdatePromptRequest {
                title,
                content,
                folder_id,
                ..UpdatePromptRequest::default()
            };
            if !cache.update_prompt(&id, updates).await {
                exit_with_cache_error("Edit", cache.error.as_deref());
            }
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(cache.prompt(&id).ok_or("prompt vanished")?)?
                );
            } else {
                println!("Updated: {}", id);
            }
        }
        Commands::Delete { id } => {
            let mut cache = loaded_cache(&server).await;
            if !cache.delete_prompt(&id).await {
                exit_with_cache_error("Delete", cache.error.as_deref());
            }
            println!("Deleted prompt: {}", id);
        }
        Commands::Fav { id } => {
            let mut cache = loaded_cache(&server).await;
            if !cache.toggle_favorite(&id).await {
                match cache.error.as_deref() {
                    Some(error) => exit_with_cache_error("Fav", Some(error)),
                    None => {
                        eprintln!("Fav failed: no prompt with id '{}'", id);
                        std::process::exit(1);
                    }
                }
            }
            let favored = cache.prompt(&id).map(|p| p.is_favorite).unwrap_or(false);
            println!(
                "{}: {}",
                if favored { "Favorited" } else { "Unfavorited" },
                id
            );
        }
        Commands::Folders { command } => {
            let mut cache = loaded_cache(&server).await;
            match command {
                CollectionCommand::Ls => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&cache.folders)?);
                    } else {
                        for folder in &cache.folders {
                            println!("{:<36} {:<30}", folder.id, folder.name);
                        }
                    }
                }
                CollectionCommand::Add { name } => {
                    let Some(folder) = cache.add_folder(&name).await else {
                        exit_with_cache_error("Folders add", cache.error.as_deref());
                    };
                    println!("Created: {} ({})", folder.name, folder.id);
                }
                CollectionCommand::Rename { id, name } => {
                    if !cache.update_folder(&id, &name).await {
                        exit_with_cache_error("Folders rename", cache.error.as_deref());
                    }
                    println!("Renamed: {}", id);
                }
                CollectionCommand::Rm { id } => {
                    if !cache.delete_folder(&id).await {
                        exit_with_cache_error("Folders rm", cache.error.as_deref());
                    }
                    println!("Deleted folder: {}", id);
                }
            }
        }
        Commands::Tags { command } => {
            let mut cache = loaded_cache(&server).await;
            match command {
                CollectionCommand::Ls => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&cache.tags)?);
                    } else {
                        for tag in &cache.tags {
                            println!("{:<36} {:<30}", tag.id, tag.name);
                        }
                    }
                }
                CollectionCommand::Add { name } => {
                    let Some(tag) = cache.add_tag(&name).await else {
                        exit_with_cache_error("Tags add", cache.error.as_deref());
                    };
                    println!("Created: {} ({})", tag.name, tag.id);
                }
                CollectionCommand::Rename { id, name } => {
                    if !cache.update_tag(&id, &name).await {
                        exit_with_cache_error("Tags rename", cache.error.as_deref());
                    }
                    println!("Renamed: {}", id);
                }
                CollectionCommand::Rm { id } => {
                    if !cache.delete_tag(&id).await {
                        exit_with_cache_error("Tags rm", cache.error.as_deref());
                    }
                    println!("Deleted tag: {}", id);
                }
            }
        }
        Commands::Export { file } => {
            let cache = loaded_cache(&server).await;
            let document = cache.export_document().to_json_pretty()?;
            match file {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    eprintln!("Exported to {}", path.display());
                }
                None => println!("{}", document),
            }
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let mut cache = loaded_cache(&server).await;
            let Some(report) = cache.import_document(&raw).await else {
                exit_with_cache_error("Import", cache.error.as_deref());
            };
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "foldersCreated": report.folders_created,
                        "tagsCreated": report.tags_created,
                        "promptsCreated": report.prompts_created,
                        "recordsSkipped": report.records_skipped,
                        "completed": report.completed,
                    })
                );
            } else {
                println!(
                    "Imported {} prompts, {} folders, {} tags ({} skipped)",
                    report.prompts_created,
                    report.folders_created,
                    report.tags_created,
                    report.records_skipped
                );
            }
            if !report.completed {
                exit_with_cache_error("Import", cache.error.as_deref());
            }
        }
    }

    Ok(())
}
