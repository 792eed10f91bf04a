use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use hobbymatch_client::feed::types::{HobbyId, PostId, ReactionKind};
use hobbymatch_client::{
    AuthToken, DataApiClient, FeedConfig, FeedOrchestrator, FeedPhase, FeedView, HttpFeedApi,
    ImageUpload, Session, WsPushChannel,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the data service.
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,

    /// Push channel endpoint.
    #[arg(long, default_value = "ws://localhost:8000/ws/feed")]
    push_url: String,

    /// Identity-provider credential for authenticated operations.
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream the live feed to the terminal.
    Watch {
        /// Snapshot re-fetch interval in seconds.
        #[arg(long, default_value_t = 30)]
        refresh_secs: u64,

        /// Deactivate after this many seconds instead of running until the
        /// process is killed.
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Create a post.
    Post {
        content: String,

        #[arg(long)]
        hobby_id: Option<Uuid>,

        /// Path to an image to attach.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Comment on a post.
    Comment { post_id: Uuid, content: String },
    /// React to a post (like, love, fire, laugh, sad).
    React { post_id: Uuid, kind: String },
    /// List the hobby catalog.
    Hobbies,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let session = args
        .token
        .clone()
        .map(|raw| Session::sign_in(AuthToken::new(raw)));

    match &args.command {
        Command::Watch {
            refresh_secs,
            duration_secs,
        } => run_watch(&args, session, *refresh_secs, *duration_secs),
        Command::Post {
            content,
            hobby_id,
            image,
        } => run_post(&args, session, content, *hobby_id, image.as_deref()),
        Command::Comment { post_id, content } => run_comment(&args, session, *post_id, content),
        Command::React { post_id, kind } => run_react(&args, session, *post_id, kind),
        Command::Hobbies => run_hobbies(&args),
    }
}

// =====================================================================
// watch
// =====================================================================

fn run_watch(
    args: &Args,
    session: Option<Session>,
    refresh_secs: u64,
    duration_secs: Option<u64>,
) -> Result<()> {
    let session = session.ok_or_else(|| anyhow!("--token is required to open the push channel"))?;

    println!("[WATCH] Connecting to {} ...", args.api_url);
    let client = DataApiClient::new(&args.api_url, Some(session.clone()))?;
    let api = HttpFeedApi::new(client);
    let push = WsPushChannel::open(&args.push_url, &session);

    let config = FeedConfig {
        refresh_interval: Duration::from_secs(refresh_secs),
        ..FeedConfig::default()
    };

    let mut orchestrator = FeedOrchestrator::new(api, push, config);
    let handle = orchestrator.handle();
    orchestrator.subscribe(print_view);

    let worker = std::thread::spawn(move || orchestrator.run());

    if let Some(secs) = duration_secs {
        std::thread::sleep(Duration::from_secs(secs));
        println!("[WATCH] Deactivating feed view...");
        handle.deactivate();
    }

    worker
        .join()
        .map_err(|_| anyhow!("feed worker panicked"))?;
    Ok(())
}

fn print_view(view: &FeedView) {
    println!();
    println!("==================================================");
    match view.phase {
        FeedPhase::Loading => println!("Loading feed..."),
        FeedPhase::Error => println!(
            "Feed unavailable: {}",
            view.error.as_deref().unwrap_or("unknown error")
        ),
        FeedPhase::Ready => {
            if view.is_empty() {
                println!("No posts to display.");
            } else {
                for post in &view.posts {
                    print_post(view, post);
                }
            }
        }
    }
    println!("==================================================");
}

fn print_post(view: &FeedView, post: &hobbymatch_client::feed::types::Post) {
    println!("--------------------------------------------------");
    println!(
        "@{} · {} · {}",
        post.name,
        view.hobby_name(post),
        post.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("{}", post.content);
    if let Some(image_url) = &post.image_url {
        println!("[image] {image_url}");
    }

    let mut reactions = String::new();
    for kind in ReactionKind::ALL {
        if let Some(count) = post.reaction_counts.get(&kind) {
            if *count > 0 {
                reactions.push_str(&format!("{} {}  ", kind.emoji(), count));
            }
        }
    }
    if !reactions.is_empty() {
        println!("{reactions}");
    }
    println!("{} comment(s)", post.comment_count);
}

// =====================================================================
// one-shot mutations
// =====================================================================

fn authenticated_client(args: &Args, session: Option<Session>) -> Result<DataApiClient> {
    let session = session.ok_or_else(|| anyhow!("--token is required for this command"))?;
    Ok(DataApiClient::new(&args.api_url, Some(session))?)
}

fn run_post(
    args: &Args,
    session: Option<Session>,
    content: &str,
    hobby_id: Option<Uuid>,
    image: Option<&Path>,
) -> Result<()> {
    let client = authenticated_client(args, session)?;

    let image = match image {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading image {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            let content_type = guess_content_type(&file_name).to_string();
            Some(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.into(),
            })
        }
        None => None,
    };

    let rt = tokio::runtime::Runtime::new()?;
    let post = rt.block_on(client.create_post(content, hobby_id.map(HobbyId), image))?;

    println!("Created post {}", post.id);
    Ok(())
}

fn run_comment(args: &Args, session: Option<Session>, post_id: Uuid, content: &str) -> Result<()> {
    let client = authenticated_client(args, session)?;

    let rt = tokio::runtime::Runtime::new()?;
    let comment = rt.block_on(client.add_comment(PostId(post_id), content))?;

    println!("Added comment {} to post {}", comment.id, comment.post_id);
    Ok(())
}

fn run_react(args: &Args, session: Option<Session>, post_id: Uuid, kind: &str) -> Result<()> {
    let kind: ReactionKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let client = authenticated_client(args, session)?;

    let rt = tokio::runtime::Runtime::new()?;
    let counts = rt.block_on(client.add_reaction(PostId(post_id), kind))?;

    println!("Reacted with {} {}", kind.emoji(), kind);
    for reaction in ReactionKind::ALL {
        if let Some(count) = counts.get(&reaction) {
            println!("  {:<6} {}", reaction.to_string(), count);
        }
    }
    Ok(())
}

fn run_hobbies(args: &Args) -> Result<()> {
    // Catalog reads are public; no session required.
    let client = DataApiClient::new(&args.api_url, None)?;

    let rt = tokio::runtime::Runtime::new()?;
    let hobbies = rt.block_on(client.fetch_hobbies())?;

    println!("{:<30} | {:<15} | {}", "Name", "Category", "Id");
    println!("--------------------------------------------------");
    for hobby in hobbies {
        println!("{:<30} | {:<15} | {}", hobby.name, hobby.category.to_string(), hobby.id);
    }
    Ok(())
}

fn guess_content_type(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
