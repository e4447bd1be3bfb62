use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;
use docserver_client::{Bootstrap, RemoteRepository, ServerHandle};
use docserver_repository::{DocumentationRepository, InMemoryRepository};
use docserver_server::DocServer;
use docserver_types::{Bundle, BundleId, BundleQuery, Url};
use tokio::signal;

use crate::cli::*;
use crate::discovery::{discover_bundle, discover_bundles};

/// The level to initialise logging with: `--log-level`, else the level from
/// a `run --config` file, else `info`.
pub fn log_level(cli: &Cli) -> anyhow::Result<tracing::Level> {
    if let Some(level) = cli.log_level {
        return Ok(level);
    }
    match &cli.command {
        Command::Run(args) if args.config.is_some() => {
            let config = args.server_config()?;
            config
                .log_level
                .parse()
                .with_context(|| format!("invalid log level '{}'", config.log_level))
        }
        _ => Ok(tracing::Level::INFO),
    }
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args).await,
        Command::Repo(args) => cmd_repo(args).await,
    }
}

async fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.server_config()?;
    println!("{} Serving documentation at {}", "✓".green().bold(), config.base_url().bold());
    DocServer::with_repository(config, InMemoryRepository::new())
        .serve_with_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn cmd_repo(args: RepoArgs) -> anyhow::Result<()> {
    let handle = connect(&args.server).await?;
    let repository = handle.repository();
    repo_action(&repository, args.action).await?;

    if handle.is_launched() {
        println!(
            "Server still running at {} (ctrl-c to stop)",
            handle.base_url().as_str().bold()
        );
        handle.wait().await.map_err(|e| anyhow!(e))?;
    }
    Ok(())
}

/// Launch a server when `--run` is given, otherwise attach to a running one.
async fn connect(server: &ServerArgs) -> anyhow::Result<ServerHandle> {
    let config = server.server_config();
    let base_url = Url::parse(&config.base_url())
        .with_context(|| format!("invalid server address {}", config.bind_addr()))?;
    let bootstrap = Bootstrap::new(base_url.clone());

    let handle = if server.run {
        println!("Booting server at {}", base_url.as_str().bold());
        let server = DocServer::with_repository(config, InMemoryRepository::new());
        bootstrap.launch(server.serve_with_shutdown(shutdown_signal())).await
    } else {
        println!("Trying to reach server at {}", base_url.as_str().bold());
        bootstrap.attach().await
    };
    handle.with_context(|| format!("no documentation server at {base_url}"))
}

async fn repo_action(repository: &RemoteRepository, action: RepoAction) -> anyhow::Result<()> {
    match action {
        RepoAction::Add { archive, display_name, identifier, tag } => {
            let bundle =
                add_bundle_at(repository, archive.as_deref(), display_name, identifier, &tag).await?;
            print_added(&bundle);
            Ok(())
        }
        RepoAction::Import { dir, tag } => cmd_import(repository, &dir, &tag).await,
        RepoAction::List { search } => cmd_list(repository, search).await,
        RepoAction::Show { id } => cmd_show(repository, id).await,
        RepoAction::Remove { id } => {
            repository.remove_bundle(id).await?;
            println!("{} Removed bundle {}", "✓".green(), id.to_string().yellow());
            Ok(())
        }
        RepoAction::Tag { id, tag, source } => {
            let revision = repository.add_revision(&tag, source_url(&source)?, id).await?;
            println!(
                "{} Tagged {} as {} → {}",
                "✓".green(),
                id.to_string().yellow(),
                revision.tag.bold(),
                revision.source.as_str().blue()
            );
            Ok(())
        }
        RepoAction::Untag { id, tag } => {
            repository.remove_revision(&tag, id).await?;
            println!("{} Removed tag {} from {}", "✓".green(), tag.bold(), id.to_string().yellow());
            Ok(())
        }
    }
}

/// Add a bundle, reading missing names from the archive, and attach the
/// archive as revision `tag` when one is given.
pub async fn add_bundle_at<R>(
    repository: &R,
    archive: Option<&Path>,
    display_name: Option<String>,
    identifier: Option<String>,
    tag: &str,
) -> anyhow::Result<Bundle>
where
    R: DocumentationRepository + ?Sized,
{
    let (display_name, identifier) = match (display_name, identifier) {
        (Some(name), Some(identifier)) => (name, identifier),
        (name, identifier) => {
            let archive = archive
                .context("specify either an archive, or --display-name and --identifier")?;
            let found = discover_bundle(archive)?;
            (
                name.unwrap_or(found.display_name),
                identifier.unwrap_or(found.bundle_identifier),
            )
        }
    };

    let created = repository.add_bundle(&display_name, &identifier).await?;
    if let Some(archive) = archive {
        repository.add_revision(tag, file_url(archive)?, created.id).await?;
    }

    repository
        .bundle(created.id)
        .await?
        .with_context(|| format!("bundle {} disappeared after it was added", created.id))
}

async fn cmd_import(repository: &RemoteRepository, dir: &Path, tag: &str) -> anyhow::Result<()> {
    let found = discover_bundles(dir)?;
    println!("Importing {} bundles from {}", found.len().to_string().bold(), dir.display());
    for archive in found {
        let bundle = add_bundle_at(
            repository,
            Some(&archive.path),
            Some(archive.display_name),
            Some(archive.bundle_identifier),
            tag,
        )
        .await?;
        print_added(&bundle);
    }
    Ok(())
}

async fn cmd_list(repository: &RemoteRepository, search: Option<String>) -> anyhow::Result<()> {
    let mut bundles = repository.search(&BundleQuery::new(search)).await?;
    if bundles.is_empty() {
        println!("No bundles.");
        return Ok(());
    }
    bundles.sort_by(|a, b| a.display_name().cmp(b.display_name()).then(a.id.cmp(&b.id)));
    for bundle in &bundles {
        let tags = if bundle.revisions.is_empty() {
            String::new()
        } else {
            format!("  [{}]", bundle.revisions.join(", "))
        };
        println!(
            "{}  {}  {}{}",
            bundle.id.to_string().yellow(),
            bundle.display_name().bold(),
            bundle.bundle_identifier().dimmed(),
            tags.cyan()
        );
    }
    Ok(())
}

async fn cmd_show(repository: &RemoteRepository, id: BundleId) -> anyhow::Result<()> {
    let bundle = repository
        .bundle(id)
        .await?
        .with_context(|| format!("no bundle with id {id}"))?;
    println!("Bundle {}", bundle.id.to_string().yellow().bold());
    println!("  displayName: {}", bundle.display_name().bold());
    println!("  bundleIdentifier: {}", bundle.bundle_identifier());

    let mut tags = bundle.revisions.clone();
    tags.sort();
    if tags.is_empty() {
        println!("  No revisions.");
    }
    for tag in tags {
        match repository.revision(&tag, id).await? {
            Some(revision) => println!("  {} → {}", revision.tag.cyan(), revision.source.as_str().blue()),
            None => println!("  {} (removed)", tag.dimmed()),
        }
    }
    Ok(())
}

fn print_added(bundle: &Bundle) {
    println!("{} Added bundle", "✓".green().bold());
    println!("  id={}", bundle.id.to_string().yellow());
    println!("  displayName='{}'", bundle.display_name());
    println!("  bundleIdentifier='{}'", bundle.bundle_identifier());
}

fn file_url(path: &Path) -> anyhow::Result<Url> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| anyhow!("cannot express {} as a file url", absolute.display()))
}

/// Parse a revision source: a URL as is, anything else as a local path.
fn source_url(source: &str) -> anyhow::Result<Url> {
    match Url::parse(source) {
        Ok(url) => Ok(url),
        Err(_) => file_url(Path::new(source)),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
