//! Repository behaviour shared by every implementation.
//!
//! Each check is written once against [`DocumentationRepository`] and run
//! against both the in-memory store and a [`RemoteRepository`] talking to a
//! live server on a loopback port.

use std::sync::Arc;

use docserver_repository::{DocumentationRepository, InMemoryRepository, RepositoryError};
use docserver_server::{DocServer, ServerConfig};
use docserver_types::{BundleId, BundleQuery, TypeError, Url};
use tokio::net::TcpListener;

use crate::remote::RemoteRepository;

async fn remote() -> RemoteRepository {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = DocServer::with_repository(ServerConfig::default(), InMemoryRepository::new());
    tokio::spawn(server.serve_on(listener, std::future::pending()));
    RemoteRepository::new(Url::parse(&format!("http://{addr}")).unwrap())
}

fn source(path: &str) -> Url {
    Url::parse(&format!("file:///docs/{path}")).unwrap()
}

async fn round_trip<R: DocumentationRepository>(repo: &R) {
    let created = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();
    assert_eq!(created.display_name(), "DocumentationKit");
    assert_eq!(created.bundle_identifier(), "com.example.DocumentationKit");
    assert!(created.revisions.is_empty());

    let fetched = repo.bundle(created.id).await.unwrap();
    assert_eq!(fetched, Some(created));
}

async fn listing<R: DocumentationRepository>(repo: &R) {
    let other = repo.add_bundle("OtherKit", "com.example.OtherKit").await.unwrap();
    let kit = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();

    let mut listed = repo.bundles().await.unwrap();
    listed.sort_by(|a, b| a.display_name().cmp(b.display_name()));
    assert_eq!(listed, vec![kit, other]);
}

async fn deletion<R: DocumentationRepository>(repo: &R) {
    let b = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();
    repo.add_revision("1.0.0", source("kit"), b.id).await.unwrap();

    repo.remove_bundle(b.id).await.unwrap();
    assert_eq!(repo.bundle(b.id).await.unwrap(), None);
    assert_eq!(repo.revision("1.0.0", b.id).await.unwrap(), None);
    assert!(repo.bundles().await.unwrap().is_empty());

    // Removing again is not an error.
    repo.remove_bundle(b.id).await.unwrap();
}

async fn revision_upsert<R: DocumentationRepository>(repo: &R) {
    let b = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();

    let first = repo.add_revision("latest", source("v1"), b.id).await.unwrap();
    assert_eq!(first.bundle_id, b.id);
    assert_eq!(repo.revision("latest", b.id).await.unwrap(), Some(first.clone()));

    let second = repo.add_revision("latest", source("v2"), b.id).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(repo.revision("latest", b.id).await.unwrap(), Some(second));

    let bundle = repo.bundle(b.id).await.unwrap().unwrap();
    assert_eq!(bundle.revisions, vec!["latest".to_string()]);
}

async fn revision_removal<R: DocumentationRepository>(repo: &R) {
    let b = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();
    repo.add_revision("1.0.0", source("v1"), b.id).await.unwrap();
    repo.add_revision("2.0.0", source("v2"), b.id).await.unwrap();

    repo.remove_revision("1.0.0", b.id).await.unwrap();
    assert_eq!(repo.revision("1.0.0", b.id).await.unwrap(), None);
    assert!(repo.revision("2.0.0", b.id).await.unwrap().is_some());
    assert_eq!(repo.revision("unknown", b.id).await.unwrap(), None);

    repo.remove_revision("1.0.0", b.id).await.unwrap();
    repo.remove_revision("1.0.0", BundleId::new()).await.unwrap();
}

async fn unaddressable_tags<R: DocumentationRepository>(repo: &R) {
    let b = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();
    let kept = repo.add_revision("1.0.0", source("v1"), b.id).await.unwrap();

    for tag in ["", ".", ".."] {
        let err = repo.add_revision(tag, source("v2"), b.id).await.unwrap_err();
        assert!(
            matches!(err, RepositoryError::Invalid(TypeError::InvalidTag { .. })),
            "tag {tag:?}: {err:?}"
        );
        assert_eq!(repo.revision(tag, b.id).await.unwrap(), None);
        repo.remove_revision(tag, b.id).await.unwrap();
    }

    let bundle = repo.bundle(b.id).await.unwrap().unwrap();
    assert_eq!(bundle.revisions, vec!["1.0.0".to_string()]);
    assert_eq!(repo.revision("1.0.0", b.id).await.unwrap(), Some(kept));
}

async fn search<R: DocumentationRepository>(repo: &R) {
    repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();

    for term in ["Docu", "documentationkit", "docu", "kit", "ki"] {
        let hits = repo.search(&BundleQuery::term(term)).await.unwrap();
        assert_eq!(hits.len(), 1, "term {term:?}");
    }
    assert_eq!(repo.search(&BundleQuery::all()).await.unwrap().len(), 1);
    assert!(repo.search(&BundleQuery::term("inval")).await.unwrap().is_empty());
}

async fn concurrent_creation<R: DocumentationRepository + 'static>(repo: Arc<R>) {
    const N: usize = 32;
    let handles: Vec<_> = (0..N)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.add_bundle(&format!("Kit{i}"), &format!("com.example.kit{i}")).await.unwrap()
            })
        })
        .collect();

    let mut ids = Vec::with_capacity(N);
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), N);
    assert_eq!(repo.bundles().await.unwrap().len(), N);
}

async fn unknown_bundle<R: DocumentationRepository>(repo: &R) {
    let id = BundleId::new();
    assert_eq!(repo.bundle(id).await.unwrap(), None);

    let err = repo.add_revision("1.0.0", source("x"), id).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

async fn update_is_not_available<R: DocumentationRepository>(repo: &R) -> RepositoryError {
    let b = repo.add_bundle("DocumentationKit", "com.example.DocumentationKit").await.unwrap();
    let err = repo.update_bundle(b.id, Some("Renamed".into())).await.unwrap_err();
    assert_eq!(repo.bundle(b.id).await.unwrap().unwrap().display_name(), "DocumentationKit");
    err
}

macro_rules! conformance {
    ($($check:ident),* $(,)?) => {
        mod in_memory {
            use super::InMemoryRepository;
            $(
                #[tokio::test]
                async fn $check() {
                    super::$check(&InMemoryRepository::new()).await;
                }
            )*
        }

        mod remote {
            $(
                #[tokio::test]
                async fn $check() {
                    super::$check(&super::remote().await).await;
                }
            )*
        }
    };
}

conformance!(
    round_trip,
    listing,
    deletion,
    revision_upsert,
    revision_removal,
    search,
    unknown_bundle,
    unaddressable_tags,
);

#[tokio::test]
async fn concurrent_creation_in_memory() {
    concurrent_creation(Arc::new(InMemoryRepository::new())).await;
}

#[tokio::test]
async fn concurrent_creation_remote() {
    concurrent_creation(Arc::new(remote().await)).await;
}

#[tokio::test]
async fn update_in_memory_is_not_implemented() {
    let err = update_is_not_available(&InMemoryRepository::new()).await;
    assert!(matches!(err, RepositoryError::NotImplemented { .. }));
}

#[tokio::test]
async fn update_remote_is_service_unavailable() {
    let err = update_is_not_available(&remote().await).await;
    assert!(matches!(err, RepositoryError::Status { status: 503, detail: None }));
}
