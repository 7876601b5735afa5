use fieldbook_api::storage::blob::{BlobStore, LocalBlobStore};
use fieldbook_core::errors::ServiceError;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[tokio::test]
async fn local_store_writes_below_its_root() {
    let dir = tempdir().expect("temp dir");
    let store = LocalBlobStore::new(dir.path(), "http://cdn.test/uploads/");

    let url = store
        .upload("images/20240515083000-court.png", vec![1, 2, 3])
        .await
        .expect("upload succeeds");

    assert_eq!(url, "http://cdn.test/uploads/images/20240515083000-court.png");
    let written = tokio::fs::read(dir.path().join("images/20240515083000-court.png"))
        .await
        .expect("file exists");
    assert_eq!(written, vec![1, 2, 3]);
}

#[tokio::test]
async fn local_store_refuses_paths_leaving_its_root() {
    let dir = tempdir().expect("temp dir");
    let store = LocalBlobStore::new(dir.path(), "http://cdn.test/uploads");

    for name in ["../escape.png", "/etc/passwd", ""] {
        let result = store.upload(name, vec![0]).await;
        assert!(
            matches!(result, Err(ServiceError::UploadRejected(_))),
            "{name:?} should be refused"
        );
    }
}
