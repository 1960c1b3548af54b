//! Folder transfers over real sockets against the in-process FTP server.

use std::fs;

use ftpmirror::{
    FolderTransfer, FtpClient, FtpConfig, ListingMode, PassiveMode, ProgressUpdate, TransferError,
    download, upload,
};
use test_support::FakeFtpServer;

fn connect(server: &FakeFtpServer, mode: PassiveMode) -> FtpClient {
    let config = FtpConfig::builder("127.0.0.1")
        .port(server.port())
        .credentials("mirror", "secret")
        .passive_mode(mode)
        .build();
    FtpClient::connect(&config).expect("connect")
}

fn nested_server(mlsd: bool) -> FakeFtpServer {
    FakeFtpServer::builder()
        .file("/pub/root/a.txt", b"hello")
        .file("/pub/root/sub/b.txt", b"abc")
        .mlsd(mlsd)
        .start()
}

#[test]
fn folder_download_over_structured_listing() {
    let server = nested_server(true);
    let mut client = connect(&server, PassiveMode::Extended);
    let local = tempfile::tempdir().unwrap();
    let mut updates = Vec::new();
    let mut handler = |update: &ProgressUpdate| updates.push(update.clone());

    let report = download(&mut client, "/pub/root", local.path(), Some(&mut handler)).unwrap();
    client.quit().unwrap();

    assert_eq!(report.expected_bytes(), 8);
    assert_eq!(report.transferred_bytes(), 8);
    assert_eq!(fs::read(local.path().join("root/a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(local.path().join("root/sub/b.txt")).unwrap(), b"abc");
    assert_eq!(updates.first().unwrap().current(), 0);
    assert_eq!(updates.last().unwrap().current(), 8);
    assert_eq!(server.count("CWD"), 0);
}

#[test]
fn folder_download_without_structured_listing() {
    let server = nested_server(false);
    let mut client = connect(&server, PassiveMode::Classic);
    let local = tempfile::tempdir().unwrap();

    let mut transfer = FolderTransfer::new(&mut client);
    let report = transfer.download("/pub/root", local.path(), None).unwrap();
    assert_eq!(transfer.listing_mode().unwrap(), ListingMode::Plain);
    assert_eq!(report.files(), 2);
    drop(transfer);

    assert_eq!(fs::read(local.path().join("root/sub/b.txt")).unwrap(), b"abc");
    assert_eq!(server.count("MLSD"), 1);
    assert_eq!(server.count("EPSV"), 0);
    assert_eq!(client.pwd().unwrap(), "/");
}

#[test]
fn plain_listing_server_refusing_empty_directories() {
    let server = FakeFtpServer::builder()
        .file("/pub/root/a.txt", b"hello")
        .dir("/pub/root/empty")
        .mlsd(false)
        .refuse_empty_nlst()
        .start();
    let mut client = connect(&server, PassiveMode::Extended);
    let local = tempfile::tempdir().unwrap();
    let mut last = None;
    let mut handler = |update: &ProgressUpdate| last = Some((update.current(), update.total()));

    let report = download(&mut client, "/pub/root", local.path(), Some(&mut handler)).unwrap();

    assert_eq!(report.transferred_bytes(), 5);
    assert_eq!(last, Some((5, 5)));
    assert!(local.path().join("root/empty").is_dir());
    assert_eq!(fs::read(local.path().join("root/a.txt")).unwrap(), b"hello");
}

#[test]
fn single_file_download_matches_reported_size() {
    let payload: Vec<u8> = (0..20_000_u32).map(|value| value as u8).collect();
    let server = FakeFtpServer::builder()
        .file("/pub/blob.bin", &payload)
        .start();
    let mut client = connect(&server, PassiveMode::Extended);
    let local = tempfile::tempdir().unwrap();
    let mut last = None;
    let mut handler = |update: &ProgressUpdate| last = Some((update.current(), update.total()));

    download(&mut client, "/pub/blob.bin", local.path(), Some(&mut handler)).unwrap();

    assert_eq!(last, Some((20_000, 20_000)));
    assert_eq!(fs::read(local.path().join("blob.bin")).unwrap(), payload);
}

#[test]
fn upload_creates_remote_tree() {
    let local = tempfile::tempdir().unwrap();
    let source = local.path().join("results");
    fs::create_dir_all(source.join("empty")).unwrap();
    fs::create_dir_all(source.join("nested")).unwrap();
    fs::write(source.join("nested/ten.bin"), [3_u8; 10]).unwrap();

    let server = FakeFtpServer::builder().dir("/incoming").start();
    let mut client = connect(&server, PassiveMode::Extended);
    let mut last = 0;
    let mut handler = |update: &ProgressUpdate| last = update.current();

    let report = upload(&mut client, &source, "/incoming", Some(&mut handler)).unwrap();

    assert_eq!(report.expected_bytes(), 10);
    assert_eq!(last, 10);
    assert!(server.is_dir("/incoming/results/empty"));
    assert_eq!(server.file("/incoming/results/nested/ten.bin"), Some(vec![3_u8; 10]));
}

#[test]
fn upload_twice_tolerates_existing_directories() {
    let local = tempfile::tempdir().unwrap();
    let source = local.path().join("results");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.txt"), b"first").unwrap();

    let server = FakeFtpServer::builder().start();
    let mut client = connect(&server, PassiveMode::Extended);
    let mut transfer = FolderTransfer::new(&mut client);

    transfer.upload(&source, "", None).unwrap();
    fs::write(source.join("a.txt"), b"second").unwrap();
    transfer.upload(&source, "", None).unwrap();

    assert_eq!(server.file("/results/a.txt"), Some(b"second".to_vec()));
    assert_eq!(server.count("MKD"), 2);
}

#[test]
fn empty_remote_folder_is_reported_as_not_found() {
    let server = FakeFtpServer::builder().dir("/pub/empty").start();
    let mut client = connect(&server, PassiveMode::Extended);
    let local = tempfile::tempdir().unwrap();

    let error = download(&mut client, "/pub/empty", local.path(), None).unwrap_err();
    assert!(matches!(error, TransferError::NotFound { .. }));
    assert_eq!(server.count("RETR"), 0);
}

#[test]
fn refused_upload_surfaces_the_server_reply() {
    let local = tempfile::tempdir().unwrap();
    let file = local.path().join("report.csv");
    fs::write(&file, b"a,b\n").unwrap();

    let server = FakeFtpServer::builder().dir("/ro").deny("STOR").start();
    let mut client = connect(&server, PassiveMode::Extended);

    let error = upload(&mut client, &file, "/ro", None).unwrap_err();
    let code = error.session_error().and_then(ftpmirror::SessionError::code);
    assert_eq!(code, Some(550));
}
