//! Blob documents on separate replicas exchanging `yrs` updates.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ydoc_core::{BlobDocument, DocumentKind, DocumentNode, DocumentOptions, YDocument};

fn sync(from: &BlobDocument, to: &BlobDocument) {
    let state_vector = to.base().state_vector().unwrap();
    let update = from
        .base()
        .encode_state_as_update(Some(&state_vector))
        .unwrap();
    to.base().apply_update(&update).unwrap();
}

#[test]
fn test_content_reaches_other_replica() {
    let alice = BlobDocument::new();
    let bob = BlobDocument::new();

    alice.set(b"\x00\x01\xff").unwrap();
    sync(&alice, &bob);

    assert_eq!(bob.get().unwrap(), vec![0x00, 0x01, 0xff]);
    assert_eq!(bob.get_base64().unwrap(), "AAH/");
}

#[test]
fn test_full_state_update() {
    let alice = BlobDocument::new();
    alice.set(b"snapshot").unwrap();
    alice.base().set_path("blob.bin").unwrap();

    let update = alice.base().encode_state_as_update(None).unwrap();
    let bob = BlobDocument::new();
    bob.base().apply_update(&update).unwrap();

    assert_eq!(bob.get().unwrap(), b"snapshot");
    assert_eq!(bob.base().path().unwrap().as_deref(), Some("blob.bin"));
}

#[test]
fn test_remote_update_notifies_observer() {
    let alice = BlobDocument::new();
    let mut bob = BlobDocument::new();

    let source_calls = Arc::new(AtomicUsize::new(0));
    let state_calls = Arc::new(AtomicUsize::new(0));
    let (source, state) = (source_calls.clone(), state_calls.clone());
    bob.observe(move |node, _change| match node {
        DocumentNode::Source => {
            source.fetch_add(1, Ordering::SeqCst);
        }
        DocumentNode::State => {
            state.fetch_add(1, Ordering::SeqCst);
        }
    });

    alice.set(b"remote").unwrap();
    sync(&alice, &bob);

    assert_eq!(source_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state_calls.load(Ordering::SeqCst), 0);
    assert_eq!(bob.get().unwrap(), b"remote");
}

#[test]
fn test_concurrent_sets_converge() {
    let alice = BlobDocument::new();
    let bob = BlobDocument::new();

    alice.set(b"from alice").unwrap();
    bob.set(b"from bob").unwrap();

    sync(&alice, &bob);
    sync(&bob, &alice);

    let merged = alice.get().unwrap();
    assert_eq!(merged, bob.get().unwrap());
    assert!(merged == b"from alice" || merged == b"from bob");
}

#[test]
fn test_version_independent_of_content() {
    let mut document = DocumentKind::Blob
        .create(None, DocumentOptions::default())
        .into_blob()
        .unwrap();
    assert_eq!(document.version(), "1.0.0");

    for payload in [&b""[..], b"a", b"\xff\xfe", b"longer payload"] {
        document.set(payload).unwrap();
        assert_eq!(document.version(), "1.0.0");
        assert_eq!(YDocument::version(&document), "1.0.0");
    }
    YDocument::unobserve(&mut document);
}

#[test]
fn test_round_trip_many_lengths() {
    let blob = BlobDocument::new();
    for len in 0..64usize {
        let payload: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
        blob.set(payload.clone()).unwrap();
        assert_eq!(blob.get().unwrap(), payload, "length {len}");
    }
}
