// Tests for the transcript store: append-only ordering, monotonic ids,
// speaker numbering, and reset-on-new-session.

use live_scribe::transcript::{speaker_label, TranscriptStore};

#[test]
fn speaker_labels_group_in_pairs() {
    assert_eq!(speaker_label(0), "Speaker 1");
    assert_eq!(speaker_label(1), "Speaker 1");
    assert_eq!(speaker_label(2), "Speaker 2");
    assert_eq!(speaker_label(3), "Speaker 2");
    assert_eq!(speaker_label(4), "Speaker 3");
}

#[tokio::test]
async fn appends_assign_monotonic_ids_and_indices() {
    let store = TranscriptStore::new();

    let a = store.append_utterance("first").await;
    let b = store.append_utterance("second").await;
    let c = store.append_utterance("third").await;

    assert_eq!(a.speaker_index, 0);
    assert_eq!(b.speaker_index, 1);
    assert_eq!(c.speaker_index, 2);

    assert!(a.id < b.id && b.id < c.id);

    assert_eq!(a.speaker, "Speaker 1");
    assert_eq!(b.speaker, "Speaker 1");
    assert_eq!(c.speaker, "Speaker 2");

    let entries = store.entries().await;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].text, "first");
    assert_eq!(entries[2].text, "third");
}

#[tokio::test]
async fn reset_clears_entries_and_restarts_speaker_numbering() {
    let store = TranscriptStore::new();

    store.append_utterance("old one").await;
    let old = store.append_utterance("old two").await;

    store.reset().await;
    assert!(store.is_empty().await);

    let fresh = store.append_utterance("new session").await;

    // Speaker numbering restarts, ids stay unique across sessions
    assert_eq!(fresh.speaker_index, 0);
    assert_eq!(fresh.speaker, "Speaker 1");
    assert!(fresh.id > old.id);

    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn entries_returns_a_snapshot() {
    let store = TranscriptStore::new();
    store.append_utterance("one").await;

    let snapshot = store.entries().await;
    store.append_utterance("two").await;

    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.len().await, 2);
}
