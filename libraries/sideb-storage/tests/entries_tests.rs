//! Integration tests for the playlist membership slice
//!
//! Covers the ordering invariant (positions are exactly 0..N-1 with the
//! denormalized count in step) across insert, remove and reorder, the
//! precondition failures, and transaction rollback.


use sideb_core::{PlaylistId, SidebError, TrackId, UserId};
use sqlx::SqlitePool;
use test_helpers::*;

/// Fixture: a playlist owned by a fresh user plus `n` tracks named
/// "Track 0".."Track n-1" (not yet added to the playlist)
async fn playlist_with_tracks(
    pool: &SqlitePool,
    n: usize,
) -> (UserId, PlaylistId, Vec<TrackId>) {
    let user_id = create_test_user(pool, "testuser").await;
    let playlist_id = create_test_playlist(pool, "Test Playlist", user_id.clone()).await;

    let mut tracks = Vec::with_capacity(n);
    for i in 0..n {
        tracks.push(create_test_track(pool, &format!("Track {i}")).await);
    }
    (user_id, playlist_id, tracks)
}

/// Fixture: same, but every track already appended in order
async fn populated_playlist(
    pool: &SqlitePool,
    n: usize,
) -> (UserId, PlaylistId, Vec<TrackId>) {
    let (user_id, playlist_id, tracks) = playlist_with_tracks(pool, n).await;
    for track_id in &tracks {
        sideb_storage::entries::add_track(
            pool,
            playlist_id.clone(),
            track_id.clone(),
            None,
            user_id.clone(),
        )
        .await
        .expect("Failed to append track");
    }
    (user_id, playlist_id, tracks)
}

fn ids(tracks: &[TrackId], order: &[usize]) -> Vec<String> {
    order.iter().map(|&i| tracks[i].as_str().to_string()).collect()
}

async fn stored_order(pool: &SqlitePool, playlist_id: &PlaylistId) -> Vec<String> {
    snapshot(pool, playlist_id)
        .await
        .into_iter()
        .map(|(track_id, _)| track_id)
        .collect()
}

#[tokio::test]
async fn test_append_default_assigns_next_position() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, tracks) = playlist_with_tracks(pool, 2).await;

    let first = sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[0].clone(),
        None,
        user_id.clone(),
    )
    .await
    .unwrap();
    assert_eq!(first.position, 0);

    let second = sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[1].clone(),
        None,
        user_id,
    )
    .await
    .unwrap();
    assert_eq!(second.position, 1);

    // Entry comes back with track details attached
    assert_eq!(second.track.as_ref().unwrap().title, "Track 1");

    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_insert_at_position_shifts_following_tracks() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // [A, B, C], insert D at 1 -> [A, D, B, C]
    let (user_id, playlist_id, tracks) = populated_playlist(pool, 3).await;
    let track_d = create_test_track(pool, "Track D").await;

    let entry = sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        track_d.clone(),
        Some(1),
        user_id,
    )
    .await
    .expect("Failed to insert at position");
    assert_eq!(entry.position, 1);

    let order = stored_order(pool, &playlist_id).await;
    let expected = vec![
        tracks[0].as_str().to_string(),
        track_d.as_str().to_string(),
        tracks[1].as_str().to_string(),
        tracks[2].as_str().to_string(),
    ];
    assert_eq!(order, expected);
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_insert_at_start_and_end() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, tracks) = populated_playlist(pool, 2).await;

    let head = create_test_track(pool, "Head").await;
    sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        head.clone(),
        Some(0),
        user_id.clone(),
    )
    .await
    .unwrap();

    // Position N is a valid explicit append target
    let tail = create_test_track(pool, "Tail").await;
    let entry = sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tail.clone(),
        Some(3),
        user_id,
    )
    .await
    .unwrap();
    assert_eq!(entry.position, 3);

    let order = stored_order(pool, &playlist_id).await;
    assert_eq!(order[0], head.as_str());
    assert_eq!(order[1], tracks[0].as_str());
    assert_eq!(order[2], tracks[1].as_str());
    assert_eq!(order[3], tail.as_str());
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_remove_track_closes_the_gap() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // [A, B, C, D], remove B -> [A, C, D]
    let (_, playlist_id, tracks) = populated_playlist(pool, 4).await;

    sideb_storage::entries::remove_track(pool, playlist_id.clone(), tracks[1].clone())
        .await
        .expect("Failed to remove track");

    let order = stored_order(pool, &playlist_id).await;
    assert_eq!(order, ids(&tracks, &[0, 2, 3]));
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_move_forward() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // [A, B, C, D, E], move A to 3 -> [B, C, D, A, E]
    let (_, playlist_id, tracks) = populated_playlist(pool, 5).await;

    let entry =
        sideb_storage::entries::reorder_track(pool, playlist_id.clone(), tracks[0].clone(), 3)
            .await
            .expect("Failed to move forward");
    assert_eq!(entry.position, 3);

    let order = stored_order(pool, &playlist_id).await;
    assert_eq!(order, ids(&tracks, &[1, 2, 3, 0, 4]));
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_move_backward() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // [A, B, C, D, E], move E to 1 -> [A, E, B, C, D]
    let (_, playlist_id, tracks) = populated_playlist(pool, 5).await;

    let entry =
        sideb_storage::entries::reorder_track(pool, playlist_id.clone(), tracks[4].clone(), 1)
            .await
            .expect("Failed to move backward");
    assert_eq!(entry.position, 1);

    let order = stored_order(pool, &playlist_id).await;
    assert_eq!(order, ids(&tracks, &[0, 4, 1, 2, 3]));
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_move_to_current_position_is_a_noop() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (_, playlist_id, tracks) = populated_playlist(pool, 3).await;
    let before = snapshot(pool, &playlist_id).await;

    let entry =
        sideb_storage::entries::reorder_track(pool, playlist_id.clone(), tracks[1].clone(), 1)
            .await
            .expect("No-op move failed");
    assert_eq!(entry.position, 1);

    assert_eq!(snapshot(pool, &playlist_id).await, before);
}

#[tokio::test]
async fn test_duplicate_membership_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, tracks) = populated_playlist(pool, 3).await;
    let before = snapshot(pool, &playlist_id).await;

    let err = sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[0].clone(),
        None,
        user_id,
    )
    .await
    .expect_err("Duplicate add should fail");
    assert!(matches!(err, SidebError::Conflict(_)), "got {err:?}");

    assert_eq!(snapshot(pool, &playlist_id).await, before);
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_out_of_range_insert_is_rejected_without_mutation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, _) = populated_playlist(pool, 3).await;
    let extra = create_test_track(pool, "Extra").await;
    let before = snapshot(pool, &playlist_id).await;

    // Valid insert targets are 0..=3; 4 is past the end
    let err = sideb_storage::entries::add_track(pool, playlist_id.clone(), extra, Some(4), user_id)
        .await
        .expect_err("Out-of-range insert should fail");
    assert!(matches!(err, SidebError::InvalidInput(_)), "got {err:?}");

    assert_eq!(snapshot(pool, &playlist_id).await, before);
}

#[tokio::test]
async fn test_out_of_range_reorder_is_rejected_without_mutation() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (_, playlist_id, tracks) = populated_playlist(pool, 3).await;
    let before = snapshot(pool, &playlist_id).await;

    // Valid move targets are existing slots only, 0..=2
    let err = sideb_storage::entries::reorder_track(pool, playlist_id.clone(), tracks[0].clone(), 3)
        .await
        .expect_err("Out-of-range reorder should fail");
    assert!(matches!(err, SidebError::InvalidInput(_)), "got {err:?}");

    assert_eq!(snapshot(pool, &playlist_id).await, before);
}

#[tokio::test]
async fn test_missing_references_are_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, tracks) = populated_playlist(pool, 1).await;
    let stray_track = create_test_track(pool, "Stray").await;

    // Unknown playlist
    let err = sideb_storage::entries::add_track(
        pool,
        PlaylistId::new("nope"),
        tracks[0].clone(),
        None,
        user_id.clone(),
    )
    .await
    .expect_err("Unknown playlist should fail");
    assert!(matches!(err, SidebError::NotFound { .. }), "got {err:?}");

    // Unknown track
    let err = sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        TrackId::new("nope"),
        None,
        user_id,
    )
    .await
    .expect_err("Unknown track should fail");
    assert!(matches!(err, SidebError::NotFound { .. }), "got {err:?}");

    // Track exists but is not a member
    let err = sideb_storage::entries::remove_track(pool, playlist_id.clone(), stray_track.clone())
        .await
        .expect_err("Removing a non-member should fail");
    assert!(matches!(err, SidebError::NotFound { .. }), "got {err:?}");

    let err = sideb_storage::entries::reorder_track(pool, playlist_id, stray_track, 0)
        .await
        .expect_err("Reordering a non-member should fail");
    assert!(matches!(err, SidebError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_invariant_holds_across_mixed_operations() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, tracks) = playlist_with_tracks(pool, 6).await;

    // Scripted mix of appends, positioned inserts, removals and moves;
    // the invariant must hold after every step
    sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[0].clone(),
        None,
        user_id.clone(),
    )
    .await
    .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[1].clone(),
        Some(0),
        user_id.clone(),
    )
    .await
    .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[2].clone(),
        Some(1),
        user_id.clone(),
    )
    .await
    .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[3].clone(),
        None,
        user_id.clone(),
    )
    .await
    .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::reorder_track(pool, playlist_id.clone(), tracks[3].clone(), 0)
        .await
        .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::remove_track(pool, playlist_id.clone(), tracks[1].clone())
        .await
        .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::reorder_track(pool, playlist_id.clone(), tracks[0].clone(), 2)
        .await
        .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::add_track(
        pool,
        playlist_id.clone(),
        tracks[4].clone(),
        Some(3),
        user_id.clone(),
    )
    .await
    .unwrap();
    assert_contiguous(pool, &playlist_id).await;

    sideb_storage::entries::remove_track(pool, playlist_id.clone(), tracks[3].clone())
        .await
        .unwrap();
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_rolled_back_transaction_leaves_ledger_unchanged() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (user_id, playlist_id, _) = populated_playlist(pool, 3).await;
    let extra = create_test_track(pool, "Extra").await;
    let before = snapshot(pool, &playlist_id).await;

    // Drive the ledger directly inside a transaction that never commits;
    // the shift plus insert must vanish on rollback
    {
        let mut tx = pool.begin().await.unwrap();
        sideb_storage::entries::ledger::insert_at(
            &mut tx,
            &playlist_id,
            &extra,
            1,
            &user_id,
            chrono::Utc::now(),
        )
        .await
        .unwrap();
        tx.rollback().await.unwrap();
    }

    assert_eq!(snapshot(pool, &playlist_id).await, before);
    assert_contiguous(pool, &playlist_id).await;
}

#[tokio::test]
async fn test_list_entries_is_ordered_and_paginated() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let (_, playlist_id, tracks) = populated_playlist(pool, 5).await;

    let page = sideb_storage::entries::list_entries(
        pool,
        playlist_id.clone(),
        sideb_core::PageRequest::new(2, 2),
    )
    .await
    .expect("Failed to list entries");

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].position, 2);
    assert_eq!(page.items[0].track_id, tracks[2]);
    assert_eq!(page.items[1].position, 3);
    assert!(page.has_more());

    let err = sideb_storage::entries::list_entries(
        pool,
        PlaylistId::new("nope"),
        sideb_core::PageRequest::default(),
    )
    .await
    .expect_err("Unknown playlist should fail");
    assert!(matches!(err, SidebError::NotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_track_delete_renumbers_every_containing_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, "testuser").await;
    let shared = create_test_track(pool, "Shared").await;

    let mut playlists = Vec::new();
    for name in ["First", "Second"] {
        let playlist_id = create_test_playlist(pool, name, user_id.clone()).await;
        for i in 0..2 {
            let track_id = create_test_track(pool, &format!("{name} {i}")).await;
            sideb_storage::entries::add_track(
                pool,
                playlist_id.clone(),
                track_id,
                None,
                user_id.clone(),
            )
            .await
            .unwrap();
        }
        // Shared track sits in the middle of each playlist
        sideb_storage::entries::add_track(
            pool,
            playlist_id.clone(),
            shared.clone(),
            Some(1),
            user_id.clone(),
        )
        .await
        .unwrap();
        playlists.push(playlist_id);
    }

    sideb_storage::tracks::delete(pool, shared.clone())
        .await
        .expect("Failed to delete track");

    for playlist_id in &playlists {
        let order = stored_order(pool, playlist_id).await;
        assert_eq!(order.len(), 2);
        assert!(!order.contains(&shared.as_str().to_string()));
        assert_contiguous(pool, playlist_id).await;
    }
}
