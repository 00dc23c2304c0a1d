//! Driving a match through its tokio actor, on paused time

use std::time::Duration;

use riftspells::arena::{Command, JoinOptions, MatchPhase};
use riftspells::core::config::MatchConfig;
use riftspells::core::error::RiftError;
use riftspells::core::types::PlayerId;
use riftspells::server::{spawn_match, ServerMessage};
use riftspells::spells::Sigil;

fn phases(updates: &mut tokio::sync::broadcast::Receiver<ServerMessage>) -> Vec<MatchPhase> {
    let mut seen = Vec::new();
    while let Ok(message) = updates.try_recv() {
        if let ServerMessage::State { state } = message {
            seen.push(state.phase);
        }
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn test_match_reaches_combat_through_handle() {
    let handle = spawn_match(MatchConfig::seeded(4)).unwrap();
    let mut updates = handle.subscribe();

    let one = handle.join(JoinOptions::default()).await.unwrap();
    let two = handle
        .join(JoinOptions {
            username: Some("Vex".into()),
            sigil: Some(Sigil::Harvest),
        })
        .await
        .unwrap();
    assert_eq!(one.room_code, handle.room_code());
    assert_eq!(two.room_code, handle.room_code());
    assert!(matches!(
        handle.join(JoinOptions::default()).await,
        Err(RiftError::RoomFull)
    ));

    handle
        .send_text(one.player_id, r#"{"type":"setReady","ready":true}"#)
        .await
        .unwrap();
    handle
        .send(two.player_id, Command::SetReady { ready: true })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(3300)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, MatchPhase::Combat);
    assert!(snapshot.orbs.len() >= 3);
    assert!(snapshot.round_timer < 180.0);
    assert_eq!(snapshot.player1.unwrap().username, "Player 1");
    assert_eq!(snapshot.player2.unwrap().selected_sigil, Some(Sigil::Harvest));

    let seen = phases(&mut updates);
    assert!(seen.contains(&MatchPhase::SigilSelect));
    assert!(seen.contains(&MatchPhase::Countdown));
    assert!(seen.contains(&MatchPhase::Combat));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_rejected_commands_broadcast_nothing() {
    let handle = spawn_match(MatchConfig::seeded(8)).unwrap();
    let mut updates = handle.subscribe();

    handle
        .send(PlayerId::new(), Command::SetReady { ready: true })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, MatchPhase::Lobby);
    assert!(updates.try_recv().is_err());

    handle.join(JoinOptions::default()).await.unwrap();
    let message = updates.recv().await.unwrap();
    assert!(matches!(message, ServerMessage::State { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_text_is_refused_before_the_actor() {
    let handle = spawn_match(MatchConfig::seeded(8)).unwrap();
    let info = handle.join(JoinOptions::default()).await.unwrap();

    let result = handle.send_text(info.player_id, r#"{"type":"warp"}"#).await;
    assert!(matches!(result, Err(RiftError::SerdeError(_))));
    assert_eq!(handle.snapshot().await.unwrap().phase, MatchPhase::Lobby);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_mid_match_ends_it() {
    let handle = spawn_match(MatchConfig::seeded(15)).unwrap();
    let one = handle.join(JoinOptions::default()).await.unwrap();
    let two = handle.join(JoinOptions::default()).await.unwrap();
    handle.send(one.player_id, Command::SetReady { ready: true }).await.unwrap();
    handle.send(two.player_id, Command::SetReady { ready: true }).await.unwrap();
    tokio::time::sleep(Duration::from_millis(4000)).await;

    handle.leave(one.player_id).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, MatchPhase::MatchEnd);
    assert_eq!(snapshot.winner_id, Some(two.player_id));

    assert!(matches!(
        handle.leave(PlayerId::new()).await,
        Err(RiftError::PlayerNotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_the_handle() {
    let handle = spawn_match(MatchConfig::seeded(2)).unwrap();
    handle.shutdown().await;

    assert!(matches!(
        handle.join(JoinOptions::default()).await,
        Err(RiftError::ActorClosed)
    ));
    assert!(matches!(handle.snapshot().await, Err(RiftError::ActorClosed)));
}

#[tokio::test(start_paused = true)]
async fn test_inconsistent_config_spawns_nothing() {
    let config = MatchConfig {
        tick_ms: 0,
        ..MatchConfig::seeded(3)
    };
    assert!(matches!(spawn_match(config), Err(RiftError::InvalidConfig(_))));
}
