//! Integration tests for `LotteryService`: contexts, operations,
//! notifications, and the wire entry points.

use std::sync::Arc;

use roomdraw::prelude::*;
use tokio::sync::broadcast::error::TryRecvError;

// =========================================================================
// Helpers
// =========================================================================

const ALICE: Account = Account::new([0xa1; 20]);
const BOB: Account = Account::new([0xb0; 20]);

type TestService = LotteryService<InMemoryBank, DevChain>;

fn service() -> TestService {
    LotteryServiceBuilder::new().build(
        InMemoryBank::new(),
        DevChain::new(DevChainConfig {
            seed: Some(7),
            ..DevChainConfig::default()
        }),
    )
}

fn ctx(account: Account) -> ClientContext {
    ClientContext::new(account, NetworkId::DEVNET, &SessionConfig::default())
}

fn ether(s: &str) -> Amount {
    Amount::parse_ether(s).unwrap()
}

/// Scenario A: room 1 open with Alice (0.1) and Bob (0.2).
async fn scenario_a(service: &TestService) {
    let room = RoomId(1);
    service.create_or_join(&ctx(ALICE), room).await.unwrap();
    service.start(&ctx(ALICE), room).await.unwrap();
    service.enter_ether(&ctx(ALICE), room, "0.1").await.unwrap();
    service.enter_ether(&ctx(BOB), room, "0.2").await.unwrap();
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

// =========================================================================
// Operations
// =========================================================================

#[tokio::test]
async fn test_scenario_a_and_b_through_service() {
    let service = service();
    let room = RoomId(1);
    scenario_a(&service).await;

    let players: Vec<Account> = service
        .players(&ctx(ALICE), room)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.account)
        .collect();
    assert_eq!(players, vec![ALICE, BOB]);
    assert_eq!(service.balance(&ctx(ALICE), room).await.unwrap(), ether("0.3"));

    let draw = service.end(&ctx(BOB), room).await.unwrap();

    assert!(draw.winner == ALICE || draw.winner == BOB);
    assert_eq!(draw.payout, ether("0.3"));
    assert_eq!(service.balance(&ctx(ALICE), room).await.unwrap(), Amount::ZERO);
    assert_eq!(service.history(&ctx(ALICE), room).await.unwrap(), vec![draw.winner]);
    assert_eq!(service.winner(&ctx(ALICE), room).await.unwrap(), Some(draw.winner));
    let paid = service.with_funds(|bank| bank.balance_of(&draw.winner)).await;
    assert_eq!(paid, ether("0.3"));
}

#[tokio::test]
async fn test_enter_duplicate_returns_room_error() {
    let service = service();
    scenario_a(&service).await;

    let result = service.enter_ether(&ctx(ALICE), RoomId(1), "0.05").await;

    assert!(matches!(
        result,
        Err(RoomdrawError::Room(RoomError::DuplicateEntry(a))) if a == ALICE
    ));
    assert_eq!(service.balance(&ctx(ALICE), RoomId(1)).await.unwrap(), ether("0.3"));
}

#[tokio::test]
async fn test_enter_ether_malformed_amount_is_invalid_stake() {
    let service = service();
    scenario_a(&service).await;

    for bad in ["", "abc", "0.1.2", "-1"] {
        let result = service.enter_ether(&ctx(Account::new([9; 20])), RoomId(1), bad).await;
        assert!(
            matches!(result, Err(RoomdrawError::Room(RoomError::InvalidStake(_)))),
            "{bad:?} gave {result:?}"
        );
    }
}

#[tokio::test]
async fn test_query_unknown_room_returns_not_found() {
    let service = service();
    let result = service.players(&ctx(ALICE), RoomId(42)).await;
    assert!(matches!(
        result,
        Err(RoomdrawError::Room(RoomError::RoomNotFound(RoomId(42))))
    ));
}

#[tokio::test]
async fn test_room_view_reflects_open_round() {
    let service = service();
    scenario_a(&service).await;

    let view = service.room_view(&ctx(ALICE), RoomId(1)).await.unwrap();

    assert_eq!(view.state, RoomState::Open);
    assert_eq!(view.players.len(), 2);
    assert_eq!(view.balance, ether("0.3"));
    assert!(view.history.is_empty());
}

#[tokio::test]
async fn test_rejected_payout_leaves_room_unchanged_until_retry() {
    let service = service();
    let room = RoomId(3);
    service.create_or_join(&ctx(ALICE), room).await.unwrap();
    service.start(&ctx(ALICE), room).await.unwrap();
    service.enter_ether(&ctx(ALICE), room, "1").await.unwrap();
    service.with_funds(|bank| bank.reject_deposits(ALICE)).await;
    let before = service.room_view(&ctx(ALICE), room).await.unwrap();

    let result = service.end(&ctx(ALICE), room).await;

    assert!(matches!(
        result,
        Err(RoomdrawError::Room(RoomError::TransferFailed(..)))
    ));
    assert_eq!(service.room_view(&ctx(ALICE), room).await.unwrap(), before);

    service.with_funds(|bank| bank.accept_deposits(&ALICE)).await;
    let draw = service.end(&ctx(ALICE), room).await.unwrap();
    assert_eq!(draw.winner, ALICE);
    assert_eq!(draw.payout, ether("1"));
}

#[tokio::test]
async fn test_concurrent_entries_are_all_recorded() {
    let service = Arc::new(service());
    let room = RoomId(8);
    service.create_or_join(&ctx(ALICE), room).await.unwrap();
    service.start(&ctx(ALICE), room).await.unwrap();

    let mut handles = Vec::new();
    for i in 1..=32u8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let caller = ctx(Account::new([i; 20]));
            service.enter(&caller, room, Amount::from_wei(u128::from(i))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let players = service.players(&ctx(ALICE), room).await.unwrap();
    assert_eq!(players.len(), 32);
    let expected: u128 = (1..=32u128).sum();
    assert_eq!(
        service.balance(&ctx(ALICE), room).await.unwrap(),
        Amount::from_wei(expected)
    );
}

// =========================================================================
// Client context
// =========================================================================

#[tokio::test]
async fn test_wrong_network_context_is_rejected_until_switch() {
    let service = service();
    let mut caller = ClientContext::new(ALICE, NetworkId(1), &SessionConfig::default());

    let result = service.create_or_join(&caller, RoomId(1)).await;
    assert!(matches!(
        result,
        Err(RoomdrawError::Session(SessionError::WrongNetwork { .. }))
    ));

    caller.apply(ContextEvent::ChainChanged(NetworkId::DEVNET));
    assert!(service.create_or_join(&caller, RoomId(1)).await.unwrap());
}

#[tokio::test]
async fn test_wrong_network_checked_before_stake_parsing() {
    let service = service();
    let caller = ClientContext::new(ALICE, NetworkId(1), &SessionConfig::default());

    let result = service.enter_ether(&caller, RoomId(1), "not-a-number").await;

    assert!(matches!(result, Err(RoomdrawError::Session(_))));
}

#[tokio::test]
async fn test_disconnected_context_is_rejected() {
    let service = service();
    let mut caller = ctx(ALICE);
    caller.apply(ContextEvent::Disconnected);

    let result = service.players(&caller, RoomId(1)).await;

    assert!(matches!(
        result,
        Err(RoomdrawError::Session(SessionError::Disconnected))
    ));
}

#[tokio::test]
async fn test_account_switch_enters_as_new_account() {
    let service = service();
    let room = RoomId(1);
    let mut caller = ctx(ALICE);
    service.create_or_join(&caller, room).await.unwrap();
    service.start(&caller, room).await.unwrap();
    service.enter_ether(&caller, room, "0.1").await.unwrap();

    caller.apply(ContextEvent::AccountsChanged(vec![BOB]));
    service.enter_ether(&caller, room, "0.1").await.unwrap();

    let players = service.players(&caller, room).await.unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[1].account, BOB);
}

#[tokio::test]
async fn test_dispatch_enter_for_other_account_returns_mismatch() {
    let service = service();
    let room = RoomId(1);
    service.create_or_join(&ctx(ALICE), room).await.unwrap();
    service.start(&ctx(ALICE), room).await.unwrap();
    let mut rx = service.subscribe();

    let result = service
        .dispatch(
            &ctx(ALICE),
            room,
            Operation::Enter {
                account: Account::new([0xcc; 20]),
                stake: ether("0.1"),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(RoomdrawError::Session(SessionError::AccountMismatch { signer, .. })) if signer == ALICE
    ));
    assert!(service.players(&ctx(ALICE), room).await.unwrap().is_empty());
    assert_eq!(service.balance(&ctx(ALICE), room).await.unwrap(), Amount::ZERO);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_dispatch_enter_for_own_account_succeeds() {
    let service = service();
    let room = RoomId(1);
    service.create_or_join(&ctx(ALICE), room).await.unwrap();
    service.start(&ctx(ALICE), room).await.unwrap();

    let outcome = service
        .dispatch(
            &ctx(ALICE),
            room,
            Operation::Enter {
                account: ALICE,
                stake: ether("0.1"),
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Entered { balance: ether("0.1") });
}

#[tokio::test]
async fn test_connect_uses_service_session_config() {
    let service = LotteryServiceBuilder::new()
        .session_config(SessionConfig {
            expected_network: NetworkId(1),
        })
        .build(InMemoryBank::new(), DevChain::default());
    let wallet = StaticWallet {
        accounts: vec![ALICE],
        network: NetworkId(1),
    };

    let caller = service.connect(&wallet).await.unwrap();

    assert_eq!(caller.state(), ContextState::Connected);
    assert!(service.create_or_join(&caller, RoomId(1)).await.unwrap());
}

// =========================================================================
// Notifications
// =========================================================================

#[tokio::test]
async fn test_notifications_published_for_committed_operations() {
    let service = service();
    let mut rx = service.subscribe();
    let room = RoomId(1);

    scenario_a(&service).await;

    assert_eq!(
        drain(&mut rx),
        vec![
            Notification::RoomCreated { room_id: room },
            Notification::RoundOpened { room_id: room, round: 1 },
            Notification::EntrantJoined {
                room_id: room,
                account: ALICE,
                stake: ether("0.1"),
                balance: ether("0.1"),
            },
            Notification::EntrantJoined {
                room_id: room,
                account: BOB,
                stake: ether("0.2"),
                balance: ether("0.3"),
            },
        ]
    );

    let draw = service.end(&ctx(ALICE), room).await.unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        Notification::WinnerDrawn {
            room_id: room,
            round: 1,
            winner: draw.winner,
            payout: draw.payout,
        }
    );
}

#[tokio::test]
async fn test_failed_operations_publish_nothing() {
    let service = service();
    scenario_a(&service).await;
    let mut rx = service.subscribe();

    let _ = service.enter_ether(&ctx(ALICE), RoomId(1), "0.05").await;
    let _ = service.start(&ctx(ALICE), RoomId(1)).await;
    let _ = service.end(&ctx(ALICE), RoomId(99)).await;
    let _ = service.create_or_join(&ctx(ALICE), RoomId(1)).await;
    let _ = service.balance(&ctx(ALICE), RoomId(1)).await;

    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_operations_succeed_without_subscribers() {
    let service = service();
    scenario_a(&service).await;
    assert!(service.end(&ctx(ALICE), RoomId(1)).await.is_ok());
}

// =========================================================================
// Wire entry points
// =========================================================================

#[tokio::test]
async fn test_handle_request_echoes_seq_and_reports_code() {
    let service = service();
    scenario_a(&service).await;

    let response = service
        .handle_request(
            &ctx(ALICE),
            Request {
                seq: 41,
                room_id: RoomId(1),
                operation: Operation::Enter {
                    account: ALICE,
                    stake: ether("0.05"),
                },
            },
        )
        .await;

    assert_eq!(response.seq, 41);
    let report = response.result.unwrap_err();
    assert_eq!(report.code, ErrorCode::DuplicateEntry);
}

#[tokio::test]
async fn test_handle_request_enter_for_other_account_reports_mismatch() {
    let service = service();
    let room = RoomId(1);
    service.create_or_join(&ctx(ALICE), room).await.unwrap();
    service.start(&ctx(ALICE), room).await.unwrap();

    let response = service
        .handle_request(
            &ctx(ALICE),
            Request {
                seq: 9,
                room_id: room,
                operation: Operation::Enter {
                    account: BOB,
                    stake: ether("0.2"),
                },
            },
        )
        .await;

    assert_eq!(response.seq, 9);
    assert_eq!(response.result.unwrap_err().code, ErrorCode::AccountMismatch);
    assert!(service.players(&ctx(BOB), room).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_handle_request_wrong_network_reports_code() {
    let service = service();
    let caller = ClientContext::new(ALICE, NetworkId(5), &SessionConfig::default());

    let response = service
        .handle_request(
            &caller,
            Request {
                seq: 1,
                room_id: RoomId(1),
                operation: Operation::CreateOrJoin,
            },
        )
        .await;

    assert_eq!(response.result.unwrap_err().code, ErrorCode::WrongNetwork);
}

#[tokio::test]
async fn test_handle_encoded_json_round_trip() {
    let service = service();
    let codec = JsonCodec;
    let request = Request {
        seq: 3,
        room_id: RoomId(2),
        operation: Operation::CreateOrJoin,
    };
    let bytes = codec.encode(&request).unwrap();

    let reply = service.handle_encoded(&ctx(ALICE), &codec, &bytes).await.unwrap();
    let response: Response = codec.decode(&reply).unwrap();

    assert_eq!(response.seq, 3);
    assert_eq!(response.result, Ok(Outcome::Joined { created: true }));
}

#[tokio::test]
async fn test_handle_encoded_garbage_reports_invalid_message() {
    let service = service();
    let codec = JsonCodec;

    let reply = service
        .handle_encoded(&ctx(ALICE), &codec, b"{not json")
        .await
        .unwrap();
    let response: Response = codec.decode(&reply).unwrap();

    assert_eq!(response.seq, 0);
    assert_eq!(response.result.unwrap_err().code, ErrorCode::InvalidMessage);
}
