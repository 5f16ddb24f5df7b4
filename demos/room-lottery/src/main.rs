use roomdraw::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Notification printer
// ---------------------------------------------------------------------------

/// Prints every notification as one JSON line until the service is gone.
async fn print_notifications(mut rx: tokio::sync::broadcast::Receiver<Notification>) {
    use tokio::sync::broadcast::error::RecvError;

    let codec = JsonCodec;
    loop {
        match rx.recv().await {
            Ok(event) => match codec.encode(&event) {
                Ok(bytes) => println!("event  {}", String::from_utf8_lossy(&bytes)),
                Err(e) => tracing::warn!(error = %e, "failed to encode notification"),
            },
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "notification printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

async fn walkthrough(
    service: &LotteryService<InMemoryBank, DevChain>,
) -> Result<(), RoomdrawError> {
    let alice = service
        .connect(&StaticWallet::devnet(Account::new([0xa1; 20])))
        .await?;
    let bob = service
        .connect(&StaticWallet::devnet(Account::new([0xb0; 20])))
        .await?;
    let room = RoomId(1);

    // Round 1: Alice opens the room, both enter.
    service.create_or_join(&alice, room).await?;
    service.start(&alice, room).await?;
    service.enter_ether(&alice, room, "0.1").await?;
    service.enter_ether(&bob, room, "0.2").await?;

    let players = service.players(&alice, room).await?;
    println!("players {}", players.iter().map(|e| e.account.to_string()).collect::<Vec<_>>().join(", "));
    println!("balance {} ETH", service.balance(&alice, room).await?);

    // A second entry by the same account is refused and changes nothing.
    match service.enter_ether(&alice, room, "0.05").await {
        Err(e) => println!("reject  {:?}: {e}", e.code()),
        Ok(_) => println!("reject  (duplicate entry unexpectedly accepted)"),
    }

    let draw = service.end(&bob, room).await?;
    println!("winner  {} takes {} ETH in round {}", draw.winner, draw.payout, draw.round);
    println!("balance {} ETH", service.balance(&alice, room).await?);

    // Round 2 reuses the room; history keeps both winners.
    service.start(&bob, room).await?;
    service.enter_ether(&bob, room, "1").await?;
    service.end(&alice, room).await?;

    let history = service.history(&alice, room).await?;
    println!("history {}", history.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));

    for who in [&alice, &bob] {
        if let Some(account) = who.account() {
            let paid = service.with_funds(|bank| bank.balance_of(&account)).await;
            println!("wallet  {account} received {paid} ETH");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let service = LotteryServiceBuilder::new().build(InMemoryBank::new(), DevChain::default());
    let printer = tokio::spawn(print_notifications(service.subscribe()));

    walkthrough(&service).await?;

    // Dropping the service closes the channel and ends the printer.
    drop(service);
    printer.await?;
    Ok(())
}
