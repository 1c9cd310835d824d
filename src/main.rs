//! Line-oriented terminal client (default binary).
//!
//! Connects to the relay configured through `GRIMBLOCK_*` variables and reads
//! commands from stdin. The board is printed whenever the visible state
//! changes.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use grimblock::adapter::{Client, ClientConfig, ClientEvent, ClientView};
use grimblock::core::catalog;

const HELP: &str = "\
commands:
  select <n>          pick offered piece n (0-based)
  deselect
  place <row> <col>   place the selected piece with its top-left at (row, col)
  create              start a new game
  spawn <name>        register this account
  rename <name>
  ack <id>            dismiss a combo notification
  resync              drop local predictions, show the last snapshot
  show
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    let mut client = Client::connect(config).await?;
    println!("{}", HELP);

    let mut views = client.subscribe();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else { break };
                if !run_command(&client, line.trim()).await? {
                    break;
                }
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                print_view(&view);
            }
        }
        while let Some(event) = client.try_event() {
            print_event(&event);
        }
    }

    client.shutdown().await
}

/// Returns false to quit
async fn run_command(client: &Client, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(true);
    };
    let rest: Vec<&str> = parts.collect();

    match (cmd, rest.as_slice()) {
        ("select", [n]) => match n.parse() {
            Ok(index) => client.select_piece(index).await?,
            Err(_) => println!("bad index {}", n),
        },
        ("deselect", []) => client.deselect().await?,
        ("place", [row, col]) => match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => {
                let accepted = client.place(row, col).await?;
                println!("place {}", if accepted { "accepted" } else { "rejected" });
            }
            _ => println!("bad position {} {}", row, col),
        },
        ("create", []) => {
            let ok = client.create_game().await?;
            println!("create {}", if ok { "ok" } else { "failed" });
        }
        ("spawn", [name]) => {
            let ok = client.spawn_player(name).await?;
            println!("spawn {}", if ok { "ok" } else { "failed" });
        }
        ("rename", [name]) => {
            let ok = client.rename(name).await?;
            println!("rename {}", if ok { "ok" } else { "failed" });
        }
        ("ack", [id]) => match id.parse() {
            Ok(id) => client.ack_combo(id).await?,
            Err(_) => println!("bad combo id {}", id),
        },
        ("resync", []) => client.resync().await?,
        ("show", []) => print_view(&client.view()),
        ("help", _) => println!("{}", HELP),
        ("quit", _) | ("exit", _) => return Ok(false),
        _ => println!("unknown command; try `help`"),
    }
    Ok(true)
}

fn print_view(view: &ClientView) {
    let visible = &view.visible;
    println!(
        "game {} | {} | score {}{}",
        view.game_id,
        view.phase.as_str(),
        visible.score,
        if view.countdown_ms > 0 {
            format!(" | starts in {}s", view.countdown_ms.div_ceil(1000))
        } else {
            String::new()
        }
    );
    print!("{}", visible.board);
    for (i, piece) in visible.pieces.iter().enumerate() {
        let marker = if visible.selected == Some(i) { '*' } else { ' ' };
        println!(
            "{}{} {} {} ({}x{})",
            marker,
            i,
            catalog::name(piece.offered.piece),
            piece.offered.orientation.as_str(),
            piece.offered.matrix.height(),
            piece.offered.matrix.width()
        );
    }
    for combo in &view.combos {
        println!("combo #{}: x{} +{}", combo.id, combo.combo, combo.points());
    }
    if visible.game_over {
        println!("game over");
    } else if !visible.pieces.is_empty() && !visible.has_valid_moves() {
        println!("no piece fits");
    }
    if let Some(fault) = &visible.fault {
        println!("inconsistent state: {}", fault);
    }
}

fn print_event(event: &ClientEvent) {
    match event {
        ClientEvent::Welcome { player_id } => println!("connected as {}", player_id),
        ClientEvent::Inconsistency(err) => println!("inconsistent state: {}", err),
        ClientEvent::Combo(combo) => println!("combo x{} (+{})", combo.combo, combo.points()),
        ClientEvent::SubmissionFailed { entrypoint, reason } => {
            println!("{} failed: {}", entrypoint.as_str(), reason)
        }
        ClientEvent::RelayError { code, message } => {
            println!("relay error {:?}: {}", code, message)
        }
    }
}
