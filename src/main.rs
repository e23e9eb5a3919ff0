use std::io::{self, BufRead, Write};
use viking_chess::*;

fn parse_move(line: &str) -> Option<Move> {
    let coords: Vec<i32> = line
        .split_whitespace()
        .map(|token| token.parse().ok())
        .collect::<Option<_>>()?;

    match coords.as_slice() {
        &[from_col, from_row, to_col, to_row] => Some(Move::new(
            Position::new(from_col, from_row),
            Position::new(to_col, to_row),
        )),
        _ => None,
    }
}

fn announce_result(game: &Game, json: bool) {
    let Some(outcome) = game.outcome() else {
        return;
    };

    println!("\n========================================");
    match outcome.reason {
        WinReason::KingEscaped => println!("The king escaped! Defenders win."),
        WinReason::AttackersCaptured => println!("Every attacker was captured! Defenders win."),
        WinReason::KingSurrounded => println!("The king is surrounded! Attackers win."),
    }
    println!(
        "Score: defenders {} - attackers {}",
        game.first_player().wins(),
        game.second_player().wins()
    );
    println!("========================================");

    if json {
        if let Some(report) = game.report() {
            match serde_json::to_string_pretty(report) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Failed to serialize report: {}", e),
            }
        }
    }
}

fn main() {
    let json = std::env::args().skip(1).any(|arg| arg == "--json");
    let mut game = Game::with_config(GameConfig { print_report: !json });

    println!("Viking Chess");
    println!("========================================");
    println!("Moves: <col> <row> <col> <row>");
    println!("Commands: undo, reset, board, moves, quit\n");
    println!("{}", game.display_board());

    let stdin = io::stdin();
    loop {
        print!("{} to move> ", game.current_player());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "board" => println!("{}", game.display_board()),
            "moves" => println!("{} legal moves", game.legal_moves().len()),
            "undo" => {
                game.undo_last_move();
                println!("{}", game.display_board());
            }
            "reset" => {
                game.reset();
                println!("{}", game.display_board());
            }
            input => {
                let Some(mv) = parse_move(input) else {
                    println!("Could not read `{}`", input);
                    continue;
                };

                if game.is_game_finished() {
                    println!("The game is over; `undo` or `reset` to continue");
                    continue;
                }

                match game.make_move(mv.from, mv.to) {
                    Ok(true) => {
                        println!("{}", game.display_board());
                        announce_result(&game, json);
                    }
                    Ok(false) => match describe_rejection(&game, mv.from, mv.to) {
                        Some(reason) => println!("Illegal move {}: {}", mv, reason),
                        None => println!("Illegal move {}", mv),
                    },
                    Err(e) => println!("{}", e),
                }
            }
        }
    }
}
