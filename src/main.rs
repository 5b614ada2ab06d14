use kuba_engine::*;
use std::io::{self, Write};

fn main() {
    println!("Kuba - Marble Pushing Game");
    println!("==========================\n");

    let args: Vec<String> = std::env::args().collect();
    let white_name = args.get(1).cloned().unwrap_or_else(|| "White".to_string());
    let black_name = args.get(2).cloned().unwrap_or_else(|| "Black".to_string());

    let mut game = match GameEngine::new((&white_name, Color::White), (&black_name, Color::Black)) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("Could not start the game: {}", err);
            std::process::exit(1);
        }
    };

    println!("  {} plays White, {} plays Black.", white_name, black_name);
    println!("  Enter moves as: <row> <col> <direction>");
    println!("  Directions: f (up), b (down), l (left), r (right)");
    println!("  Either side may make the first push.\n");
    println!("{}", game.display_board());

    // Until the first committed push fixes the turn, the table decides who
    // is up; default to White at the prompt.
    let mut opener = Color::White;
    let mut input = String::new();

    loop {
        let to_move = game.current_turn().unwrap_or(opener);
        let name = if to_move == Color::White {
            &white_name
        } else {
            &black_name
        };
        print!("{} ({}) > ", name, to_move);
        let _ = io::stdout().flush();

        input.clear();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        // Before the game opens, "pass" hands the first push to the other side
        if game.current_turn().is_none() && line == "pass" {
            opener = opener.opponent();
            continue;
        }

        let Some((origin, direction)) = parse_move(line) else {
            println!("  Could not read that; format is: <row> <col> <f|b|l|r>");
            continue;
        };

        match game.attempt_move(name, origin, direction) {
            Ok(()) => {
                println!("\n{}", game.display_board());
                let (white, black, red) = game.marble_count();
                println!("  On board: {} white, {} black, {} red", white, black, red);
                println!(
                    "  Captured: {} {}, {} {}\n",
                    white_name,
                    game.captured_by(&white_name).unwrap_or(0),
                    black_name,
                    game.captured_by(&black_name).unwrap_or(0),
                );
                if let Some(winner) = game.winner() {
                    println!("==========================");
                    println!("  {} wins!", winner);
                    println!("==========================");
                    break;
                }
            }
            Err(err) => println!("  Rejected: {}", err),
        }
    }
}

fn parse_move(line: &str) -> Option<(Position, Direction)> {
    let mut parts = line.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    let direction = parse_direction(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((Position::new(row, col), direction))
}

fn parse_direction(token: &str) -> Option<Direction> {
    match token.to_lowercase().as_str() {
        "f" | "forward" | "up" => Some(Direction::Forward),
        "b" | "backward" | "down" => Some(Direction::Backward),
        "l" | "left" => Some(Direction::Left),
        "r" | "right" => Some(Direction::Right),
        _ => None,
    }
}
