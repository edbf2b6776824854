//! # Tile merge CLI
//!
//! Command-line front end for the merge engine: play interactively in the
//! terminal or run headless simulations with configurable policies.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tile_merge_core::{Direction, Game, GameConfig, GameStatus};

#[derive(Parser, Debug)]
#[command(name = "tile-merge")]
#[command(author, version, about = "Play the sliding-tile merge game in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long)]
    interactive: bool,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// JSON file with `size`, `target` and `seed`; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board side length
    #[arg(long)]
    size: Option<usize>,

    /// Tile value that wins the game
    #[arg(short, long)]
    target: Option<u32>,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random valid moves
    Random,
    /// Cycle through actions: Left, Down, Right, Up
    Cycle,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    log::info!(
        "board {}x{}, target {}, seed {}",
        config.size,
        config.size,
        config.target,
        config.seed
    );

    match args.episodes {
        Some(episodes) if !args.interactive => run_headless(&args, &config, episodes),
        _ => run_interactive(&config),
    }
}

/// Defaults, then the optional config file, then explicit flags.
fn resolve_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GameConfig::from_json_str(&json)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(target) = args.target {
        config.target = target;
    }
    config.validate()?;
    Ok(config)
}

const HEADER: &str = "Controls: WASD or Arrow Keys | Q to quit | R to restart\n";

fn redraw(game: &Game) -> Result<()> {
    println!("\x1b[2J\x1b[H"); // Clear screen
    println!("=== {} ===", game.config().target);
    println!("{HEADER}");
    print!("{}", game);
    io::stdout().flush()?;
    Ok(())
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive(config: &GameConfig) -> Result<()> {
    // Single-key input until the guard is dropped
    let _raw = RawMode::enable();

    let mut game = Game::new(config.clone())?;
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    redraw(&game)?;

    loop {
        let bytes_read = stdin.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(direction) => {
                if game.status().is_terminal() {
                    continue;
                }
                let result = game.step(direction);
                redraw(&game)?;

                if result.reward > 0 {
                    println!("  +{} points!", result.reward);
                }
                match result.status {
                    GameStatus::Won => {
                        println!("\n  *** YOU WIN ***");
                        println!("  Reached {} in {} moves", game.config().target, game.moves());
                        println!("\n  Press R to restart or Q to quit");
                    }
                    GameStatus::Lost => {
                        println!("\n  *** GAME OVER ***");
                        println!("  Final Score: {}", game.score());
                        println!("  Max Tile: {}", game.max_tile());
                        println!("\n  Press R to restart or Q to quit");
                    }
                    GameStatus::Playing => {}
                }
            }
            InputAction::Restart => {
                game.reset(config.seed);
                redraw(&game)?;
            }
            InputAction::Quit => {
                println!("\nGoodbye!");
                break;
            }
            InputAction::None => {}
        }
    }
    Ok(())
}

/// Run headless simulation mode.
fn run_headless(args: &Args, config: &GameConfig, episodes: u32) -> Result<()> {
    if episodes == 0 {
        anyhow::bail!("--episodes must be at least 1");
    }

    let mut scores: Vec<u64> = Vec::with_capacity(episodes as usize);
    let mut tile_counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut wins = 0u32;

    // Separate RNG for action selection
    let mut action_rng = SmallRng::seed_from_u64(config.seed.wrapping_add(1000));

    for episode in 0..episodes {
        let episode_config = GameConfig {
            seed: config.seed.wrapping_add(u64::from(episode)),
            ..config.clone()
        };
        let mut game = Game::new(episode_config)?;
        let mut steps = 0;
        let mut action_cycle = 0;

        while !game.status().is_terminal() && (args.max_steps == 0 || steps < args.max_steps) {
            let action = match args.policy {
                Policy::Random => select_random_action(&game, &mut action_rng),
                Policy::Cycle => select_cycle_action(&game, &mut action_cycle),
            };

            let Some(direction) = action else {
                break; // No valid actions
            };
            game.step(direction);
            steps += 1;

            if args.verbose {
                println!("Episode {} Step {}: {:?}", episode + 1, steps, direction);
                print!("{}", game);
            }
        }

        if game.status() == GameStatus::Won {
            wins += 1;
        }
        log::debug!(
            "episode {}: score={} max_tile={} steps={} status={:?}",
            episode + 1,
            game.score(),
            game.max_tile(),
            steps,
            game.status()
        );
        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}",
                episode + 1,
                game.score(),
                game.max_tile(),
                steps
            );
        }

        scores.push(game.score());
        *tile_counts.entry(game.max_tile()).or_insert(0) += 1;
    }

    scores.sort_unstable();
    let total: u64 = scores.iter().sum();
    let avg_score = total as f64 / scores.len() as f64;
    let mid = scores.len() / 2;
    let median_score = if scores.len() % 2 == 0 {
        (scores[mid - 1] + scores[mid]) as f64 / 2.0
    } else {
        scores[mid] as f64
    };

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("policy={:?}", args.policy);
    println!("seed={}", config.seed);
    println!("size={}", config.size);
    println!("target={}", config.target);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().copied().unwrap_or(0));
    println!("max_score={}", scores.last().copied().unwrap_or(0));
    println!(
        "max_tile_overall={}",
        tile_counts.keys().next_back().copied().unwrap_or(0)
    );
    println!("wins={}", wins);

    let distribution: Vec<String> = tile_counts
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    println!("tile_distribution={}", distribution.join(","));
    Ok(())
}

/// Select a random valid action.
fn select_random_action(game: &Game, rng: &mut SmallRng) -> Option<Direction> {
    let legal = game.legal_actions();
    let valid: Vec<Direction> = Direction::ALL
        .into_iter()
        .zip(legal)
        .filter_map(|(d, ok)| ok.then_some(d))
        .collect();
    valid.choose(rng).copied()
}

/// Select action in a cycle: Left, Down, Right, Up.
fn select_cycle_action(game: &Game, cycle: &mut usize) -> Option<Direction> {
    const ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];
    let legal = game.legal_actions();

    // Try actions in cycle order, starting from current position
    for _ in 0..4 {
        let direction = ORDER[*cycle % 4];
        *cycle += 1;
        if legal[direction as usize] {
            return Some(direction);
        }
    }

    None
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,

        _ => InputAction::None,
    }
}

/// Terminal raw mode, restored on drop.
struct RawMode {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> Self {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        // SAFETY: termios is plain data and fd is the process's stdin.
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut termios) != 0 {
                log::warn!("stdin is not a terminal; keys need Enter");
                return RawMode { saved: None };
            }
            let saved = termios;
            termios.c_lflag &= !(libc::ICANON | libc::ECHO);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;
            libc::tcsetattr(fd, libc::TCSANOW, &termios);
            RawMode { saved: Some(saved) }
        }
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        if let Some(saved) = &self.saved {
            // SAFETY: restores the attributes read in `enable`.
            unsafe {
                libc::tcsetattr(io::stdin().as_raw_fd(), libc::TCSANOW, saved);
            }
        }
    }
}

#[cfg(not(unix))]
impl RawMode {
    // Interactive mode will require Enter after each key
    fn enable() -> Self {
        RawMode {}
    }
}
