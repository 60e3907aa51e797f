//! Parade - Main Binary
//!
//! Local games on the console, or networked games over TCP

use clap::{Args, Parser, Subcommand, ValueEnum};
use parade_engine::{
    config::{NetworkSettings, SettingKey, Settings},
    core::PlayerId,
    game::{
        render::describe_result, GameLogger, GameLoop, GameState, GameSummary,
        InteractiveController, PlayerController, RandomController, VerbosityLevel,
        ZeroController,
    },
    net::{ClientSession, GameServer},
    ParadeError, Result,
};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Controller type for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ControllerType {
    /// Prompts on stdin/stdout
    Human,
    /// Uniformly random choices
    Random,
    /// Always plays the first card in hand
    Zero,
}

/// A seat given as `NAME:KIND`, e.g. `Alice:human`
#[derive(Debug, Clone)]
struct PlayerSpec {
    name: String,
    kind: ControllerType,
}

impl std::str::FromStr for PlayerSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, kind) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("invalid player '{s}' (expected NAME:KIND)"))?;
        if name.trim().is_empty() {
            return Err(format!("invalid player '{s}': name is empty"));
        }
        let kind = ControllerType::from_str(kind, true)
            .map_err(|_| format!("invalid controller '{kind}' (expected: human, random, zero)"))?;
        Ok(PlayerSpec {
            name: name.to_string(),
            kind,
        })
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "parade")]
#[command(about = "Parade card game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand
#[derive(Args)]
struct CommonArgs {
    /// JSON settings file; PARADE_* environment variables and flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set random seed for deterministic games
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, short = 'v')]
    verbosity: Option<VerbosityArg>,
}

/// Network options; anything left out falls back to the settings file or environment
#[derive(Args)]
struct NetArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Worker threads for the network runtime
    #[arg(long)]
    threads: Option<usize>,

    /// Longest wait for a remote move in milliseconds (0 = no limit)
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a local game
    Play {
        /// Seat as NAME:KIND (KIND = human | random | zero), 2 to 6 times
        #[arg(long = "player", value_name = "NAME:KIND", required = true)]
        players: Vec<PlayerSpec>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Host a game that remote players join
    Host {
        /// Local seat as NAME:KIND, seated before remote players
        #[arg(long = "local", value_name = "NAME:KIND")]
        local: Vec<PlayerSpec>,

        /// Number of remote players to wait for
        #[arg(long, default_value_t = 1)]
        remote: usize,

        #[command(flatten)]
        net: NetArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Join a hosted game
    Join {
        /// Name to request from the host
        #[arg(long)]
        name: String,

        /// Controller that answers the host's prompts
        #[arg(long, value_enum, default_value = "human")]
        kind: ControllerType,

        #[command(flatten)]
        net: NetArgs,

        #[command(flatten)]
        common: CommonArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { players, common } => run_play(players, common),
        Commands::Host {
            local,
            remote,
            net,
            common,
        } => run_host(local, remote, net, common),
        Commands::Join {
            name,
            kind,
            net,
            common,
        } => run_join(name, kind, net, common),
    }
}

/// Layer settings: file, then environment, then flags
fn load_settings(common: &CommonArgs, net: Option<&NetArgs>) -> Result<Settings> {
    let mut settings = match &common.config {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::new(),
    };
    settings.apply_env();

    settings.set_opt(SettingKey::Seed, common.seed);
    if let Some(net) = net {
        settings.set_opt(SettingKey::Host, net.host.as_ref());
        settings.set_opt(SettingKey::Port, net.port);
        settings.set_opt(SettingKey::Threads, net.threads);
        settings.set_opt(SettingKey::TimeoutMs, net.timeout_ms);
    }
    Ok(settings)
}

fn resolve_verbosity(common: &CommonArgs, settings: &Settings) -> Result<VerbosityLevel> {
    if let Some(arg) = common.verbosity {
        return Ok(arg.into());
    }
    if !settings.contains(SettingKey::Verbosity) {
        return Ok(VerbosityLevel::default());
    }
    let raw = settings.get_string(SettingKey::Verbosity)?;
    raw.parse::<VerbosityArg>()
        .map(VerbosityLevel::from)
        .map_err(ParadeError::InvalidSetting)
}

/// Seed from settings, or a fresh one that is logged so the game can be replayed
fn resolve_seed(settings: &Settings, logger: &GameLogger) -> Result<u64> {
    if settings.contains(SettingKey::Seed) {
        return settings.get_u64(SettingKey::Seed);
    }
    let seed = rand::random::<u64>();
    logger.verbose(&format!("Using seed {seed}"));
    Ok(seed)
}

fn make_controller(spec: &PlayerSpec, player_id: PlayerId, seed: u64) -> Box<dyn PlayerController> {
    match spec.kind {
        ControllerType::Human => Box::new(InteractiveController::stdio(player_id, spec.name.clone())),
        ControllerType::Random => Box::new(RandomController::with_seed(
            player_id,
            spec.name.clone(),
            seed.wrapping_add(player_id.as_u32() as u64 + 1),
        )),
        ControllerType::Zero => Box::new(ZeroController::new(player_id, spec.name.clone())),
    }
}

fn build_runtime(network: &NetworkSettings) -> Result<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(network.threads)
        .thread_name("parade-net")
        .enable_all()
        .build()?)
}

fn run_play(players: Vec<PlayerSpec>, common: CommonArgs) -> Result<()> {
    let settings = load_settings(&common, None)?;
    let logger = GameLogger::with_verbosity(resolve_verbosity(&common, &settings)?);
    let seed = resolve_seed(&settings, &logger)?;

    let mut controllers: Vec<Box<dyn PlayerController>> = players
        .iter()
        .enumerate()
        .map(|(seat, spec)| make_controller(spec, PlayerId::new(seat as u32), seed))
        .collect();
    let names = players.into_iter().map(|spec| spec.name).collect();

    let mut game = GameState::with_seed(names, seed, logger)?;
    let summary = GameLoop::new(&mut game).run_game(&mut controllers)?;
    report(&game, &summary);
    Ok(())
}

fn run_host(local: Vec<PlayerSpec>, remote: usize, net: NetArgs, common: CommonArgs) -> Result<()> {
    let settings = load_settings(&common, Some(&net))?;
    let network = settings.validate_network()?;
    let logger = GameLogger::with_verbosity(resolve_verbosity(&common, &settings)?);
    let seed = resolve_seed(&settings, &logger)?;

    let total = local.len() + remote;
    if !(parade_engine::game::MIN_PLAYERS..=parade_engine::game::MAX_PLAYERS).contains(&total) {
        return Err(ParadeError::InvalidPlayerCount(total));
    }

    let runtime = build_runtime(&network)?;
    let mut server = GameServer::bind(runtime.handle().clone(), network)?;
    logger.minimal(&format!(
        "Listening on {} for {} remote player(s)",
        server.local_addr()?,
        remote
    ));

    let mut names = Vec::with_capacity(total);
    let mut controllers: Vec<Box<dyn PlayerController>> = Vec::with_capacity(total);
    for (seat, spec) in local.iter().enumerate() {
        server.reserve_name(spec.name.clone());
        names.push(spec.name.clone());
        controllers.push(make_controller(spec, PlayerId::new(seat as u32), seed));
    }
    for seat in local.len()..total {
        let controller = server.accept_player(PlayerId::new(seat as u32), &logger)?;
        names.push(controller.name().to_string());
        controllers.push(Box::new(controller));
    }

    let mut game = GameState::with_seed(names, seed, logger)?;
    let summary = GameLoop::new(&mut game).run_game(&mut controllers)?;
    report(&game, &summary);
    Ok(())
}

fn run_join(name: String, kind: ControllerType, net: NetArgs, common: CommonArgs) -> Result<()> {
    let settings = load_settings(&common, Some(&net))?;
    let network = settings.validate_network()?;
    let logger = GameLogger::with_verbosity(resolve_verbosity(&common, &settings)?);
    let seed = resolve_seed(&settings, &logger)?;

    let runtime = build_runtime(&network)?;
    let mut session = ClientSession::open(runtime.handle().clone(), &network)?;
    let player = session.handshake(&name)?;
    logger.minimal(&format!("Joined {} as player {}", network.addr(), player));

    let spec = PlayerSpec {
        name: name.clone(),
        kind,
    };
    let mut controller = make_controller(&spec, player, seed);
    let result = session.play(controller.as_mut(), &logger)?;

    logger.minimal(&format!(
        "Game over: {}",
        describe_result(&result, |id| if id == player {
            name.clone()
        } else {
            format!("Player {id}")
        })
    ));
    Ok(())
}

fn report(game: &GameState, summary: &GameSummary) {
    game.logger.normal(&format!(
        "Final round triggered by: {}",
        summary.end_reason
    ));
}
