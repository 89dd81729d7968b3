use glam::Vec2;

use side_shooter::config::GameConfig;
use side_shooter::entities::{Category, Entity};
use side_shooter::{Command, GameState, Phase};

fn new_state() -> GameState {
    GameState::new(&GameConfig::default())
}

/// Walk the title and instruction screens into a fresh run.
fn playing_state() -> GameState {
    let mut s = new_state();
    assert!(s.apply_command(Command::Start, 0.0));
    assert!(s.apply_command(Command::Begin, 0.0));
    s
}

const ALL_COMMANDS: [Command; 6] = [
    Command::Start,
    Command::Begin,
    Command::Advance,
    Command::ReturnToTitle,
    Command::Restart,
    Command::Fire,
];

#[test]
fn starts_on_title() {
    let s = new_state();
    assert_eq!(s.phase, Phase::Title);
    assert_eq!(s.lives, 3);
    assert_eq!(s.stage, 1);
    assert!(s.world.is_empty());
}

#[test]
fn title_to_instructions_to_playing() {
    let mut s = new_state();
    assert!(s.apply_command(Command::Start, 0.0));
    assert_eq!(s.phase, Phase::Instructions);
    assert!(s.world.is_empty());

    assert!(s.apply_command(Command::Begin, 0.0));
    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.world.len(), 1);
    assert!(s.player().is_some());
    assert_eq!(s.score, 0);
}

#[test]
fn only_start_leaves_title() {
    for command in ALL_COMMANDS {
        let mut s = new_state();
        let accepted = s.apply_command(command, 0.0);
        assert_eq!(accepted, command == Command::Start, "{:?}", command);
    }
}

#[test]
fn menu_commands_are_ignored_in_play() {
    let mut s = playing_state();
    for command in [
        Command::Start,
        Command::Begin,
        Command::Advance,
        Command::ReturnToTitle,
        Command::Restart,
    ] {
        assert!(!s.apply_command(command, 0.0), "{:?}", command);
        assert_eq!(s.phase, Phase::Playing);
    }
}

#[test]
fn fire_spawns_a_bullet_in_play_only() {
    let mut s = playing_state();
    assert!(s.apply_command(Command::Fire, 1000.0));
    assert_eq!(s.world.count_of(Category::PlayerBullet), 1);
    // Cooldown applies to commanded shots too.
    assert!(!s.apply_command(Command::Fire, 1050.0));
    assert_eq!(s.world.count_of(Category::PlayerBullet), 1);

    let mut title = new_state();
    assert!(!title.apply_command(Command::Fire, 0.0));
    assert!(title.world.is_empty());
}

#[test]
fn advance_moves_to_next_stage_with_fresh_lives() {
    let mut s = playing_state();
    s.score = 6200;
    s.lives = 1;
    s.stage_timer_ms = 31_000.0;
    s.spawn_timer_ms = 700.0;
    s.spawn(Entity::enemy(Vec2::new(300.0, 100.0), 1));
    s.spawn(Entity::explosion(Vec2::new(300.0, 100.0), true));
    s.phase = Phase::StageClear;

    assert!(s.apply_command(Command::Advance, 0.0));

    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.stage, 2);
    assert_eq!(s.lives, 3);
    assert_eq!(s.score, 6200);
    assert_eq!(s.stage_timer_ms, 0.0);
    assert_eq!(s.spawn_timer_ms, 0.0);
    assert_eq!(s.world.len(), 1);
    assert_eq!(s.player().map(Entity::category), Some(Category::Player));
}

#[test]
fn advance_after_final_stage_ends_the_game() {
    let mut s = playing_state();
    s.stage = 3;
    s.phase = Phase::StageClear;
    assert!(s.apply_command(Command::Advance, 0.0));
    assert_eq!(s.phase, Phase::GameClear);
    assert_eq!(s.stage, 3);
}

#[test]
fn return_to_title_from_stage_clear() {
    let mut s = playing_state();
    s.score = 5100;
    s.phase = Phase::StageClear;
    assert!(s.apply_command(Command::ReturnToTitle, 0.0));
    assert_eq!(s.phase, Phase::Title);
    assert_eq!(s.score, 0);
    assert!(s.world.is_empty());
    assert!(s.player_key().is_none());
}

#[test]
fn restart_from_either_ending() {
    for ending in [Phase::GameOver, Phase::GameClear] {
        let mut s = playing_state();
        s.stage = 3;
        s.score = 12_000;
        s.lives = 0;
        s.phase = ending;

        assert!(!s.apply_command(Command::Advance, 0.0));
        assert!(s.apply_command(Command::Restart, 0.0));

        assert_eq!(s.phase, Phase::Title);
        assert_eq!(s.stage, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, 3);
        assert_eq!(s.boss_hp, 0);
        assert!(s.world.is_empty());
    }
}

#[test]
fn restart_then_begin_is_a_fresh_run() {
    let mut s = playing_state();
    s.score = 300;
    s.stage_timer_ms = 12_000.0;
    s.scroll_offset = 420.0;
    s.phase = Phase::GameOver;

    s.apply_command(Command::Restart, 0.0);
    s.apply_command(Command::Start, 0.0);
    s.apply_command(Command::Begin, 0.0);

    assert_eq!(s.phase, Phase::Playing);
    assert_eq!(s.score, 0);
    assert_eq!(s.stage_timer_ms, 0.0);
    assert_eq!(s.scroll_offset, 0.0);
    assert_eq!(s.world.len(), 1);
}

#[test]
fn active_play_phases() {
    assert!(Phase::Playing.is_active_play());
    assert!(Phase::Boss.is_active_play());
    for phase in [
        Phase::Title,
        Phase::Instructions,
        Phase::StageClear,
        Phase::GameClear,
        Phase::GameOver,
    ] {
        assert!(!phase.is_active_play());
    }
}
