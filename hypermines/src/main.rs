use hyperfield::{
    game::{Game, GameState},
    settings::PRESETS,
};
use rand::{seq::SliceRandom, thread_rng};

fn main() {
    tracing_subscriber::fmt().init();

    let (dimensions, mines) = PRESETS[3];
    let mut game = Game::new();
    game.configure(dimensions.to_vec(), Vec::new(), mines)
        .expect("presets should validate");
    game.set_fail_on_wrong_flag(false);
    game.start_new_game();

    let mut rng = thread_rng();
    let mut reveals = 0;
    while game.state() == GameState::InProgress {
        let hidden: Vec<_> = game
            .cells()
            .into_iter()
            .filter(|cell| !cell.is_revealed && !cell.is_flagged)
            .map(|cell| cell.coordinates)
            .collect();
        let Some(target) = hidden.choose(&mut rng) else {
            break;
        };
        game.reveal_cell(target);
        reveals += 1;
    }

    let elapsed = game.time().map(|time| time.elapsed()).unwrap_or_default();
    println!(
        "{:?} on {dimensions:?} after {reveals} random reveals in {elapsed:?}",
        game.state()
    );
}
