//! Integration tests for the Hive rules engine
//!
//! Drives full games through the public API: opening rules, a queen being
//! surrounded, pill bug relocation, record replay and random play.

use hive_core::{
    Color, Coordinate, Feature, Features, Game, GameError, GameRecord, Piece, RuleError,
    Species, StateError, Winner, ORIGIN, SPECIES,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn piece(notation: &str) -> Piece {
    notation.parse().unwrap()
}

fn at(x: i8, y: i8, z: i8) -> Coordinate {
    Coordinate::new(x, y, z, 0)
}

/// Play the short game in which white surrounds the black queen
fn surround_black_queen() -> Game {
    let mut game = Game::default();

    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();

    game.place(piece("wA"), at(0, -1, 1)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();

    game.place(piece("wA"), at(0, -2, 2)).unwrap();
    game.place(piece("bB"), at(1, 1, -2)).unwrap();

    game.move_piece(at(0, -1, 1), at(1, 0, -1)).unwrap();
    game.place(piece("bS"), at(-1, 2, -1)).unwrap();

    game.move_piece(at(0, -2, 2), at(-1, 1, 0)).unwrap();
    game
}

// ============================================================================
// OPENING RULES
// ============================================================================

#[test]
fn test_second_queen_cannot_share_origin() {
    let mut game = Game::default();
    game.place(piece("wQ"), ORIGIN).unwrap();

    let result = game.place(piece("bQ"), ORIGIN);
    assert_eq!(result, Err(RuleError::MayNotPlaceAPieceOnAPiece.into()));
    assert!(game.inventory(Color::Black).has_queen());
    assert_eq!(game.active_color(), Color::Black);
    assert_eq!(game.board().len(), 1);
}

#[test]
fn test_first_piece_must_be_at_origin() {
    let mut game = Game::default();
    assert_eq!(
        game.place(piece("wA"), at(1, -1, 0)),
        Err(RuleError::FirstPieceMustBeAtOrigin.into())
    );
    assert!(game.history().is_empty());
}

#[test]
fn test_touching_opponent_after_first_turn() {
    let mut game = Game::default();
    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();

    let result = game.place(piece("wA"), at(0, 2, -2));
    assert_eq!(result, Err(RuleError::MayNotPlaceTouchingOpponentsPiece.into()));
    assert_eq!(game.history().len(), 2);

    game.place(piece("wA"), at(0, -1, 1)).unwrap();
}

#[test]
fn test_tournament_queens_rule() {
    let features = Features::none().with(Feature::TournamentQueensRule);
    let mut game = Game::new(features);

    assert_eq!(
        game.place(piece("wQ"), ORIGIN),
        Err(RuleError::MayNotPlaceQueenOnFirstTurn.into())
    );
    game.place(piece("wA"), ORIGIN).unwrap();
    assert_eq!(
        game.place(piece("bQ"), at(0, 1, -1)),
        Err(RuleError::MayNotPlaceQueenOnFirstTurn.into())
    );
    game.place(piece("bA"), at(0, 1, -1)).unwrap();
    game.place(piece("wQ"), at(0, -1, 1)).unwrap();
}

#[test]
fn test_expansion_pieces_need_their_feature() {
    let mut game = Game::default();
    assert_eq!(
        game.place(piece("wM"), ORIGIN),
        Err(RuleError::NoPieceAvailable.into())
    );

    let mut game = Game::new(Features::none().with(Feature::MosquitoPiece));
    game.place(piece("wM"), ORIGIN).unwrap();
}

#[test]
fn test_move_onto_itself() {
    let mut game = Game::default();
    assert_eq!(
        game.move_piece(ORIGIN, ORIGIN),
        Err(StateError::InvalidCoordinate.into())
    );

    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();
    assert_eq!(
        game.move_piece(ORIGIN, ORIGIN),
        Err(StateError::InvalidCoordinate.into())
    );
}

// ============================================================================
// GAME OVER
// ============================================================================

#[test]
fn test_surrounded_queen_ends_game() {
    let mut game = surround_black_queen();

    assert!(game.over());
    assert_eq!(game.winner(), Ok(Winner::White));
    assert!(game.board().neighbors(at(0, 1, -1)).is_suffocating());
    assert_eq!(game.active_color(), Color::Black);

    let history = game.history();
    assert_eq!(history.len(), 9);
    assert!(history[8].was_moved());

    assert_eq!(
        game.place(piece("bG"), at(-1, 3, -2)),
        Err(StateError::GameOver.into())
    );
    // A move onto the same hex is malformed whether or not the game is over
    assert_eq!(
        game.move_piece(at(0, 1, -1), at(0, 1, -1)),
        Err(StateError::InvalidCoordinate.into())
    );
    assert_eq!(game.history().len(), 9);
}

#[test]
fn test_both_queens_surrounded_is_a_tie() {
    let mut game = Game::default();
    let white_queen = ORIGIN;
    let black_queen = at(0, 1, -1);

    game.place(piece("wQ"), white_queen).unwrap();
    game.place(piece("bQ"), black_queen).unwrap();

    // Each side fills the hexes only its own queen touches
    game.place(piece("wG"), at(1, -1, 0)).unwrap();
    game.place(piece("bG"), at(1, 1, -2)).unwrap();
    game.place(piece("wS"), at(0, -1, 1)).unwrap();
    game.place(piece("bS"), at(-1, 2, -1)).unwrap();
    game.place(piece("wA"), at(-1, 0, 1)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();
    game.place(piece("wA"), at(2, -2, 0)).unwrap();
    game.place(piece("bA"), at(-2, 3, -1)).unwrap();

    // The two shared hexes are filled by ants walking in
    game.move_piece(at(2, -2, 0), at(1, 0, -1)).unwrap();
    assert!(!game.over());
    game.move_piece(at(-2, 3, -1), at(-1, 1, 0)).unwrap();

    assert!(game.board().neighbors(white_queen).is_suffocating());
    assert!(game.board().neighbors(black_queen).is_suffocating());
    assert!(game.over());
    assert!(game.is_tie());
    assert_eq!(game.winner(), Ok(Winner::Tie));

    assert_eq!(
        game.place(piece("wB"), at(1, -2, 1)),
        Err(StateError::GameOver.into())
    );
    assert_eq!(game.history().len(), 12);
}

#[test]
fn test_winner_before_game_over() {
    let game = Game::default();
    assert!(!game.over());
    assert_eq!(game.winner(), Err(StateError::GameNotOver));
}

#[test]
fn test_pinned_piece_cannot_move() {
    let mut game = Game::default();
    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();
    game.place(piece("wA"), at(1, -1, 0)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();
    game.place(piece("wA"), at(-1, 0, 1)).unwrap();
    game.place(piece("bA"), at(1, 1, -2)).unwrap();

    // North, south-east and south-west of the white queen are covered
    let result = game.move_piece(ORIGIN, at(0, -1, 1));
    assert_eq!(result, Err(RuleError::PiecePinned.into()));
}

#[test]
fn test_beetle_climbs_onto_queen() {
    let mut game = Game::default();
    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();
    game.place(piece("wB"), at(0, -1, 1)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();

    let on_top = Coordinate::new(0, 0, 0, 1);
    game.move_piece(at(0, -1, 1), on_top).unwrap();
    assert_eq!(game.board().cell(on_top), Some(piece("wB1")));
    assert_eq!(game.board().column_height(ORIGIN), 2);

    // A covered queen is pinned
    game.place(piece("bA"), at(0, 3, -3)).unwrap();
    assert_eq!(
        game.move_piece(ORIGIN, at(1, -1, 0)),
        Err(RuleError::PiecePinned.into())
    );
}

#[test]
fn test_beetle_cannot_climb_its_own_column() {
    let mut game = Game::default();
    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();
    game.place(piece("wB"), at(0, -1, 1)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();

    let beetle = at(0, -1, 1);
    let before = game.board().pieces().to_vec();
    assert_eq!(
        game.move_piece(beetle, Coordinate::new(0, -1, 1, 1)),
        Err(StateError::InvalidCoordinate.into())
    );
    assert_eq!(game.board().pieces(), &before[..]);
    assert_eq!(game.board().column_height(beetle), 1);
    assert_eq!(game.active_color(), Color::White);
    assert_eq!(game.history().len(), 4);
}

// ============================================================================
// PILL BUG
// ============================================================================

#[test]
fn test_pill_bug_relocation_paralyzes() {
    let mut game = Game::new(Features::none().with(Feature::PillBugPiece));
    let black_queen = at(0, 1, -1);

    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), black_queen).unwrap();
    game.place(piece("wP"), at(0, -1, 1)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();

    // Walk the pill bug next to the black queen
    game.move_piece(at(0, -1, 1), at(1, -1, 0)).unwrap();
    game.move_piece(at(0, 2, -2), at(-1, 2, -1)).unwrap();
    game.move_piece(at(1, -1, 0), at(1, 0, -1)).unwrap();
    game.move_piece(at(-1, 2, -1), at(0, 2, -2)).unwrap();

    let pill_bug = at(1, 0, -1);
    assert_eq!(
        game.relocate(pill_bug, black_queen, at(0, -1, 1)),
        Err(RuleError::NotAdjacentToPillBug.into())
    );
    assert_eq!(
        game.relocate(pill_bug, black_queen, ORIGIN),
        Err(RuleError::MayNotPlaceAPieceOnAPiece.into())
    );

    let landing = at(1, 1, -2);
    game.relocate(pill_bug, black_queen, landing).unwrap();
    assert_eq!(game.queen(Color::Black), Some(landing));
    assert!(game.is_paralyzed(landing));
    assert!(game.history().last().unwrap().was_moved());

    assert_eq!(
        game.move_piece(landing, at(2, 0, -2)),
        Err(RuleError::PieceParalyzed.into())
    );

    game.move_piece(at(0, 2, -2), at(-1, 2, -1)).unwrap();
    assert!(!game.is_paralyzed(landing));

    // The record replays the relocation through the same pill bug
    let replayed = GameRecord::from_game(&game).replay().unwrap();
    assert_eq!(replayed.board().pieces(), game.board().pieces());
    assert_eq!(replayed.queen(Color::Black), Some(landing));
}

#[test]
fn test_mosquito_relocates_next_to_pill_bug() {
    let features = Features::none()
        .with(Feature::PillBugPiece)
        .with(Feature::MosquitoPiece);
    let mut game = Game::new(features);

    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();
    game.place(piece("wP"), at(0, -1, 1)).unwrap();
    game.place(piece("bA"), at(0, 2, -2)).unwrap();
    game.place(piece("wM"), at(1, -1, 0)).unwrap();
    game.move_piece(at(0, 2, -2), at(-1, 2, -1)).unwrap();

    // The mosquito touches the pill bug and carries its own queen north
    let mosquito = at(1, -1, 0);
    let landing = at(1, 0, -1);
    game.relocate(mosquito, ORIGIN, landing).unwrap();
    assert_eq!(game.queen(Color::White), Some(landing));
    assert_eq!(game.board().cell(ORIGIN), None);
    assert!(game.is_paralyzed(landing));
    assert!(game.history().last().unwrap().was_moved());

    let replayed = GameRecord::from_game(&game).replay().unwrap();
    assert_eq!(replayed.board().pieces(), game.board().pieces());
    assert_eq!(replayed.queen(Color::White), Some(landing));
}

#[test]
fn test_relocation_needs_pill_bug_feature() {
    let mut game = Game::default();
    game.place(piece("wQ"), ORIGIN).unwrap();
    game.place(piece("bQ"), at(0, 1, -1)).unwrap();
    assert_eq!(
        game.relocate(ORIGIN, at(0, 1, -1), at(1, 0, -1)),
        Err(StateError::FeatureDisabled.into())
    );
}

// ============================================================================
// RECORDS
// ============================================================================

#[test]
fn test_record_json_round_trip() {
    let game = surround_black_queen();
    let record = GameRecord::from_game(&game);

    let json = record.to_json_pretty().unwrap();
    assert!(json.contains("\"kind\": \"moved\""));
    assert!(json.contains("\"piece\": \"bQ1\""));

    let parsed = GameRecord::from_json(&json).unwrap();
    assert_eq!(parsed, record);

    let replayed = parsed.replay().unwrap();
    assert_eq!(replayed.history(), game.history());
    assert_eq!(replayed.winner(), Ok(Winner::White));
}

#[test]
fn test_truncated_record_is_still_playing() {
    let game = surround_black_queen();
    let mut record = GameRecord::from_game(&game);
    record.actions.pop();

    let replayed = record.replay().unwrap();
    assert!(!replayed.over());
    assert_eq!(replayed.turn(), 5);
    assert_eq!(replayed.active_color(), Color::White);
}

// ============================================================================
// RANDOM PLAY
// ============================================================================

/// A random action aimed near the hive so that some of them succeed
fn random_action(game: &mut Game, rng: &mut ChaCha8Rng) -> Result<(), GameError> {
    let color = game.active_color();
    let cells: Vec<Coordinate> = game.board().pieces().iter().map(|p| p.coordinate).collect();

    let near = |rng: &mut ChaCha8Rng| -> Coordinate {
        match cells.choose(rng) {
            Some(&c) => {
                let mut target = c.planar();
                for _ in 0..rng.gen_range(1..=3) {
                    target = target.neighbor(rng.gen_range(0..6));
                }
                if rng.gen_bool(0.2) {
                    target = Coordinate::new(target.x(), target.y(), target.z(), 1);
                }
                target
            }
            None => ORIGIN,
        }
    };

    if cells.is_empty() || rng.gen_bool(0.5) {
        let species = SPECIES.choose(rng).map(|info| info.species).unwrap_or(Species::Ant);
        let instance = hive_core::Instance::A;
        let dst = near(rng);
        game.place(Piece::new(color, species, instance), dst)
    } else {
        let src = *cells.choose(rng).unwrap();
        let dst = near(rng);
        game.move_piece(src, dst)
    }
}

#[test]
fn test_random_play_keeps_invariants() {
    for seed in 0..8u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = Game::new(Features::all());

        for _ in 0..400 {
            if game.over() {
                break;
            }
            let before_history = game.history().len();
            let before_pieces = game.board().pieces().to_vec();
            let before_inventory = (game.inventory(Color::White), game.inventory(Color::Black));

            match random_action(&mut game, &mut rng) {
                Ok(()) => assert_eq!(game.history().len(), before_history + 1),
                Err(_) => {
                    assert_eq!(game.history().len(), before_history);
                    assert_eq!(game.board().pieces(), &before_pieces[..]);
                    assert_eq!(
                        (game.inventory(Color::White), game.inventory(Color::Black)),
                        before_inventory
                    );
                }
            }

            let mut seen: Vec<Coordinate> =
                game.board().pieces().iter().map(|p| p.coordinate).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), game.board().len(), "seed {} shares a coordinate", seed);

            for color in [Color::White, Color::Black] {
                let inventory = game.inventory(color);
                for info in SPECIES.iter() {
                    assert!(inventory.count(info.species) <= info.population as u32);
                }
            }
        }

        // Whatever happened, the record reproduces it
        let replayed = GameRecord::from_game(&game).replay().unwrap();
        assert_eq!(replayed.board().pieces(), game.board().pieces());
        assert_eq!(replayed.over(), game.over());
    }
}
