use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use connect_game::game::replay::{self, ReplayCursor};
use connect_game::{Board, BoardSpec, Team};

/// Helper to produce a long finished game on the largest supported board:
/// row-major drizzle until the board decides itself.
fn long_game_history() -> (BoardSpec, Vec<usize>) {
    let spec = BoardSpec {
        columns: 16,
        rows: 16,
        connect: 16,
        team_count: 2,
        no_middle_start: false,
    };
    let (mut board, _gate) = Board::new(spec.clone(), Team::first()).unwrap();
    'fill: for _ in 0..spec.rows {
        for column in 0..spec.columns {
            if !board.in_progress() {
                break 'fill;
            }
            let _ = board.apply_move(column);
        }
    }
    (spec, board.move_history().to_vec())
}

/// Benchmark the localized win scan on the classic board.
fn bench_win_scan(c: &mut Criterion) {
    c.bench_function("apply_move_with_win_scan", |b| {
        b.iter(|| {
            let (mut board, _gate) = Board::new(BoardSpec::default(), Team::first()).unwrap();
            for column in [0, 6, 1, 6, 2, 6, 3] {
                let _ = board.apply_move(black_box(column));
            }
            board.victor()
        });
    });
}

/// Benchmark replaying a long finished game from its encoded history.
fn bench_full_game_replay(c: &mut Criterion) {
    let (spec, history) = long_game_history();
    let encoded = replay::encode(&history);

    c.bench_function("replay_long_game", |b| {
        b.iter(|| {
            let (mut board, _gate) = Board::new(spec.clone(), Team::first()).unwrap();
            let mut cursor = ReplayCursor::new(black_box(&encoded));
            while let Some(Ok(column)) = cursor.next_column() {
                let _ = board.apply_move(column);
            }
            board.move_history().len()
        });
    });
}

criterion_group!(benches, bench_win_scan, bench_full_game_replay);
criterion_main!(benches);
