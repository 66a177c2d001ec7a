use std::hint::black_box;
use std::time::Instant;

use skate_common::{FrameInput, GameConfig};
use skate_kernel::{Generator, GameState, PoolSpec, RecyclePool};

fn config_with_pool(obstacles: usize) -> GameConfig {
    let mut config = GameConfig::default();
    config.obstacles.count = obstacles;
    config.timing.opening_grace = 0.0;
    // Benchmark the steady state, not the game-over path.
    config.collision.threshold = 0.0;
    config
}

fn bench_update(obstacles: usize, frames: usize) {
    let mut game = GameState::new(config_with_pool(obstacles), 42);
    let dt = 1.0 / 60.0;

    let start = Instant::now();
    for i in 0..frames {
        let input = FrameInput {
            jump: i % 90 == 0,
            ..FrameInput::default()
        };
        let _ = black_box(game.update(black_box(dt), input));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  update ({obstacles} obstacles, {frames} frames): {per_frame:?}/frame, total {elapsed:?}"
    );
}

fn bench_recycle(obstacles: usize, iterations: usize) {
    let config = config_with_pool(obstacles);
    let mut generator = Generator::with_seed(7);
    let mut pool = RecyclePool::new(PoolSpec::obstacles(&config), &mut generator);

    let start = Instant::now();
    for _ in 0..iterations {
        pool.advance(black_box(0.8));
        let _ = black_box(pool.recycle_check(&mut generator));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  advance+recycle ({obstacles} slots, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Frame Update Benchmarks ===\n");

    println!("Full frame update:");
    bench_update(50, 10_000);
    bench_update(500, 10_000);
    bench_update(5_000, 1_000);

    println!("\nObstacle pool advance + recycle:");
    bench_recycle(50, 100_000);
    bench_recycle(5_000, 10_000);

    println!("\n=== Done ===");
}
